//! # Entity State
//!
//! `BaseEntity` is the placement-free part of an entity: its type and its
//! data. It is a plain value, so every copy handed out is independent.

use serde::{Deserialize, Serialize};

use crate::tag::CompoundTag;

/// Entity type plus entity data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseEntity {
    type_id: String,
    nbt: CompoundTag,
}

impl BaseEntity {
    /// Creates an entity with empty data.
    #[must_use]
    pub fn new(type_id: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            nbt: CompoundTag::new(),
        }
    }

    /// Creates an entity with the given data.
    #[must_use]
    pub fn with_nbt(type_id: impl Into<String>, nbt: CompoundTag) -> Self {
        Self {
            type_id: type_id.into(),
            nbt,
        }
    }

    /// Entity type identifier, e.g. `"minecraft:sheep"`.
    #[must_use]
    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    /// Entity data.
    #[must_use]
    pub fn nbt(&self) -> &CompoundTag {
        &self.nbt
    }

    /// Mutable entity data.
    pub fn nbt_mut(&mut self) -> &mut CompoundTag {
        &mut self.nbt
    }
}
