//! # Compound Tags
//!
//! Minimal named-tag tree used for tile data and entity state. Values are
//! owned, so cloning a tag is a deep copy.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single tag value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Tag {
    /// Signed byte.
    Byte(i8),
    /// Signed 32-bit integer.
    Int(i32),
    /// Signed 64-bit integer.
    Long(i64),
    /// 64-bit float.
    Double(f64),
    /// UTF-8 string.
    String(String),
    /// Ordered list of tags.
    List(Vec<Tag>),
    /// Nested compound.
    Compound(CompoundTag),
}

/// An ordered map of named tags.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompoundTag {
    entries: BTreeMap<String, Tag>,
}

impl CompoundTag {
    /// Creates an empty compound.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a tag, returning the previous value under that name.
    pub fn insert(&mut self, name: impl Into<String>, tag: Tag) -> Option<Tag> {
        self.entries.insert(name.into(), tag)
    }

    /// Inserts an integer tag.
    pub fn insert_int(&mut self, name: impl Into<String>, value: i32) -> Option<Tag> {
        self.insert(name, Tag::Int(value))
    }

    /// Inserts a string tag.
    pub fn insert_string(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<Tag> {
        self.insert(name, Tag::String(value.into()))
    }

    /// Looks up a tag by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.entries.get(name)
    }

    /// Looks up an integer tag by name.
    #[must_use]
    pub fn get_int(&self, name: &str) -> Option<i32> {
        match self.entries.get(name) {
            Some(Tag::Int(v)) => Some(*v),
            _ => None,
        }
    }

    /// Looks up a string tag by name.
    #[must_use]
    pub fn get_string(&self, name: &str) -> Option<&str> {
        match self.entries.get(name) {
            Some(Tag::String(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Removes a tag by name.
    pub fn remove(&mut self, name: &str) -> Option<Tag> {
        self.entries.remove(name)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
