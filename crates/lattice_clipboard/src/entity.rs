//! # Clipboard Entities
//!
//! `ClipboardEntity` is a snapshot of one entity held by a clipboard: its
//! identity, world location and a private copy of its state. It does not
//! own or borrow the clipboard. It remembers the issuing clipboard's id and
//! every mutating call takes that clipboard explicitly.
//!
//! Relocation removes the entity and creates a new one, so the handle
//! returned by `set_location` carries a new identity.

use lattice_core::{BaseEntity, Location};
use uuid::Uuid;

use crate::clipboard::{BlockArrayClipboard, ClipboardId};
use crate::error::ClipboardResult;
use crate::store::BlockStore;

/// Handle to an entity stored in a clipboard.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipboardEntity {
    clipboard: ClipboardId,
    id: Uuid,
    location: Location,
    state: BaseEntity,
}

impl ClipboardEntity {
    pub(crate) fn new(
        clipboard: ClipboardId,
        id: Uuid,
        location: Location,
        state: BaseEntity,
    ) -> Self {
        Self {
            clipboard,
            id,
            location,
            state,
        }
    }

    /// Identity assigned at creation.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Clipboard that issued this handle.
    #[must_use]
    pub fn clipboard_id(&self) -> ClipboardId {
        self.clipboard
    }

    /// World location at the time the snapshot was taken.
    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    /// A fresh copy of the entity state.
    #[must_use]
    pub fn state(&self) -> BaseEntity {
        self.state.clone()
    }

    /// Removes the entity from `clipboard`. Removing twice is harmless, so
    /// this reports `true` whenever the clipboard accepted the request.
    ///
    /// # Errors
    ///
    /// Returns `ClipboardError::ForeignEntity` if `clipboard` did not issue
    /// this handle, or the clipboard's error.
    pub fn remove<S: BlockStore>(
        &self,
        clipboard: &mut BlockArrayClipboard<S>,
    ) -> ClipboardResult<bool> {
        clipboard.remove_entity_value(self)?;
        Ok(true)
    }

    /// Moves the entity by removing it and creating a copy at `location`.
    ///
    /// Returns the new handle, or `None` if the clipboard refused to place
    /// the copy. The old handle is stale either way.
    ///
    /// # Errors
    ///
    /// Same as `remove`, plus the clipboard's error on creation.
    pub fn set_location<S: BlockStore>(
        &self,
        clipboard: &mut BlockArrayClipboard<S>,
        location: Location,
    ) -> ClipboardResult<Option<ClipboardEntity>> {
        self.remove(clipboard)?;
        clipboard.create_entity(location, &self.state)
    }
}
