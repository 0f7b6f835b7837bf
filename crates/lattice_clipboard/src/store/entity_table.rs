//! Entity bookkeeping shared by all store variants.
//!
//! Locations are kept in storage space (local + offset) so entities follow
//! the same offset rule as blocks.

use lattice_core::{BaseEntity, BlockVector3, Location};
use uuid::Uuid;

use super::layout::StoreLayout;
use super::StoredEntity;

/// Entities held by one store.
#[derive(Clone, Debug, Default)]
pub(crate) struct EntityTable {
    entries: Vec<StoredEntity>,
    max_entities: Option<usize>,
}

impl EntityTable {
    pub(crate) fn set_limit(&mut self, max_entities: Option<usize>) {
        self.max_entities = max_entities;
    }

    /// All entities, in local space.
    pub(crate) fn list(&self, layout: &StoreLayout) -> Vec<StoredEntity> {
        self.entries
            .iter()
            .map(|e| StoredEntity {
                id: e.id,
                location: layout.to_local(e.location),
                state: e.state.clone(),
            })
            .collect()
    }

    /// Stores a copy of `state` at a local location. `None` when full.
    pub(crate) fn create(
        &mut self,
        layout: &StoreLayout,
        location: Location,
        state: &BaseEntity,
    ) -> Option<StoredEntity> {
        if self.max_entities.is_some_and(|max| self.entries.len() >= max) {
            tracing::debug!("entity rejected, store holds {} entities", self.entries.len());
            return None;
        }
        let id = Uuid::new_v4();
        self.entries.push(StoredEntity {
            id,
            location: layout.to_storage(location),
            state: state.clone(),
        });
        Some(StoredEntity {
            id,
            location,
            state: state.clone(),
        })
    }

    /// Removes by identity. The position is only a hint.
    pub(crate) fn remove(&mut self, position: BlockVector3, id: Uuid) -> bool {
        match self.entries.iter().position(|e| e.id == id) {
            Some(i) => {
                self.entries.swap_remove(i);
                true
            }
            None => {
                tracing::trace!("no entity {} near {}", id, position);
                false
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_rejects_creation() {
        let layout = StoreLayout::new(BlockVector3::new(2, 2, 2)).unwrap();
        let mut table = EntityTable::default();
        table.set_limit(Some(1));
        let sheep = BaseEntity::new("sheep");
        assert!(table.create(&layout, Location::at(0.5, 0.0, 0.5), &sheep).is_some());
        assert!(table.create(&layout, Location::at(1.5, 0.0, 0.5), &sheep).is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_remove_by_identity_only() {
        let layout = StoreLayout::new(BlockVector3::new(2, 2, 2)).unwrap();
        let mut table = EntityTable::default();
        let created = table
            .create(&layout, Location::at(0.5, 0.0, 0.5), &BaseEntity::new("cow"))
            .unwrap();
        assert!(!table.remove(BlockVector3::ZERO, Uuid::new_v4()));
        assert!(table.remove(BlockVector3::new(9, 9, 9), created.id));
        assert!(!table.remove(BlockVector3::ZERO, created.id));
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_locations_follow_offset() {
        let mut layout = StoreLayout::new(BlockVector3::new(4, 4, 4)).unwrap();
        let mut table = EntityTable::default();
        table.create(&layout, Location::at(1.5, 1.0, 1.5), &BaseEntity::new("pig"));
        layout.set_offset(BlockVector3::new(1, 0, 0));
        let listed = table.list(&layout);
        assert_eq!(listed[0].location, Location::at(0.5, 1.0, 1.5));
    }
}
