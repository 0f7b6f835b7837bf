//! # Backing Stores
//!
//! The `BlockStore` trait is the capability set a clipboard needs from its
//! storage: indexed blocks, tiles and biomes by local coordinate, entity
//! bookkeeping, a placement offset, and an optional release step.
//!
//! ## Variants
//!
//! | Store | Blocks | Tiles/Entities | Release |
//! |-------|--------|----------------|---------|
//! | `LinearStore` | dense `Vec` | memory | no-op |
//! | `MemoryOptimizedStore` | LZ4 layers + hot set | memory | no-op |
//! | `DiskStore` | memory-mapped file | memory | flush + unmap |
//!
//! All variants are interchangeable; clipboards never inspect which one
//! they hold. Every accessor returns `ClipboardResult` so a disk fault is
//! never confused with "position out of range".

pub mod disk;
pub(crate) mod entity_table;
pub mod layout;
pub mod linear;
pub mod memory_optimized;

use std::collections::HashMap;

use lattice_core::{
    BaseBlock, BaseEntity, BiomeType, BlockState, BlockVector2, BlockVector3, CompoundTag,
    Location,
};
use uuid::Uuid;

use crate::clipboard::ClipboardId;
use crate::error::ClipboardResult;
use crate::settings::{ClipboardSettings, StorageKind};

pub use disk::DiskStore;
pub use layout::StoreLayout;
pub use linear::LinearStore;
pub use memory_optimized::{LayerStats, MemoryOptimizedStore};

/// An entity as held by a store.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredEntity {
    /// Identity assigned by the store at creation.
    pub id: Uuid,
    /// Placement in the store's local space.
    pub location: Location,
    /// Entity data.
    pub state: BaseEntity,
}

/// Storage capability required by a clipboard.
///
/// Positions are local. Out-of-range positions (after the offset is
/// applied) read as air / the default biome and refuse writes with
/// `Ok(false)`.
pub trait BlockStore {
    /// Size per axis.
    fn dimensions(&self) -> BlockVector3;

    /// Placement offset added to every local coordinate.
    fn offset(&self) -> BlockVector3;

    /// Replaces the placement offset. Stored content does not move.
    ///
    /// # Errors
    ///
    /// Fails if the store has been closed or cannot persist the offset.
    fn set_offset(&mut self, offset: BlockVector3) -> ClipboardResult<()>;

    /// Block state at a local position.
    ///
    /// # Errors
    ///
    /// Fails on I/O faults or after close.
    fn get_block(&self, position: BlockVector3) -> ClipboardResult<BlockState>;

    /// Block state plus tile data at a local position.
    ///
    /// # Errors
    ///
    /// Fails on I/O faults or after close.
    fn get_full_block(&self, position: BlockVector3) -> ClipboardResult<BaseBlock>;

    /// Writes a block. Tile data on `block` replaces any existing tile;
    /// a block without tile data clears it.
    ///
    /// # Errors
    ///
    /// Fails on I/O faults or after close.
    fn set_block(&mut self, position: BlockVector3, block: &BaseBlock) -> ClipboardResult<bool>;

    /// Attaches tile data to a position without touching the block state.
    ///
    /// # Errors
    ///
    /// Fails on I/O faults or after close.
    fn set_tile(&mut self, position: BlockVector3, tile: CompoundTag) -> ClipboardResult<bool>;

    /// Returns true once any biome has been written.
    fn has_biomes(&self) -> bool;

    /// Biome of a local column.
    ///
    /// # Errors
    ///
    /// Fails on I/O faults or after close.
    fn get_biome(&self, column: BlockVector2) -> ClipboardResult<BiomeType>;

    /// Writes the biome of a local column.
    ///
    /// # Errors
    ///
    /// Fails on I/O faults or after close.
    fn set_biome(&mut self, column: BlockVector2, biome: BiomeType) -> ClipboardResult<bool>;

    /// Every entity, in local space.
    ///
    /// # Errors
    ///
    /// Fails after close.
    fn entities(&self) -> ClipboardResult<Vec<StoredEntity>>;

    /// Stores a copy of `entity`. `Ok(None)` when the store refuses it.
    ///
    /// # Errors
    ///
    /// Fails after close.
    fn create_entity(
        &mut self,
        location: Location,
        entity: &BaseEntity,
    ) -> ClipboardResult<Option<StoredEntity>>;

    /// Removes an entity by identity. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Fails after close.
    fn remove_entity(&mut self, position: BlockVector3, id: Uuid) -> ClipboardResult<bool>;

    /// Releases external resources. Must be safe to call repeatedly.
    ///
    /// # Errors
    ///
    /// Fails if buffered data cannot be written back.
    fn close(&mut self) -> ClipboardResult<()> {
        Ok(())
    }
}

impl<S: BlockStore + ?Sized> BlockStore for Box<S> {
    fn dimensions(&self) -> BlockVector3 {
        (**self).dimensions()
    }

    fn offset(&self) -> BlockVector3 {
        (**self).offset()
    }

    fn set_offset(&mut self, offset: BlockVector3) -> ClipboardResult<()> {
        (**self).set_offset(offset)
    }

    fn get_block(&self, position: BlockVector3) -> ClipboardResult<BlockState> {
        (**self).get_block(position)
    }

    fn get_full_block(&self, position: BlockVector3) -> ClipboardResult<BaseBlock> {
        (**self).get_full_block(position)
    }

    fn set_block(&mut self, position: BlockVector3, block: &BaseBlock) -> ClipboardResult<bool> {
        (**self).set_block(position, block)
    }

    fn set_tile(&mut self, position: BlockVector3, tile: CompoundTag) -> ClipboardResult<bool> {
        (**self).set_tile(position, tile)
    }

    fn has_biomes(&self) -> bool {
        (**self).has_biomes()
    }

    fn get_biome(&self, column: BlockVector2) -> ClipboardResult<BiomeType> {
        (**self).get_biome(column)
    }

    fn set_biome(&mut self, column: BlockVector2, biome: BiomeType) -> ClipboardResult<bool> {
        (**self).set_biome(column, biome)
    }

    fn entities(&self) -> ClipboardResult<Vec<StoredEntity>> {
        (**self).entities()
    }

    fn create_entity(
        &mut self,
        location: Location,
        entity: &BaseEntity,
    ) -> ClipboardResult<Option<StoredEntity>> {
        (**self).create_entity(location, entity)
    }

    fn remove_entity(&mut self, position: BlockVector3, id: Uuid) -> ClipboardResult<bool> {
        (**self).remove_entity(position, id)
    }

    fn close(&mut self) -> ClipboardResult<()> {
        (**self).close()
    }
}

impl<S: BlockStore + ?Sized> BlockStore for &mut S {
    fn dimensions(&self) -> BlockVector3 {
        (**self).dimensions()
    }

    fn offset(&self) -> BlockVector3 {
        (**self).offset()
    }

    fn set_offset(&mut self, offset: BlockVector3) -> ClipboardResult<()> {
        (**self).set_offset(offset)
    }

    fn get_block(&self, position: BlockVector3) -> ClipboardResult<BlockState> {
        (**self).get_block(position)
    }

    fn get_full_block(&self, position: BlockVector3) -> ClipboardResult<BaseBlock> {
        (**self).get_full_block(position)
    }

    fn set_block(&mut self, position: BlockVector3, block: &BaseBlock) -> ClipboardResult<bool> {
        (**self).set_block(position, block)
    }

    fn set_tile(&mut self, position: BlockVector3, tile: CompoundTag) -> ClipboardResult<bool> {
        (**self).set_tile(position, tile)
    }

    fn has_biomes(&self) -> bool {
        (**self).has_biomes()
    }

    fn get_biome(&self, column: BlockVector2) -> ClipboardResult<BiomeType> {
        (**self).get_biome(column)
    }

    fn set_biome(&mut self, column: BlockVector2, biome: BiomeType) -> ClipboardResult<bool> {
        (**self).set_biome(column, biome)
    }

    fn entities(&self) -> ClipboardResult<Vec<StoredEntity>> {
        (**self).entities()
    }

    fn create_entity(
        &mut self,
        location: Location,
        entity: &BaseEntity,
    ) -> ClipboardResult<Option<StoredEntity>> {
        (**self).create_entity(location, entity)
    }

    fn remove_entity(&mut self, position: BlockVector3, id: Uuid) -> ClipboardResult<bool> {
        (**self).remove_entity(position, id)
    }

    fn close(&mut self) -> ClipboardResult<()> {
        (**self).close()
    }
}

/// Generates the store configured in `settings`, sized to `dimensions`.
///
/// Disk stores are created as `<disk_directory>/<id>.bcd`.
///
/// # Errors
///
/// Returns `ClipboardError::InvalidDimensions` for an empty size and
/// `ClipboardError::Io` if a disk store cannot be created.
pub fn create_store(
    settings: &ClipboardSettings,
    dimensions: BlockVector3,
    id: ClipboardId,
) -> ClipboardResult<Box<dyn BlockStore>> {
    settings.validate()?;
    tracing::debug!("creating {:?} store {} for clipboard {}", settings.storage, dimensions, id);
    let store: Box<dyn BlockStore> = match settings.storage {
        StorageKind::Linear => {
            Box::new(LinearStore::new(dimensions)?.with_entity_limit(settings.max_entities))
        }
        StorageKind::MemoryOptimized => Box::new(
            MemoryOptimizedStore::new(dimensions, settings.hot_layers)?
                .with_entity_limit(settings.max_entities),
        ),
        StorageKind::Disk => {
            std::fs::create_dir_all(&settings.disk_directory)?;
            let path = settings.disk_directory.join(format!("{id}.{}", disk::FILE_EXTENSION));
            Box::new(DiskStore::create(path, dimensions)?.with_entity_limit(settings.max_entities))
        }
    };
    Ok(store)
}

/// Applies the tile rule of `BlockStore::set_block` to a tile map.
pub(crate) fn apply_tile(tiles: &mut HashMap<usize, CompoundTag>, index: usize, block: &BaseBlock) {
    match block.tile() {
        Some(tile) => {
            tiles.insert(index, tile.clone());
        }
        None => {
            tiles.remove(&index);
        }
    }
}
