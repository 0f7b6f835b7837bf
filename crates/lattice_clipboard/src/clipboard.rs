//! # Block Array Clipboard
//!
//! A bounded region addressed in world coordinates, stored in a backing
//! store addressed in local coordinates.
//!
//! ## Coordinate Rule
//!
//! Every spatial accessor (blocks, tiles, biomes, and their raw integer
//! forms) does the same two steps:
//!
//! 1. Bounds-check the world position against the captured region. Outside
//!    positions read as air / the default biome and refuse writes with
//!    `Ok(false)`. The store is never touched.
//! 2. Translate with `local = world - origin` and forward to the store.
//!
//! The store is told `origin - region.min` as its offset, so moving the
//! origin never moves stored content: world position `p` always lands in
//! storage cell `p - region.min`.
//!
//! ## Lifecycle
//!
//! `close()` releases the store exactly once. Further calls are no-ops and
//! any store access afterwards fails with `ClipboardError::Closed`. A
//! clipboard dropped without `close()` closes itself.

use std::fmt;

use lattice_core::{
    BaseBlock, BaseEntity, BiomeType, BlockState, BlockVector2, BlockVector3, CompoundTag,
    Location, Region,
};
use uuid::Uuid;

use crate::entity::ClipboardEntity;
use crate::error::{ClipboardError, ClipboardResult};
use crate::settings::ClipboardSettings;
use crate::store::{create_store, BlockStore, StoredEntity};

/// Identity of one clipboard. Entity handles carry it back to their issuer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClipboardId(Uuid);

impl ClipboardId {
    /// Generates a fresh random identity.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// The underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ClipboardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coordinate-translating overlay over a backing store.
pub struct BlockArrayClipboard<S: BlockStore = Box<dyn BlockStore>> {
    id: ClipboardId,
    region: Box<dyn Region>,
    origin: BlockVector3,
    store: S,
    closed: bool,
}

impl BlockArrayClipboard {
    /// Creates a clipboard with a random identity and default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be generated.
    pub fn new(region: &dyn Region) -> ClipboardResult<Self> {
        Self::with_id(region, ClipboardId::random())
    }

    /// Creates a clipboard with a known identity and default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be generated.
    pub fn with_id(region: &dyn Region, id: ClipboardId) -> ClipboardResult<Self> {
        Self::with_settings(region, id, &ClipboardSettings::default())
    }

    /// Creates a clipboard whose store is generated from `settings`.
    ///
    /// # Errors
    ///
    /// Returns `ClipboardError::InvalidConfig` for bad settings and
    /// `ClipboardError::Io` if a disk store cannot be created.
    pub fn with_settings(
        region: &dyn Region,
        id: ClipboardId,
        settings: &ClipboardSettings,
    ) -> ClipboardResult<Self> {
        let store = create_store(settings, region.dimensions(), id)?;
        Ok(Self::assemble(region, id, store))
    }
}

impl<S: BlockStore> BlockArrayClipboard<S> {
    /// Creates a clipboard over an injected store.
    ///
    /// The store's offset is reset so the origin starts at the region minimum.
    ///
    /// # Errors
    ///
    /// Returns `ClipboardError::DimensionMismatch` if the store is not sized
    /// to the region.
    pub fn with_store(region: &dyn Region, mut store: S) -> ClipboardResult<Self> {
        let expected = region.dimensions();
        if store.dimensions() != expected {
            return Err(ClipboardError::DimensionMismatch {
                region: expected,
                store: store.dimensions(),
            });
        }
        store.set_offset(BlockVector3::ZERO)?;
        Ok(Self::assemble(region, ClipboardId::random(), store))
    }

    fn assemble(region: &dyn Region, id: ClipboardId, store: S) -> Self {
        let region = region.clone_box();
        let origin = region.minimum_point();
        tracing::debug!(
            "clipboard {} spans {} to {}",
            id,
            origin,
            region.maximum_point()
        );
        Self {
            id,
            region,
            origin,
            store,
            closed: false,
        }
    }

    /// Identity of this clipboard.
    #[must_use]
    pub fn id(&self) -> ClipboardId {
        self.id
    }

    /// The captured region. Never changes after construction.
    #[must_use]
    pub fn region(&self) -> &dyn Region {
        self.region.as_ref()
    }

    /// Lowest corner of the region.
    #[must_use]
    pub fn minimum_point(&self) -> BlockVector3 {
        self.region.minimum_point()
    }

    /// Highest corner of the region.
    #[must_use]
    pub fn maximum_point(&self) -> BlockVector3 {
        self.region.maximum_point()
    }

    /// Size of the region per axis.
    #[must_use]
    pub fn dimensions(&self) -> BlockVector3 {
        self.region.dimensions()
    }

    /// Current placement anchor.
    #[must_use]
    pub fn origin(&self) -> BlockVector3 {
        self.origin
    }

    /// Moves the placement anchor. Stored content stays put.
    ///
    /// # Errors
    ///
    /// Returns `ClipboardError::Closed` after close, or the store's error if
    /// it cannot record the new offset.
    pub fn set_origin(&mut self, origin: BlockVector3) -> ClipboardResult<()> {
        self.ensure_open()?;
        self.store.set_offset(origin - self.region.minimum_point())?;
        tracing::debug!("clipboard {} origin {} -> {}", self.id, self.origin, origin);
        self.origin = origin;
        Ok(())
    }

    /// Returns true once `close()` has run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Read access to the backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn ensure_open(&self) -> ClipboardResult<()> {
        if self.closed {
            return Err(ClipboardError::Closed);
        }
        Ok(())
    }

    #[inline]
    fn to_local(&self, position: BlockVector3) -> BlockVector3 {
        position - self.origin
    }

    #[inline]
    fn to_local_column(&self, column: BlockVector2) -> BlockVector2 {
        column - self.origin.to_2d()
    }

    // Entity positions are real-valued, so they go through `min + offset`
    // in f64 rather than the wrapped `origin`. Both agree unless
    // `origin - min` wrapped.
    fn entity_to_local(&self, location: Location) -> Location {
        location
            .unshifted(self.region.minimum_point())
            .unshifted(self.store.offset())
    }

    fn entity_to_world(&self, location: Location) -> Location {
        location
            .shifted(self.store.offset())
            .shifted(self.region.minimum_point())
    }

    /// Block state at a world position. Air outside the region.
    ///
    /// # Errors
    ///
    /// Returns the store's error, or `ClipboardError::Closed` after close.
    pub fn get_block(&self, position: BlockVector3) -> ClipboardResult<BlockState> {
        if !self.region.contains(position) {
            return Ok(BlockState::AIR);
        }
        self.ensure_open()?;
        self.store.get_block(self.to_local(position))
    }

    /// Block state and tile data at a world position. Air outside the region.
    ///
    /// # Errors
    ///
    /// Returns the store's error, or `ClipboardError::Closed` after close.
    pub fn get_full_block(&self, position: BlockVector3) -> ClipboardResult<BaseBlock> {
        if !self.region.contains(position) {
            return Ok(BaseBlock::default());
        }
        self.ensure_open()?;
        self.store.get_full_block(self.to_local(position))
    }

    /// Writes a block at a world position. `Ok(false)` outside the region.
    ///
    /// # Errors
    ///
    /// Returns the store's error, or `ClipboardError::Closed` after close.
    pub fn set_block(
        &mut self,
        position: BlockVector3,
        block: &BaseBlock,
    ) -> ClipboardResult<bool> {
        if !self.region.contains(position) {
            return Ok(false);
        }
        self.ensure_open()?;
        let local = self.to_local(position);
        self.store.set_block(local, block)
    }

    /// Attaches tile data at a world position. `Ok(false)` outside the region.
    ///
    /// # Errors
    ///
    /// Returns the store's error, or `ClipboardError::Closed` after close.
    pub fn set_tile(&mut self, position: BlockVector3, tile: CompoundTag) -> ClipboardResult<bool> {
        if !self.region.contains(position) {
            return Ok(false);
        }
        self.ensure_open()?;
        let local = self.to_local(position);
        self.store.set_tile(local, tile)
    }

    /// Returns true once any biome has been written.
    #[must_use]
    pub fn has_biomes(&self) -> bool {
        self.store.has_biomes()
    }

    /// Biome of a world column. Default biome outside the region footprint.
    ///
    /// # Errors
    ///
    /// Returns the store's error, or `ClipboardError::Closed` after close.
    pub fn get_biome(&self, column: BlockVector2) -> ClipboardResult<BiomeType> {
        if !self.region.contains_column(column) {
            return Ok(BiomeType::default());
        }
        self.ensure_open()?;
        self.store.get_biome(self.to_local_column(column))
    }

    /// Writes the biome of a world column. `Ok(false)` outside the footprint.
    ///
    /// # Errors
    ///
    /// Returns the store's error, or `ClipboardError::Closed` after close.
    pub fn set_biome(&mut self, column: BlockVector2, biome: BiomeType) -> ClipboardResult<bool> {
        if !self.region.contains_column(column) {
            return Ok(false);
        }
        self.ensure_open()?;
        let local = self.to_local_column(column);
        self.store.set_biome(local, biome)
    }

    /// `get_block` with raw world coordinates.
    ///
    /// # Errors
    ///
    /// Same as `get_block`.
    pub fn get_block_at(&self, x: i32, y: i32, z: i32) -> ClipboardResult<BlockState> {
        self.get_block(BlockVector3::new(x, y, z))
    }

    /// `get_full_block` with raw world coordinates.
    ///
    /// # Errors
    ///
    /// Same as `get_full_block`.
    pub fn get_full_block_at(&self, x: i32, y: i32, z: i32) -> ClipboardResult<BaseBlock> {
        self.get_full_block(BlockVector3::new(x, y, z))
    }

    /// `set_block` with raw world coordinates.
    ///
    /// # Errors
    ///
    /// Same as `set_block`.
    pub fn set_block_at(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        block: &BaseBlock,
    ) -> ClipboardResult<bool> {
        self.set_block(BlockVector3::new(x, y, z), block)
    }

    /// `set_tile` with raw world coordinates.
    ///
    /// # Errors
    ///
    /// Same as `set_tile`.
    pub fn set_tile_at(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        tile: CompoundTag,
    ) -> ClipboardResult<bool> {
        self.set_tile(BlockVector3::new(x, y, z), tile)
    }

    /// `get_biome` with raw world coordinates.
    ///
    /// # Errors
    ///
    /// Same as `get_biome`.
    pub fn get_biome_at(&self, x: i32, z: i32) -> ClipboardResult<BiomeType> {
        self.get_biome(BlockVector2::new(x, z))
    }

    /// `set_biome` with raw world coordinates.
    ///
    /// # Errors
    ///
    /// Same as `set_biome`.
    pub fn set_biome_at(&mut self, x: i32, z: i32, biome: BiomeType) -> ClipboardResult<bool> {
        self.set_biome(BlockVector2::new(x, z), biome)
    }

    /// Entities whose block position lies inside `region` (world space).
    ///
    /// # Errors
    ///
    /// Returns the store's error, or `ClipboardError::Closed` after close.
    pub fn entities(&self, region: &dyn Region) -> ClipboardResult<Vec<ClipboardEntity>> {
        self.ensure_open()?;
        Ok(self
            .store
            .entities()?
            .into_iter()
            .map(|e| (self.entity_to_world(e.location), e))
            .filter(|(location, _)| region.contains(location.block_position()))
            .map(|(location, e)| ClipboardEntity::new(self.id, e.id, location, e.state))
            .collect())
    }

    /// Stores a copy of `entity` at a world location.
    ///
    /// Returns `Ok(None)` if the store refuses the entity.
    ///
    /// # Errors
    ///
    /// Returns the store's error, or `ClipboardError::Closed` after close.
    pub fn create_entity(
        &mut self,
        location: Location,
        entity: &BaseEntity,
    ) -> ClipboardResult<Option<ClipboardEntity>> {
        self.ensure_open()?;
        let local = self.entity_to_local(location);
        Ok(self
            .store
            .create_entity(local, entity)?
            .map(|e| ClipboardEntity::new(self.id, e.id, location, e.state)))
    }

    /// Removes the entity with identity `id`. `position` is a lookup hint in
    /// world space; removing an unknown entity is not an error.
    ///
    /// # Errors
    ///
    /// Returns the store's error, or `ClipboardError::Closed` after close.
    pub fn remove_entity(&mut self, position: BlockVector3, id: Uuid) -> ClipboardResult<()> {
        self.ensure_open()?;
        let local = self.to_local(position);
        self.store.remove_entity(local, id)?;
        Ok(())
    }

    /// Removes the entity behind a handle issued by this clipboard.
    ///
    /// # Errors
    ///
    /// Returns `ClipboardError::ForeignEntity` for a handle from another
    /// clipboard, otherwise the same as `remove_entity`.
    pub fn remove_entity_value(&mut self, entity: &ClipboardEntity) -> ClipboardResult<()> {
        if entity.clipboard_id() != self.id {
            return Err(ClipboardError::ForeignEntity);
        }
        self.remove_entity(entity.location().block_position(), entity.id())
    }

    /// Releases the backing store. Safe to call repeatedly.
    ///
    /// # Errors
    ///
    /// Returns the store's error if it cannot release cleanly. The clipboard
    /// counts as closed either way.
    pub fn close(&mut self) -> ClipboardResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        tracing::debug!("closing clipboard {}", self.id);
        self.store.close()
    }
}

impl<S: BlockStore> Drop for BlockArrayClipboard<S> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!("clipboard {} failed to close on drop: {}", self.id, e);
        }
    }
}

impl<S: BlockStore> fmt::Debug for BlockArrayClipboard<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockArrayClipboard")
            .field("id", &self.id)
            .field("region", &self.region)
            .field("origin", &self.origin)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

/// A clipboard is itself a store. Its local space is relative to the
/// origin, so a local position `p` is world position `p + origin` and the
/// offset is `origin - region.min`. Bounds and close checks still apply,
/// which lets one clipboard back another.
impl<S: BlockStore> BlockStore for BlockArrayClipboard<S> {
    fn dimensions(&self) -> BlockVector3 {
        self.region.dimensions()
    }

    fn offset(&self) -> BlockVector3 {
        self.origin - self.region.minimum_point()
    }

    fn set_offset(&mut self, offset: BlockVector3) -> ClipboardResult<()> {
        let origin = self.region.minimum_point() + offset;
        self.set_origin(origin)
    }

    fn get_block(&self, position: BlockVector3) -> ClipboardResult<BlockState> {
        BlockArrayClipboard::get_block(self, position + self.origin)
    }

    fn get_full_block(&self, position: BlockVector3) -> ClipboardResult<BaseBlock> {
        BlockArrayClipboard::get_full_block(self, position + self.origin)
    }

    fn set_block(&mut self, position: BlockVector3, block: &BaseBlock) -> ClipboardResult<bool> {
        let world = position + self.origin;
        BlockArrayClipboard::set_block(self, world, block)
    }

    fn set_tile(&mut self, position: BlockVector3, tile: CompoundTag) -> ClipboardResult<bool> {
        let world = position + self.origin;
        BlockArrayClipboard::set_tile(self, world, tile)
    }

    fn has_biomes(&self) -> bool {
        BlockArrayClipboard::has_biomes(self)
    }

    fn get_biome(&self, column: BlockVector2) -> ClipboardResult<BiomeType> {
        BlockArrayClipboard::get_biome(self, column + self.origin.to_2d())
    }

    fn set_biome(&mut self, column: BlockVector2, biome: BiomeType) -> ClipboardResult<bool> {
        let world = column + self.origin.to_2d();
        BlockArrayClipboard::set_biome(self, world, biome)
    }

    fn entities(&self) -> ClipboardResult<Vec<StoredEntity>> {
        self.ensure_open()?;
        self.store.entities()
    }

    fn create_entity(
        &mut self,
        location: Location,
        entity: &BaseEntity,
    ) -> ClipboardResult<Option<StoredEntity>> {
        self.ensure_open()?;
        self.store.create_entity(location, entity)
    }

    fn remove_entity(&mut self, position: BlockVector3, id: Uuid) -> ClipboardResult<bool> {
        self.ensure_open()?;
        self.store.remove_entity(position, id)
    }

    fn close(&mut self) -> ClipboardResult<()> {
        BlockArrayClipboard::close(self)
    }
}
