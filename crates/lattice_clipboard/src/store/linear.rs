//! # Linear Store
//!
//! Dense in-memory array, one `BlockState` per position. Fastest variant,
//! memory cost is `4 * volume` bytes up front. Biomes are allocated on the
//! first biome write.

use std::collections::HashMap;

use lattice_core::{
    BaseBlock, BaseEntity, BiomeType, BlockState, BlockVector2, BlockVector3, CompoundTag,
    Location,
};
use uuid::Uuid;

use super::entity_table::EntityTable;
use super::layout::StoreLayout;
use super::{apply_tile, BlockStore, StoredEntity};
use crate::error::ClipboardResult;

/// Dense in-memory backing store.
#[derive(Clone, Debug)]
pub struct LinearStore {
    layout: StoreLayout,
    blocks: Vec<BlockState>,
    biomes: Option<Vec<BiomeType>>,
    tiles: HashMap<usize, CompoundTag>,
    entities: EntityTable,
}

impl LinearStore {
    /// Creates an all-air store.
    ///
    /// # Errors
    ///
    /// Returns `ClipboardError::InvalidDimensions` for an empty or oversized volume.
    pub fn new(dimensions: BlockVector3) -> ClipboardResult<Self> {
        let layout = StoreLayout::new(dimensions)?;
        Ok(Self {
            blocks: vec![BlockState::AIR; layout.volume()],
            layout,
            biomes: None,
            tiles: HashMap::new(),
            entities: EntityTable::default(),
        })
    }

    /// Caps the number of entities the store accepts.
    #[must_use]
    pub fn with_entity_limit(mut self, max_entities: Option<usize>) -> Self {
        self.entities.set_limit(max_entities);
        self
    }

    /// Number of positions carrying tile data.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }
}

impl BlockStore for LinearStore {
    fn dimensions(&self) -> BlockVector3 {
        self.layout.dimensions()
    }

    fn offset(&self) -> BlockVector3 {
        self.layout.offset()
    }

    fn set_offset(&mut self, offset: BlockVector3) -> ClipboardResult<()> {
        self.layout.set_offset(offset);
        Ok(())
    }

    #[inline]
    fn get_block(&self, position: BlockVector3) -> ClipboardResult<BlockState> {
        Ok(self
            .layout
            .index(position)
            .map_or(BlockState::AIR, |i| self.blocks[i]))
    }

    fn get_full_block(&self, position: BlockVector3) -> ClipboardResult<BaseBlock> {
        let Some(i) = self.layout.index(position) else {
            return Ok(BaseBlock::default());
        };
        Ok(match self.tiles.get(&i) {
            Some(tile) => BaseBlock::with_tile(self.blocks[i], tile.clone()),
            None => BaseBlock::new(self.blocks[i]),
        })
    }

    #[inline]
    fn set_block(&mut self, position: BlockVector3, block: &BaseBlock) -> ClipboardResult<bool> {
        let Some(i) = self.layout.index(position) else {
            return Ok(false);
        };
        self.blocks[i] = block.state();
        apply_tile(&mut self.tiles, i, block);
        Ok(true)
    }

    fn set_tile(&mut self, position: BlockVector3, tile: CompoundTag) -> ClipboardResult<bool> {
        let Some(i) = self.layout.index(position) else {
            return Ok(false);
        };
        self.tiles.insert(i, tile);
        Ok(true)
    }

    fn has_biomes(&self) -> bool {
        self.biomes.is_some()
    }

    fn get_biome(&self, column: BlockVector2) -> ClipboardResult<BiomeType> {
        Ok(match (&self.biomes, self.layout.column_index(column)) {
            (Some(biomes), Some(i)) => biomes[i],
            _ => BiomeType::default(),
        })
    }

    fn set_biome(&mut self, column: BlockVector2, biome: BiomeType) -> ClipboardResult<bool> {
        let Some(i) = self.layout.column_index(column) else {
            return Ok(false);
        };
        let area = self.layout.area();
        self.biomes.get_or_insert_with(|| vec![BiomeType::default(); area])[i] = biome;
        Ok(true)
    }

    fn entities(&self) -> ClipboardResult<Vec<StoredEntity>> {
        Ok(self.entities.list(&self.layout))
    }

    fn create_entity(
        &mut self,
        location: Location,
        entity: &BaseEntity,
    ) -> ClipboardResult<Option<StoredEntity>> {
        Ok(self.entities.create(&self.layout, location, entity))
    }

    fn remove_entity(&mut self, position: BlockVector3, id: Uuid) -> ClipboardResult<bool> {
        Ok(self.entities.remove(position, id))
    }
}
