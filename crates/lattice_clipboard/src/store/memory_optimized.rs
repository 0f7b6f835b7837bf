//! # Memory-Optimized Store
//!
//! Keeps each Y layer in one of three states:
//!
//! ```text
//! Empty ──write──> Hot (Vec<BlockState>) ──evict──> Cold (LZ4 bytes)
//!                     ^                                  │
//!                     └──────────────write───────────────┘
//! ```
//!
//! At most `hot_layers` layers are uncompressed; the least recently written
//! one is compressed when the limit is exceeded. Reads of a cold layer
//! decompress it into a single-slot cache, so sequential reads within one
//! layer pay for decompression once.
//!
//! Terrain-like data compresses roughly 10:1, which is the point of this
//! variant for large copies.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use lattice_core::{
    BaseBlock, BaseEntity, BiomeType, BlockState, BlockVector2, BlockVector3, CompoundTag,
    Location,
};
use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use uuid::Uuid;

use super::entity_table::EntityTable;
use super::layout::StoreLayout;
use super::{apply_tile, BlockStore, StoredEntity};
use crate::error::{ClipboardError, ClipboardResult};

const BLOCK_BYTES: usize = std::mem::size_of::<BlockState>();

/// Storage state of one Y layer.
#[derive(Clone, Debug)]
enum Layer {
    /// Never written, all air.
    Empty,
    /// Uncompressed.
    Hot(Vec<BlockState>),
    /// LZ4-compressed with the size prepended.
    Cold(Vec<u8>),
}

/// Snapshot of layer states, for diagnostics and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayerStats {
    /// Layers never written.
    pub empty: usize,
    /// Uncompressed layers.
    pub hot: usize,
    /// Compressed layers.
    pub cold: usize,
    /// Total compressed bytes.
    pub compressed_bytes: usize,
}

/// Layer-compressed in-memory backing store.
#[derive(Debug)]
pub struct MemoryOptimizedStore {
    layout: StoreLayout,
    layers: Vec<Layer>,
    /// Hot layer indices, least recently written first.
    hot_order: VecDeque<usize>,
    hot_limit: usize,
    /// Last decompressed cold layer.
    read_cache: RefCell<Option<(usize, Vec<BlockState>)>>,
    biomes: Option<Vec<BiomeType>>,
    tiles: HashMap<usize, CompoundTag>,
    entities: EntityTable,
}

impl MemoryOptimizedStore {
    /// Creates an all-air store keeping at most `hot_layers` layers uncompressed.
    ///
    /// # Errors
    ///
    /// Returns `ClipboardError::InvalidDimensions` for an empty volume, or
    /// `ClipboardError::InvalidConfig` if `hot_layers` is zero.
    pub fn new(dimensions: BlockVector3, hot_layers: usize) -> ClipboardResult<Self> {
        if hot_layers == 0 {
            return Err(ClipboardError::InvalidConfig(
                "hot_layers must be at least 1".to_string(),
            ));
        }
        let layout = StoreLayout::new(dimensions)?;
        Ok(Self {
            layers: vec![Layer::Empty; layout.height()],
            layout,
            hot_order: VecDeque::with_capacity(hot_layers + 1),
            hot_limit: hot_layers,
            read_cache: RefCell::new(None),
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

    /// Current layer states.
    #[must_use]
    pub fn layer_stats(&self) -> LayerStats {
        let mut stats = LayerStats::default();
        for layer in &self.layers {
            match layer {
                Layer::Empty => stats.empty += 1,
                Layer::Hot(_) => stats.hot += 1,
                Layer::Cold(bytes) => {
                    stats.cold += 1;
                    stats.compressed_bytes += bytes.len();
                }
            }
        }
        stats
    }

    /// Compresses every hot layer.
    pub fn compress_all(&mut self) {
        while let Some(y) = self.hot_order.pop_front() {
            self.freeze(y);
        }
    }

    fn decompress(&self, y: usize, bytes: &[u8]) -> ClipboardResult<Vec<BlockState>> {
        let raw = decompress_size_prepended(bytes)
            .map_err(|e| ClipboardError::Corrupted(format!("layer {y}: {e}")))?;
        if raw.len() != self.layout.area() * BLOCK_BYTES {
            return Err(ClipboardError::Corrupted(format!(
                "layer {y}: expected {} bytes, got {}",
                self.layout.area() * BLOCK_BYTES,
                raw.len()
            )));
        }
        Ok(raw
            .chunks_exact(BLOCK_BYTES)
            .map(bytemuck::pod_read_unaligned::<BlockState>)
            .collect())
    }

    fn freeze(&mut self, y: usize) {
        if let Layer::Hot(blocks) = &self.layers[y] {
            let compressed = compress_prepend_size(bytemuck::cast_slice::<BlockState, u8>(blocks));
            self.layers[y] = Layer::Cold(compressed);
        }
    }

    /// Makes layer `y` hot and returns it.
    fn thaw(&mut self, y: usize) -> ClipboardResult<&mut Vec<BlockState>> {
        let blocks = match &self.layers[y] {
            Layer::Hot(_) => None,
            Layer::Empty => Some(vec![BlockState::AIR; self.layout.area()]),
            Layer::Cold(bytes) => {
                let cache = self.read_cache.get_mut();
                let cached = if matches!(cache, Some((cached_y, _)) if *cached_y == y) {
                    cache.take().map(|(_, blocks)| blocks)
                } else {
                    None
                };
                match cached {
                    Some(blocks) => Some(blocks),
                    None => Some(self.decompress(y, bytes)?),
                }
            }
        };

        if let Some(blocks) = blocks {
            self.layers[y] = Layer::Hot(blocks);
            self.hot_order.push_back(y);
            while self.hot_order.len() > self.hot_limit {
                if let Some(oldest) = self.hot_order.pop_front() {
                    self.freeze(oldest);
                }
            }
        } else if let Some(pos) = self.hot_order.iter().position(|&h| h == y) {
            self.hot_order.remove(pos);
            self.hot_order.push_back(y);
        }

        match &mut self.layers[y] {
            Layer::Hot(blocks) => Ok(blocks),
            _ => Err(ClipboardError::Corrupted(format!("layer {y} failed to thaw"))),
        }
    }
}

impl BlockStore for MemoryOptimizedStore {
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

    fn get_block(&self, position: BlockVector3) -> ClipboardResult<BlockState> {
        let Some(index) = self.layout.index(position) else {
            return Ok(BlockState::AIR);
        };
        let (y, i) = (index / self.layout.area(), index % self.layout.area());
        match &self.layers[y] {
            Layer::Empty => Ok(BlockState::AIR),
            Layer::Hot(blocks) => Ok(blocks[i]),
            Layer::Cold(bytes) => {
                let mut cache = self.read_cache.borrow_mut();
                if let Some((cached_y, blocks)) = cache.as_ref() {
                    if *cached_y == y {
                        return Ok(blocks[i]);
                    }
                }
                let blocks = self.decompress(y, bytes)?;
                let block = blocks[i];
                *cache = Some((y, blocks));
                Ok(block)
            }
        }
    }

    fn get_full_block(&self, position: BlockVector3) -> ClipboardResult<BaseBlock> {
        let state = self.get_block(position)?;
        let tile = self
            .layout
            .index(position)
            .and_then(|i| self.tiles.get(&i))
            .cloned();
        Ok(match tile {
            Some(tile) => BaseBlock::with_tile(state, tile),
            None => BaseBlock::new(state),
        })
    }

    fn set_block(&mut self, position: BlockVector3, block: &BaseBlock) -> ClipboardResult<bool> {
        let Some(index) = self.layout.index(position) else {
            return Ok(false);
        };
        let area = self.layout.area();
        let (y, i) = (index / area, index % area);
        let state = block.state();
        if !(state.is_air() && matches!(self.layers[y], Layer::Empty)) {
            self.thaw(y)?[i] = state;
        }
        apply_tile(&mut self.tiles, index, block);
        Ok(true)
    }

    fn set_tile(&mut self, position: BlockVector3, tile: CompoundTag) -> ClipboardResult<bool> {
        let Some(index) = self.layout.index(position) else {
            return Ok(false);
        };
        self.tiles.insert(index, tile);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_air_writes_do_not_allocate() {
        let mut s = MemoryOptimizedStore::new(BlockVector3::new(8, 8, 8), 2).unwrap();
        assert!(s.set_block(BlockVector3::new(1, 1, 1), &BlockState::AIR.into()).unwrap());
        assert_eq!(s.layer_stats().empty, 8);
    }

    #[test]
    fn test_hot_limit_compresses_oldest() {
        let mut s = MemoryOptimizedStore::new(BlockVector3::new(8, 4, 8), 2).unwrap();
        for y in 0..4 {
            s.set_block(BlockVector3::new(0, y, 0), &BlockState::new(10 + y as u16).into())
                .unwrap();
        }
        let stats = s.layer_stats();
        assert_eq!(stats.hot, 2);
        assert_eq!(stats.cold, 2);
        assert!(stats.compressed_bytes > 0);

        for y in 0..4 {
            assert_eq!(
                s.get_block(BlockVector3::new(0, y, 0)).unwrap(),
                BlockState::new(10 + y as u16)
            );
        }
    }

    #[test]
    fn test_cold_layer_rewrite() {
        let mut s = MemoryOptimizedStore::new(BlockVector3::new(4, 3, 4), 1).unwrap();
        s.set_block(BlockVector3::new(1, 0, 1), &BlockState::STONE.into()).unwrap();
        s.set_block(BlockVector3::new(1, 1, 1), &BlockState::DIRT.into()).unwrap();
        assert_eq!(s.get_block(BlockVector3::new(1, 0, 1)).unwrap(), BlockState::STONE);

        s.set_block(BlockVector3::new(2, 0, 2), &BlockState::WOOD.into()).unwrap();
        assert_eq!(s.get_block(BlockVector3::new(1, 0, 1)).unwrap(), BlockState::STONE);
        assert_eq!(s.get_block(BlockVector3::new(2, 0, 2)).unwrap(), BlockState::WOOD);
        assert_eq!(s.get_block(BlockVector3::new(1, 1, 1)).unwrap(), BlockState::DIRT);
    }

    #[test]
    fn test_compress_all() {
        let mut s = MemoryOptimizedStore::new(BlockVector3::new(16, 4, 16), 4).unwrap();
        for y in 0..4 {
            for x in 0..16 {
                s.set_block(BlockVector3::new(x, y, 3), &BlockState::STONE.into()).unwrap();
            }
        }
        s.compress_all();
        let stats = s.layer_stats();
        assert_eq!(stats.hot, 0);
        assert_eq!(stats.cold, 4);
        assert!(stats.compressed_bytes < 4 * 16 * 16 * BLOCK_BYTES);
        assert_eq!(s.get_block(BlockVector3::new(15, 3, 3)).unwrap(), BlockState::STONE);
        assert_eq!(s.get_block(BlockVector3::new(15, 3, 4)).unwrap(), BlockState::AIR);
    }

    #[test]
    fn test_corrupt_layer_fails_without_partial_write() {
        let mut s = MemoryOptimizedStore::new(BlockVector3::new(4, 2, 4), 1).unwrap();
        s.layers[1] = Layer::Cold(vec![0xFF; 3]);
        let pos = BlockVector3::new(1, 1, 1);

        assert!(matches!(s.get_block(pos), Err(ClipboardError::Corrupted(_))));
        let chest = BaseBlock::with_tile(BlockState::CHEST, CompoundTag::new());
        assert!(matches!(s.set_block(pos, &chest), Err(ClipboardError::Corrupted(_))));
        assert!(s.tiles.is_empty());
        assert_eq!(s.get_block(BlockVector3::new(1, 0, 1)).unwrap(), BlockState::AIR);
    }

    #[test]
    fn test_corrupt_layer_surfaces_through_clipboard() {
        use crate::clipboard::BlockArrayClipboard;
        use lattice_core::CuboidRegion;

        let mut s = MemoryOptimizedStore::new(BlockVector3::new(4, 2, 4), 1).unwrap();
        s.layers[0] = Layer::Cold(vec![0xFF; 3]);
        let region = CuboidRegion::new(BlockVector3::new(10, 0, 10), BlockVector3::new(13, 1, 13));
        let mut clip = BlockArrayClipboard::with_store(&region, s).unwrap();

        assert!(matches!(clip.get_block_at(10, 0, 10), Err(ClipboardError::Corrupted(_))));
        assert!(matches!(
            clip.set_block_at(10, 0, 10, &BlockState::STONE.into()),
            Err(ClipboardError::Corrupted(_))
        ));
        assert_eq!(clip.get_block_at(9, 0, 10).unwrap(), BlockState::AIR);
        assert!(!clip.set_block_at(9, 0, 10, &BlockState::STONE.into()).unwrap());
        assert!(clip.set_block_at(10, 1, 10, &BlockState::STONE.into()).unwrap());
    }

    #[test]
    fn test_rejects_zero_hot_layers() {
        assert!(matches!(
            MemoryOptimizedStore::new(BlockVector3::ONE, 0),
            Err(ClipboardError::InvalidConfig(_))
        ));
    }
}
