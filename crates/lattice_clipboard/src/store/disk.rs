//! # Disk Store
//!
//! Blocks and biomes live in a memory-mapped file, so clipboard size is
//! bounded by disk rather than heap. Tiles and entities stay in memory.
//!
//! ## File Format
//!
//! ```text
//! [4 bytes: magic "LCLB"]
//! [4 bytes: version]
//! [12 bytes: dimensions (3 x i32)]
//! [12 bytes: offset (3 x i32)]
//! [4 bytes: flags (bit 0 = biomes written)]
//! [4 bytes: CRC32 of the 36 bytes above]
//! [padding to 64 bytes]
//! [volume * 4 bytes: block states, layout order]
//! [width * length bytes: biome IDs]
//! ```
//!
//! All integers little-endian. The header is rewritten on every offset or
//! flag change, so a reopened file always reflects the last placement.
//!
//! ## Release
//!
//! `close()` flushes the mapping and drops it together with the file
//! handle. Any access afterwards fails with `ClipboardError::Closed`.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use lattice_core::{
    BaseBlock, BaseEntity, BiomeType, BlockState, BlockVector2, BlockVector3, CompoundTag,
    Location,
};
use memmap2::MmapMut;
use uuid::Uuid;

use super::entity_table::EntityTable;
use super::layout::StoreLayout;
use super::{apply_tile, BlockStore, StoredEntity};
use crate::error::{ClipboardError, ClipboardResult};

/// Magic bytes identifying a clipboard page file.
const DISK_MAGIC: &[u8; 4] = b"LCLB";

/// Current file format version.
const DISK_VERSION: u32 = 1;

/// Bytes reserved for the header.
const HEADER_LEN: usize = 64;

/// Header bytes covered by the checksum.
const HEADER_CHECKED_LEN: usize = 36;

const FLAG_BIOMES: u32 = 1;

const BLOCK_BYTES: usize = std::mem::size_of::<BlockState>();

/// File extension for page files.
pub const FILE_EXTENSION: &str = "bcd";

/// Memory-mapped backing store.
#[derive(Debug)]
pub struct DiskStore {
    path: PathBuf,
    layout: StoreLayout,
    /// `None` once closed.
    map: Option<MmapMut>,
    file: Option<File>,
    has_biomes: bool,
    tiles: HashMap<usize, CompoundTag>,
    entities: EntityTable,
}

impl DiskStore {
    /// Creates (or truncates) a page file sized for `dimensions`.
    ///
    /// # Errors
    ///
    /// Returns `ClipboardError::InvalidDimensions` for an empty volume or one
    /// whose file size overflows, and `ClipboardError::Io` if the file cannot be created or mapped.
    pub fn create(path: impl AsRef<Path>, dimensions: BlockVector3) -> ClipboardResult<Self> {
        let path = path.as_ref().to_path_buf();
        let layout = StoreLayout::new(dimensions)?;
        let len = Self::file_len(&layout)
            .and_then(|len| u64::try_from(len).ok())
            .ok_or(ClipboardError::InvalidDimensions(dimensions))?;

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        file.set_len(len)?;

        let mut store = Self {
            map: Some(Self::map(&file)?),
            file: Some(file),
            path,
            layout,
            has_biomes: false,
            tiles: HashMap::new(),
            entities: EntityTable::default(),
        };
        store.write_header()?;
        tracing::info!("created disk store {} ({})", store.path.display(), dimensions);
        Ok(store)
    }

    /// Reopens an existing page file, keeping its blocks, biomes and offset.
    ///
    /// # Errors
    ///
    /// Returns `ClipboardError::Corrupted` if the header or file size is
    /// invalid and `ClipboardError::Io` if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> ClipboardResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().read(true).write(true).open(&path)?;
        let map = Self::map(&file)?;

        let header = map
            .get(..HEADER_LEN)
            .ok_or_else(|| ClipboardError::Corrupted("file shorter than header".to_string()))?;
        if &header[0..4] != DISK_MAGIC {
            return Err(ClipboardError::Corrupted("invalid magic".to_string()));
        }
        let version = read_u32(header, 4);
        if version != DISK_VERSION {
            return Err(ClipboardError::Corrupted(format!("unsupported version: {version}")));
        }
        let stored_crc = read_u32(header, HEADER_CHECKED_LEN);
        if crc32fast::hash(&header[..HEADER_CHECKED_LEN]) != stored_crc {
            return Err(ClipboardError::Corrupted("header CRC mismatch".to_string()));
        }

        let dimensions =
            BlockVector3::new(read_i32(header, 8), read_i32(header, 12), read_i32(header, 16));
        let offset =
            BlockVector3::new(read_i32(header, 20), read_i32(header, 24), read_i32(header, 28));
        let flags = read_u32(header, 32);

        let mut layout = StoreLayout::new(dimensions)
            .map_err(|_| ClipboardError::Corrupted(format!("invalid dimensions {dimensions}")))?;
        layout.set_offset(offset);

        let expected = Self::file_len(&layout).ok_or_else(|| {
            ClipboardError::Corrupted(format!("dimensions {dimensions} exceed addressable size"))
        })?;
        if map.len() < expected {
            return Err(ClipboardError::Corrupted(format!(
                "expected {expected} bytes, found {}",
                map.len()
            )));
        }

        tracing::info!("reopened disk store {} ({})", path.display(), dimensions);
        Ok(Self {
            path,
            layout,
            map: Some(map),
            file: Some(file),
            has_biomes: flags & FLAG_BIOMES != 0,
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

    /// Path of the page file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true once `close()` has run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.map.is_none()
    }

    /// Total file size, `None` if it does not fit in `usize`.
    fn file_len(layout: &StoreLayout) -> Option<usize> {
        layout
            .volume()
            .checked_mul(BLOCK_BYTES)?
            .checked_add(HEADER_LEN)?
            .checked_add(layout.area())
    }

    fn biome_start(&self) -> usize {
        HEADER_LEN + self.layout.volume() * BLOCK_BYTES
    }

    #[allow(unsafe_code)]
    fn map(file: &File) -> ClipboardResult<MmapMut> {
        // SAFETY: the file is owned by this store for its whole lifetime and
        // is not resized while mapped.
        let map = unsafe { MmapMut::map_mut(file)? };
        Ok(map)
    }

    fn pages(&self) -> ClipboardResult<&MmapMut> {
        self.map.as_ref().ok_or(ClipboardError::Closed)
    }

    fn pages_mut(&mut self) -> ClipboardResult<&mut MmapMut> {
        self.map.as_mut().ok_or(ClipboardError::Closed)
    }

    fn write_header(&mut self) -> ClipboardResult<()> {
        let mut header = [0u8; HEADER_LEN];
        let d = self.layout.dimensions();
        let o = self.layout.offset();
        let flags = if self.has_biomes { FLAG_BIOMES } else { 0 };

        header[0..4].copy_from_slice(DISK_MAGIC);
        header[4..8].copy_from_slice(&DISK_VERSION.to_le_bytes());
        for (i, v) in [d.x, d.y, d.z, o.x, o.y, o.z].into_iter().enumerate() {
            let at = 8 + i * 4;
            header[at..at + 4].copy_from_slice(&v.to_le_bytes());
        }
        header[32..36].copy_from_slice(&flags.to_le_bytes());
        let crc = crc32fast::hash(&header[..HEADER_CHECKED_LEN]);
        header[36..40].copy_from_slice(&crc.to_le_bytes());

        self.pages_mut()?[..HEADER_LEN].copy_from_slice(&header);
        Ok(())
    }
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn read_i32(bytes: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

impl BlockStore for DiskStore {
    fn dimensions(&self) -> BlockVector3 {
        self.layout.dimensions()
    }

    fn offset(&self) -> BlockVector3 {
        self.layout.offset()
    }

    fn set_offset(&mut self, offset: BlockVector3) -> ClipboardResult<()> {
        self.pages()?;
        self.layout.set_offset(offset);
        self.write_header()
    }

    fn get_block(&self, position: BlockVector3) -> ClipboardResult<BlockState> {
        let pages = self.pages()?;
        let Some(i) = self.layout.index(position) else {
            return Ok(BlockState::AIR);
        };
        let at = HEADER_LEN + i * BLOCK_BYTES;
        Ok(bytemuck::pod_read_unaligned(&pages[at..at + BLOCK_BYTES]))
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
        self.pages()?;
        let Some(i) = self.layout.index(position) else {
            return Ok(false);
        };
        let at = HEADER_LEN + i * BLOCK_BYTES;
        let state = block.state();
        self.pages_mut()?[at..at + BLOCK_BYTES].copy_from_slice(bytemuck::bytes_of(&state));
        apply_tile(&mut self.tiles, i, block);
        Ok(true)
    }

    fn set_tile(&mut self, position: BlockVector3, tile: CompoundTag) -> ClipboardResult<bool> {
        self.pages()?;
        let Some(i) = self.layout.index(position) else {
            return Ok(false);
        };
        self.tiles.insert(i, tile);
        Ok(true)
    }

    fn has_biomes(&self) -> bool {
        self.has_biomes
    }

    fn get_biome(&self, column: BlockVector2) -> ClipboardResult<BiomeType> {
        let pages = self.pages()?;
        let Some(i) = self.layout.column_index(column) else {
            return Ok(BiomeType::default());
        };
        let raw = pages[self.biome_start() + i];
        BiomeType::from_u8(raw)
            .ok_or_else(|| ClipboardError::Corrupted(format!("unknown biome id {raw}")))
    }

    fn set_biome(&mut self, column: BlockVector2, biome: BiomeType) -> ClipboardResult<bool> {
        self.pages()?;
        let Some(i) = self.layout.column_index(column) else {
            return Ok(false);
        };
        let at = self.biome_start() + i;
        self.pages_mut()?[at] = biome.as_u8();
        if !self.has_biomes {
            self.has_biomes = true;
            self.write_header()?;
        }
        Ok(true)
    }

    fn entities(&self) -> ClipboardResult<Vec<StoredEntity>> {
        self.pages()?;
        Ok(self.entities.list(&self.layout))
    }

    fn create_entity(
        &mut self,
        location: Location,
        entity: &BaseEntity,
    ) -> ClipboardResult<Option<StoredEntity>> {
        self.pages()?;
        Ok(self.entities.create(&self.layout, location, entity))
    }

    fn remove_entity(&mut self, position: BlockVector3, id: Uuid) -> ClipboardResult<bool> {
        self.pages()?;
        Ok(self.entities.remove(position, id))
    }

    fn close(&mut self) -> ClipboardResult<()> {
        let Some(map) = self.map.take() else {
            return Ok(());
        };
        map.flush()?;
        drop(map);
        if let Some(file) = self.file.take() {
            file.sync_all()?;
        }
        tracing::info!("closed disk store {}", self.path.display());
        Ok(())
    }
}
