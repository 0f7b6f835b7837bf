//! Integration tests for the clipboard overlay across every store variant.

use lattice_clipboard::{
    BlockArrayClipboard, BlockStore, ClipboardError, ClipboardId, ClipboardResult,
    ClipboardSettings, DiskStore, LinearStore, MemoryOptimizedStore, StorageKind, StoredEntity,
};
use lattice_core::{
    BaseBlock, BaseEntity, BiomeType, BlockState, BlockVector2, BlockVector3, CompoundTag,
    CuboidRegion, Location, PointSetRegion, Region,
};

use uuid::Uuid;

const ALL_KINDS: [StorageKind; 3] = [
    StorageKind::Linear,
    StorageKind::MemoryOptimized,
    StorageKind::Disk,
];

fn temp_dir() -> std::path::PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("test_clipboard_{id}"))
}

fn settings(storage: StorageKind) -> ClipboardSettings {
    ClipboardSettings {
        storage,
        disk_directory: temp_dir(),
        hot_layers: 2,
        ..ClipboardSettings::default()
    }
}

fn region() -> CuboidRegion {
    CuboidRegion::new(BlockVector3::new(10, 20, 30), BlockVector3::new(13, 23, 33))
}

fn clipboard(storage: StorageKind) -> (BlockArrayClipboard, ClipboardSettings) {
    let settings = settings(storage);
    let clip =
        BlockArrayClipboard::with_settings(&region(), ClipboardId::random(), &settings).unwrap();
    (clip, settings)
}

fn cleanup(settings: &ClipboardSettings) {
    std::fs::remove_dir_all(&settings.disk_directory).ok();
}

#[test]
fn test_worked_example_every_store() {
    for kind in ALL_KINDS {
        let (mut clip, settings) = clipboard(kind);
        let inside = BlockVector3::new(11, 21, 31);
        let outside = BlockVector3::new(9, 20, 30);

        assert!(clip.set_block(inside, &BlockState::STONE.into()).unwrap(), "{kind:?}");
        assert_eq!(clip.get_block(inside).unwrap(), BlockState::STONE, "{kind:?}");
        assert_eq!(clip.get_block(outside).unwrap(), BlockState::AIR, "{kind:?}");
        assert!(!clip.set_block(outside, &BlockState::STONE.into()).unwrap(), "{kind:?}");
        assert_eq!(
            clip.store().get_block(BlockVector3::new(1, 1, 1)).unwrap(),
            BlockState::STONE,
            "{kind:?}"
        );

        clip.close().unwrap();
        cleanup(&settings);
    }
}

#[test]
fn test_outside_reads_are_air_for_any_origin() {
    for kind in ALL_KINDS {
        let (mut clip, settings) = clipboard(kind);
        for p in region().points() {
            clip.set_block(p, &BlockState::DIRT.into()).unwrap();
        }
        for origin in [
            BlockVector3::ZERO,
            BlockVector3::new(12, 22, 32),
            BlockVector3::new(-50, 7, 900),
        ] {
            clip.set_origin(origin).unwrap();
            for p in [
                BlockVector3::new(9, 21, 31),
                BlockVector3::new(14, 21, 31),
                BlockVector3::new(11, 19, 31),
                BlockVector3::new(11, 24, 31),
                BlockVector3::new(11, 21, 29),
                BlockVector3::new(11, 21, 34),
                origin,
            ] {
                if !region().contains(p) {
                    assert_eq!(clip.get_block(p).unwrap(), BlockState::AIR, "{kind:?} {p}");
                }
            }
        }
        clip.close().unwrap();
        cleanup(&settings);
    }
}

#[test]
fn test_every_inside_write_reads_back() {
    for kind in ALL_KINDS {
        let (mut clip, settings) = clipboard(kind);
        for (i, p) in region().points().enumerate() {
            let state = BlockState::new(u16::try_from(i % 200).unwrap() + 1);
            assert!(clip.set_block(p, &state.into()).unwrap());
        }
        for (i, p) in region().points().enumerate() {
            let state = BlockState::new(u16::try_from(i % 200).unwrap() + 1);
            assert_eq!(clip.get_block(p).unwrap(), state, "{kind:?} {p}");
        }
        clip.close().unwrap();
        cleanup(&settings);
    }
}

#[test]
fn test_origin_change_is_invisible_to_reads() {
    for kind in ALL_KINDS {
        let (mut clip, settings) = clipboard(kind);
        let a = BlockVector3::new(10, 20, 30);
        let b = BlockVector3::new(13, 23, 33);
        let mut tag = CompoundTag::new();
        tag.insert_string("Text", "hello");

        clip.set_block(a, &BlockState::GRASS.into()).unwrap();
        clip.set_block(b, &BaseBlock::with_tile(BlockState::CHEST, tag.clone())).unwrap();
        clip.set_biome(BlockVector2::new(13, 33), BiomeType::Beach).unwrap();

        for origin in [BlockVector3::ZERO, BlockVector3::new(1000, 64, -1000)] {
            clip.set_origin(origin).unwrap();
            assert_eq!(clip.get_block(a).unwrap(), BlockState::GRASS, "{kind:?}");
            let full = clip.get_full_block(b).unwrap();
            assert_eq!(full.state(), BlockState::CHEST, "{kind:?}");
            assert_eq!(full.tile(), Some(&tag), "{kind:?}");
            assert_eq!(clip.get_biome(BlockVector2::new(13, 33)).unwrap(), BiomeType::Beach);
        }
        clip.close().unwrap();
        cleanup(&settings);
    }
}

#[test]
fn test_double_close_every_store() {
    for kind in ALL_KINDS {
        let (mut clip, settings) = clipboard(kind);
        clip.close().unwrap();
        clip.close().unwrap();
        assert!(matches!(
            clip.set_block(BlockVector3::new(10, 20, 30), &BlockState::STONE.into()),
            Err(ClipboardError::Closed)
        ));
        drop(clip);
        cleanup(&settings);
    }
}

#[test]
fn test_drop_closes_disk_store() {
    let settings = settings(StorageKind::Disk);
    let id = ClipboardId::random();
    {
        let mut clip = BlockArrayClipboard::with_settings(&region(), id, &settings).unwrap();
        clip.set_block(BlockVector3::new(12, 21, 30), &BlockState::WOOD.into()).unwrap();
    }
    let path = settings.disk_directory.join(format!("{id}.bcd"));
    let mut store = DiskStore::open(&path).unwrap();
    assert_eq!(store.get_block(BlockVector3::new(2, 1, 0)).unwrap(), BlockState::WOOD);
    store.close().unwrap();
    cleanup(&settings);
}

#[test]
fn test_entities_every_store() {
    for kind in ALL_KINDS {
        let (mut clip, settings) = clipboard(kind);
        let cat = BaseEntity::new("cat");
        let entity = clip.create_entity(Location::at(11.5, 21.0, 31.5), &cat).unwrap().unwrap();
        assert_eq!(entity.clipboard_id(), clip.id());

        clip.set_origin(BlockVector3::ZERO).unwrap();
        let listed = clip.entities(&region()).unwrap();
        assert_eq!(listed.len(), 1, "{kind:?}");
        assert_eq!(listed[0].location(), Location::at(11.5, 21.0, 31.5));

        let moved = entity
            .set_location(&mut clip, Location::at(12.5, 22.0, 32.5))
            .unwrap()
            .unwrap();
        assert_ne!(moved.id(), entity.id());
        let cell = |p: BlockVector3| CuboidRegion::new(p, p);
        let old_cell = cell(BlockVector3::new(11, 21, 31));
        let new_cell = cell(BlockVector3::new(12, 22, 32));
        assert!(clip.entities(&old_cell).unwrap().is_empty(), "{kind:?}");
        assert_eq!(clip.entities(&new_cell).unwrap()[0].state(), cat, "{kind:?}");

        assert!(moved.remove(&mut clip).unwrap());
        assert!(clip.entities(&region()).unwrap().is_empty());
        clip.close().unwrap();
        cleanup(&settings);
    }
}

#[test]
fn test_entity_cap_yields_none() {
    let mut settings = settings(StorageKind::MemoryOptimized);
    settings.max_entities = Some(1);
    let mut clip =
        BlockArrayClipboard::with_settings(&region(), ClipboardId::random(), &settings).unwrap();
    let bee = BaseEntity::new("bee");
    let first = clip.create_entity(Location::at(10.5, 20.5, 30.5), &bee).unwrap().unwrap();
    assert!(clip.create_entity(Location::at(11.5, 20.5, 30.5), &bee).unwrap().is_none());

    // relocation into a full store keeps the slot it frees
    assert!(first.set_location(&mut clip, Location::at(12.5, 20.5, 30.5)).unwrap().is_some());
}

#[test]
fn test_injected_stores() {
    let dims = region().dimensions();

    let linear = LinearStore::new(dims).unwrap();
    let mut clip = BlockArrayClipboard::with_store(&region(), linear).unwrap();
    assert!(clip.set_block_at(13, 23, 33, &BlockState::STONE.into()).unwrap());
    assert_eq!(clip.get_block_at(13, 23, 33).unwrap(), BlockState::STONE);

    let mut layered = MemoryOptimizedStore::new(dims, 1).unwrap();
    {
        let mut clip = BlockArrayClipboard::with_store(&region(), &mut layered).unwrap();
        for y in 20..24 {
            clip.set_block_at(10, y, 30, &BlockState::DIRT.into()).unwrap();
        }
    }
    assert_eq!(layered.get_block(BlockVector3::new(0, 0, 0)).unwrap(), BlockState::DIRT);
    assert_eq!(layered.get_block(BlockVector3::new(0, 3, 0)).unwrap(), BlockState::DIRT);

    let wrong = LinearStore::new(BlockVector3::new(4, 4, 3)).unwrap();
    assert!(matches!(
        BlockArrayClipboard::with_store(&region(), wrong),
        Err(ClipboardError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_point_set_region_bounds() {
    let points = PointSetRegion::from_points([
        BlockVector3::new(0, 0, 0),
        BlockVector3::new(2, 0, 0),
        BlockVector3::new(2, 1, 2),
    ])
    .unwrap();
    let mut clip = BlockArrayClipboard::new(&points).unwrap();
    assert_eq!(clip.dimensions(), BlockVector3::new(3, 2, 3));

    assert!(clip.set_block_at(2, 1, 2, &BlockState::STONE.into()).unwrap());
    // inside the bounding box but not in the set
    assert!(!clip.set_block_at(1, 0, 0, &BlockState::STONE.into()).unwrap());
    assert_eq!(clip.get_block_at(1, 0, 0).unwrap(), BlockState::AIR);

    assert!(clip.set_biome_at(2, 2, BiomeType::Ocean).unwrap());
    assert!(!clip.set_biome_at(1, 1, BiomeType::Ocean).unwrap());
}

/// Linear store whose block and biome access always fails.
struct FailingStore {
    inner: LinearStore,
}

fn fault<T>() -> ClipboardResult<T> {
    Err(ClipboardError::Io(std::io::Error::other("device gone")))
}

impl BlockStore for FailingStore {
    fn dimensions(&self) -> BlockVector3 {
        self.inner.dimensions()
    }

    fn offset(&self) -> BlockVector3 {
        self.inner.offset()
    }

    fn set_offset(&mut self, offset: BlockVector3) -> ClipboardResult<()> {
        self.inner.set_offset(offset)
    }

    fn get_block(&self, _position: BlockVector3) -> ClipboardResult<BlockState> {
        fault()
    }

    fn get_full_block(&self, _position: BlockVector3) -> ClipboardResult<BaseBlock> {
        fault()
    }

    fn set_block(&mut self, _position: BlockVector3, _block: &BaseBlock) -> ClipboardResult<bool> {
        fault()
    }

    fn set_tile(&mut self, _position: BlockVector3, _tile: CompoundTag) -> ClipboardResult<bool> {
        fault()
    }

    fn has_biomes(&self) -> bool {
        true
    }

    fn get_biome(&self, _column: BlockVector2) -> ClipboardResult<BiomeType> {
        fault()
    }

    fn set_biome(&mut self, _column: BlockVector2, _biome: BiomeType) -> ClipboardResult<bool> {
        fault()
    }

    fn entities(&self) -> ClipboardResult<Vec<StoredEntity>> {
        self.inner.entities()
    }

    fn create_entity(
        &mut self,
        location: Location,
        entity: &BaseEntity,
    ) -> ClipboardResult<Option<StoredEntity>> {
        self.inner.create_entity(location, entity)
    }

    fn remove_entity(&mut self, position: BlockVector3, id: Uuid) -> ClipboardResult<bool> {
        self.inner.remove_entity(position, id)
    }
}

#[test]
fn test_store_faults_surface_only_in_bounds() {
    let store = FailingStore {
        inner: LinearStore::new(region().dimensions()).unwrap(),
    };
    let mut clip = BlockArrayClipboard::with_store(&region(), store).unwrap();
    let stone = BaseBlock::from(BlockState::STONE);
    let (inside, outside) = (BlockVector3::new(12, 22, 32), BlockVector3::new(14, 22, 32));
    let (column, beyond) = (BlockVector2::new(12, 32), BlockVector2::new(12, 34));

    assert!(matches!(clip.get_block(inside), Err(ClipboardError::Io(_))));
    assert!(matches!(clip.get_full_block(inside), Err(ClipboardError::Io(_))));
    assert!(matches!(clip.set_block(inside, &stone), Err(ClipboardError::Io(_))));
    assert!(matches!(clip.set_tile(inside, CompoundTag::new()), Err(ClipboardError::Io(_))));
    assert!(matches!(clip.get_biome(column), Err(ClipboardError::Io(_))));
    assert!(matches!(clip.set_biome(column, BiomeType::Ocean), Err(ClipboardError::Io(_))));

    // out-of-bounds calls never reach the store
    assert_eq!(clip.get_block(outside).unwrap(), BlockState::AIR);
    assert_eq!(clip.get_full_block(outside).unwrap(), BaseBlock::default());
    assert!(!clip.set_block(outside, &stone).unwrap());
    assert!(!clip.set_tile(outside, CompoundTag::new()).unwrap());
    assert_eq!(clip.get_biome(beyond).unwrap(), BiomeType::default());
    assert!(!clip.set_biome(beyond, BiomeType::Ocean).unwrap());
}
