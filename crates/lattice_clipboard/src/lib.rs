//! # LATTICE Clipboard
//!
//! A bounded block region addressed in world coordinates, backed by an
//! interchangeable store addressed in local coordinates.
//!
//! ## Design Principles
//!
//! 1. **One translation rule** - blocks, tiles and biomes all bounds-check
//!    against the region, then map `local = world - origin`
//! 2. **Out of bounds is not an error** - reads return air, writes return `false`
//! 3. **Faults are errors** - a failing disk store never reads as "not applied"
//! 4. **Scoped release** - `close()` is idempotent and `Drop` closes for you
//!
//! ## Thread Safety
//!
//! None internally. Wrap a clipboard in one exclusive lock if several
//! threads need it.
//!
//! ## Example
//!
//! ```rust,ignore
//! use lattice_clipboard::BlockArrayClipboard;
//! use lattice_core::{BlockState, BlockVector3, CuboidRegion};
//!
//! let region = CuboidRegion::new(BlockVector3::new(10, 20, 30), BlockVector3::new(13, 23, 33));
//! let mut clipboard = BlockArrayClipboard::new(&region)?;
//!
//! clipboard.set_block(BlockVector3::new(11, 21, 31), &BlockState::STONE.into())?;
//! assert_eq!(clipboard.get_block(BlockVector3::new(9, 20, 30))?, BlockState::AIR);
//! clipboard.close()?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod clipboard;
pub mod entity;
pub mod error;
pub mod settings;
pub mod store;

pub use clipboard::{BlockArrayClipboard, ClipboardId};
pub use entity::ClipboardEntity;
pub use error::{ClipboardError, ClipboardResult};
pub use settings::{ClipboardSettings, StorageKind};
pub use store::{
    create_store, BlockStore, DiskStore, LayerStats, LinearStore, MemoryOptimizedStore,
    StoreLayout, StoredEntity,
};
