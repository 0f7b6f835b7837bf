//! # Clipboard Error Types
//!
//! Everything a clipboard or its backing store can fail with. Out-of-bounds
//! access is not in here: reads outside the region return air and writes
//! return `false`.

use lattice_core::BlockVector3;
use thiserror::Error;

/// Errors that can occur in the clipboard system.
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// Backing store I/O failed.
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Backing store data is unreadable.
    #[error("store data corrupted: {0}")]
    Corrupted(String),

    /// An injected store does not match the region size.
    #[error("store dimensions {store} do not match region dimensions {region}")]
    DimensionMismatch {
        /// Size of the region.
        region: BlockVector3,
        /// Size of the store.
        store: BlockVector3,
    },

    /// A store was asked for a zero, negative or overflowing size.
    #[error("invalid store dimensions {0}")]
    InvalidDimensions(BlockVector3),

    /// The clipboard or store has already been closed.
    #[error("clipboard is closed")]
    Closed,

    /// The entity handle was issued by another clipboard.
    #[error("entity belongs to another clipboard")]
    ForeignEntity,

    /// Invalid settings.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for clipboard operations.
pub type ClipboardResult<T> = Result<T, ClipboardError>;
