//! # Core Error Types

use thiserror::Error;

use crate::vector::BlockVector3;

/// Errors raised while building core value types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A point-set region needs at least one point to have bounds.
    #[error("point set region has no points")]
    EmptyPointSet,

    /// A size with a zero or negative component.
    #[error("invalid region size {0}")]
    InvalidSize(BlockVector3),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
