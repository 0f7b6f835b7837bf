//! # Store Layout
//!
//! Maps local coordinates to flat storage indices. Every store variant
//! shares this arithmetic so they stay interchangeable.
//!
//! ## Index Order
//!
//! `index = x + z * width + y * width * length`, i.e. one contiguous
//! X/Z layer per Y level. The memory-optimized store relies on that order
//! to compress whole layers.
//!
//! ## Offset
//!
//! A local coordinate is shifted by the store's offset before indexing.
//! The clipboard sets the offset to `origin - region.min`, which keeps the
//! storage cell for any world position fixed while the origin moves.

use lattice_core::{BlockVector2, BlockVector3, Location};

use crate::error::{ClipboardError, ClipboardResult};

/// Dimensions plus placement offset of a backing store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoreLayout {
    dimensions: BlockVector3,
    offset: BlockVector3,
    area: usize,
    volume: usize,
}

impl StoreLayout {
    /// Creates a layout with zero offset.
    ///
    /// # Errors
    ///
    /// Returns `ClipboardError::InvalidDimensions` if any axis is not positive
    /// or the volume overflows `usize`.
    pub fn new(dimensions: BlockVector3) -> ClipboardResult<Self> {
        if !dimensions.is_positive() {
            return Err(ClipboardError::InvalidDimensions(dimensions));
        }
        let width = dimensions.x.unsigned_abs() as usize;
        let height = dimensions.y.unsigned_abs() as usize;
        let length = dimensions.z.unsigned_abs() as usize;
        let area = width
            .checked_mul(length)
            .ok_or(ClipboardError::InvalidDimensions(dimensions))?;
        let volume = area
            .checked_mul(height)
            .ok_or(ClipboardError::InvalidDimensions(dimensions))?;
        Ok(Self {
            dimensions,
            offset: BlockVector3::ZERO,
            area,
            volume,
        })
    }

    /// Size per axis.
    #[inline]
    #[must_use]
    pub const fn dimensions(&self) -> BlockVector3 {
        self.dimensions
    }

    /// Current placement offset.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> BlockVector3 {
        self.offset
    }

    /// Replaces the placement offset.
    #[inline]
    pub fn set_offset(&mut self, offset: BlockVector3) {
        self.offset = offset;
    }

    /// Blocks per Y layer.
    #[inline]
    #[must_use]
    pub const fn area(&self) -> usize {
        self.area
    }

    /// Total blocks.
    #[inline]
    #[must_use]
    pub const fn volume(&self) -> usize {
        self.volume
    }

    /// Number of Y layers.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.dimensions.y.unsigned_abs() as usize
    }

    /// Flat index of a local position, or `None` if it falls outside.
    #[inline]
    #[must_use]
    pub fn index(&self, local: BlockVector3) -> Option<usize> {
        let p = local + self.offset;
        let d = self.dimensions;
        if p.x < 0 || p.y < 0 || p.z < 0 || p.x >= d.x || p.y >= d.y || p.z >= d.z {
            return None;
        }
        let [x, y, z] = [p.x, p.y, p.z].map(|n| n.unsigned_abs() as usize);
        let width = d.x.unsigned_abs() as usize;
        Some(x + z * width + y * self.area)
    }

    /// Flat column index of a local column, or `None` if it falls outside.
    #[inline]
    #[must_use]
    pub fn column_index(&self, local: BlockVector2) -> Option<usize> {
        let p = local + self.offset.to_2d();
        let d = self.dimensions;
        if p.x < 0 || p.z < 0 || p.x >= d.x || p.z >= d.z {
            return None;
        }
        let width = d.x.unsigned_abs() as usize;
        Some(p.x.unsigned_abs() as usize + p.z.unsigned_abs() as usize * width)
    }

    /// Converts a local entity location into storage space.
    #[inline]
    #[must_use]
    pub fn to_storage(&self, local: Location) -> Location {
        local.shifted(self.offset)
    }

    /// Converts a storage-space entity location back to local space.
    #[inline]
    #[must_use]
    pub fn to_local(&self, stored: Location) -> Location {
        stored.unshifted(self.offset)
    }
}
