//! # Regions
//!
//! A region is a set of world coordinates with a minimum and maximum point.
//! Clipboards capture a region by cloning it, so every implementation must
//! be cheap to clone behind a `Box<dyn Region>`.
//!
//! Two shapes ship with the crate:
//! - `CuboidRegion`: every point between two corners
//! - `PointSetRegion`: an arbitrary set of points

use std::collections::HashSet;
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::vector::{BlockVector2, BlockVector3};

/// A bounded set of block positions.
pub trait Region: fmt::Debug {
    /// Lowest corner of the bounding box.
    fn minimum_point(&self) -> BlockVector3;

    /// Highest corner of the bounding box (inclusive).
    fn maximum_point(&self) -> BlockVector3;

    /// Returns true if `position` belongs to the region.
    fn contains(&self, position: BlockVector3) -> bool;

    /// Returns true if any point of the region lies in the given column.
    fn contains_column(&self, column: BlockVector2) -> bool {
        let min = self.minimum_point();
        let max = self.maximum_point();
        column.x >= min.x && column.x <= max.x && column.z >= min.z && column.z <= max.z
    }

    /// Size of the bounding box per axis.
    fn dimensions(&self) -> BlockVector3 {
        self.maximum_point() - self.minimum_point() + BlockVector3::ONE
    }

    /// Number of points in the region.
    fn volume(&self) -> u64 {
        let d = self.dimensions();
        [d.x, d.y, d.z]
            .into_iter()
            .map(|n| u64::from(n.unsigned_abs()))
            .product()
    }

    /// Iterates every point of the region.
    fn points(&self) -> Box<dyn Iterator<Item = BlockVector3> + '_>;

    /// Clones the region into a new box.
    fn clone_box(&self) -> Box<dyn Region>;
}

impl Clone for Box<dyn Region> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// An axis-aligned box of blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CuboidRegion {
    min: BlockVector3,
    max: BlockVector3,
}

impl CuboidRegion {
    /// Creates a cuboid spanning two corners, in any order.
    #[must_use]
    pub fn new(pos1: BlockVector3, pos2: BlockVector3) -> Self {
        Self {
            min: pos1.min(pos2),
            max: pos1.max(pos2),
        }
    }

    /// Creates a cuboid from its minimum corner and its size.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidSize` if any size component is not positive.
    pub fn from_size(min: BlockVector3, size: BlockVector3) -> CoreResult<Self> {
        if !size.is_positive() {
            return Err(CoreError::InvalidSize(size));
        }
        Ok(Self {
            min,
            max: min + size - BlockVector3::ONE,
        })
    }

    /// Moves the whole cuboid.
    pub fn shift(&mut self, delta: BlockVector3) {
        self.min = self.min + delta;
        self.max = self.max + delta;
    }
}

impl Region for CuboidRegion {
    fn minimum_point(&self) -> BlockVector3 {
        self.min
    }

    fn maximum_point(&self) -> BlockVector3 {
        self.max
    }

    #[inline]
    fn contains(&self, p: BlockVector3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    fn points(&self) -> Box<dyn Iterator<Item = BlockVector3> + '_> {
        let (min, max) = (self.min, self.max);
        Box::new((min.y..=max.y).flat_map(move |y| {
            (min.z..=max.z)
                .flat_map(move |z| (min.x..=max.x).map(move |x| BlockVector3::new(x, y, z)))
        }))
    }

    fn clone_box(&self) -> Box<dyn Region> {
        Box::new(*self)
    }
}

/// A region made of explicitly listed points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointSetRegion {
    points: HashSet<BlockVector3>,
    columns: HashSet<BlockVector2>,
    min: BlockVector3,
    max: BlockVector3,
}

impl PointSetRegion {
    /// Builds a region from a non-empty set of points.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EmptyPointSet` if the iterator yields nothing.
    pub fn from_points(points: impl IntoIterator<Item = BlockVector3>) -> CoreResult<Self> {
        let mut iter = points.into_iter();
        let first = iter.next().ok_or(CoreError::EmptyPointSet)?;
        let mut region = Self {
            points: HashSet::new(),
            columns: HashSet::new(),
            min: first,
            max: first,
        };
        region.insert(first);
        for p in iter {
            region.insert(p);
        }
        Ok(region)
    }

    /// Adds a point, growing the bounds if needed.
    pub fn insert(&mut self, point: BlockVector3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
        self.columns.insert(point.to_2d());
        self.points.insert(point);
    }
}

impl Region for PointSetRegion {
    fn minimum_point(&self) -> BlockVector3 {
        self.min
    }

    fn maximum_point(&self) -> BlockVector3 {
        self.max
    }

    fn contains(&self, position: BlockVector3) -> bool {
        self.points.contains(&position)
    }

    fn contains_column(&self, column: BlockVector2) -> bool {
        self.columns.contains(&column)
    }

    fn volume(&self) -> u64 {
        self.points.len() as u64
    }

    fn points(&self) -> Box<dyn Iterator<Item = BlockVector3> + '_> {
        Box::new(self.points.iter().copied())
    }

    fn clone_box(&self) -> Box<dyn Region> {
        Box::new(self.clone())
    }
}
