//! # Block Vectors
//!
//! Integer and real-valued coordinates used on both sides of the clipboard
//! overlay. World and local positions share the same types; which space a
//! value lives in is decided by the API that receives it.
//!
//! Integer vector arithmetic wraps. Translations compose modulo 2^32, so
//! `(p - origin) + (origin - min) == p - min` holds for any origin.

use std::fmt;
use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Integer 3D block coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockVector3 {
    /// X component.
    pub x: i32,
    /// Y component.
    pub y: i32,
    /// Z component.
    pub z: i32,
}

impl BlockVector3 {
    /// All components zero.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// All components one.
    pub const ONE: Self = Self::new(1, 1, 1);

    /// Creates a new block vector.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Component-wise minimum.
    #[inline]
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Component-wise maximum.
    #[inline]
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    /// Drops the Y component.
    #[inline]
    #[must_use]
    pub const fn to_2d(self) -> BlockVector2 {
        BlockVector2::new(self.x, self.z)
    }

    /// Returns true if every component is strictly positive.
    #[inline]
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.x > 0 && self.y > 0 && self.z > 0
    }
}

impl Add for BlockVector3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.x.wrapping_add(rhs.x),
            self.y.wrapping_add(rhs.y),
            self.z.wrapping_add(rhs.z),
        )
    }
}

impl Sub for BlockVector3 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.x.wrapping_sub(rhs.x),
            self.y.wrapping_sub(rhs.y),
            self.z.wrapping_sub(rhs.z),
        )
    }
}

impl Neg for BlockVector3 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(self.x.wrapping_neg(), self.y.wrapping_neg(), self.z.wrapping_neg())
    }
}

impl fmt::Display for BlockVector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Integer column coordinate (X/Z plane).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockVector2 {
    /// X component.
    pub x: i32,
    /// Z component.
    pub z: i32,
}

impl BlockVector2 {
    /// Creates a new column vector.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

impl Add for BlockVector2 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x.wrapping_add(rhs.x), self.z.wrapping_add(rhs.z))
    }
}

impl Sub for BlockVector2 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x.wrapping_sub(rhs.x), self.z.wrapping_sub(rhs.z))
    }
}

impl fmt::Display for BlockVector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Real-valued 3D position, used for entities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vector3 {
    /// Creates a new vector.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The block containing this point (floored per axis).
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_block_point(self) -> BlockVector3 {
        BlockVector3::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        )
    }
}

impl From<BlockVector3> for Vector3 {
    fn from(v: BlockVector3) -> Self {
        Self::new(f64::from(v.x), f64::from(v.y), f64::from(v.z))
    }
}

impl Add for Vector3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// A position plus orientation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Position.
    pub position: Vector3,
    /// Yaw in degrees.
    pub yaw: f32,
    /// Pitch in degrees.
    pub pitch: f32,
}

impl Location {
    /// Creates a location with explicit orientation.
    #[must_use]
    pub const fn new(position: Vector3, yaw: f32, pitch: f32) -> Self {
        Self { position, yaw, pitch }
    }

    /// Creates an unrotated location.
    #[must_use]
    pub const fn at(x: f64, y: f64, z: f64) -> Self {
        Self::new(Vector3::new(x, y, z), 0.0, 0.0)
    }

    /// The block this location falls in.
    #[inline]
    #[must_use]
    pub fn block_position(&self) -> BlockVector3 {
        self.position.to_block_point()
    }

    /// Returns this location moved by a whole-block delta, orientation kept.
    #[inline]
    #[must_use]
    pub fn shifted(self, delta: BlockVector3) -> Self {
        Self {
            position: self.position + Vector3::from(delta),
            ..self
        }
    }

    /// Inverse of `shifted`. Subtracts in `f64`, so it stays exact where
    /// negating `delta` would wrap.
    #[inline]
    #[must_use]
    pub fn unshifted(self, delta: BlockVector3) -> Self {
        Self {
            position: self.position - Vector3::from(delta),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_vector_arithmetic() {
        let a = BlockVector3::new(11, 21, 31);
        let b = BlockVector3::new(10, 20, 30);
        assert_eq!(a - b, BlockVector3::ONE);
        assert_eq!(a - b + b, a);
        assert_eq!(-b, BlockVector3::new(-10, -20, -30));
        assert_eq!(a.min(b), b);
        assert_eq!(a.max(b), a);
    }

    #[test]
    fn test_block_point_floors_negative() {
        let v = Vector3::new(-0.5, 1.999, -3.0);
        assert_eq!(v.to_block_point(), BlockVector3::new(-1, 1, -3));
    }

    #[test]
    fn test_location_shift_keeps_orientation() {
        let loc = Location::new(Vector3::new(1.5, 2.0, 3.25), 90.0, -45.0);
        let moved = loc.shifted(BlockVector3::new(-1, 0, 2));
        assert_eq!(moved.position, Vector3::new(0.5, 2.0, 5.25));
        assert_eq!(moved.yaw, 90.0);
        assert_eq!(moved.pitch, -45.0);
        assert_eq!(moved.shifted(BlockVector3::new(1, 0, -2)), loc);
    }

    #[test]
    fn test_block_vector_arithmetic_wraps() {
        let low = BlockVector3::new(i32::MIN, 0, 0);
        let min = BlockVector3::new(10, 20, 30);
        let p = BlockVector3::new(11, 21, 31);
        let offset = low - min;
        assert_eq!((p - low) + offset, p - min);
        assert_eq!(-low, low);
        let col = BlockVector2::new(i32::MAX, 0);
        assert_eq!(col + BlockVector2::new(1, 0), BlockVector2::new(i32::MIN, 0));
    }

    #[test]
    fn test_unshifted_reverses_extreme_shift() {
        let loc = Location::at(11.5, 21.0, 31.5);
        let origin = BlockVector3::new(i32::MIN, 0, 0);
        let local = loc.unshifted(origin);
        assert_eq!(local.position.x, 11.5 + 2_147_483_648.0);
        assert_eq!(local.shifted(origin), loc);
    }
}
