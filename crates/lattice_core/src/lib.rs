//! # LATTICE Core
//!
//! Value types shared by every clipboard backend.
//!
//! ## Contents
//!
//! - `BlockVector3` / `BlockVector2` / `Vector3` / `Location`: coordinates
//! - `Region`: bounded point sets (`CuboidRegion`, `PointSetRegion`)
//! - `BlockState` / `BaseBlock`: block values, the latter with tile data
//! - `BiomeType`: per-column biome
//! - `CompoundTag`: tile and entity data
//! - `BaseEntity`: entity type plus data
//!
//! Nothing in this crate knows about world vs. local coordinates; that
//! distinction belongs to `lattice_clipboard`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod biome;
pub mod block;
pub mod entity;
pub mod error;
pub mod region;
pub mod tag;
pub mod vector;

pub use biome::BiomeType;
pub use block::{BaseBlock, BlockState};
pub use entity::BaseEntity;
pub use error::{CoreError, CoreResult};
pub use region::{CuboidRegion, PointSetRegion, Region};
pub use tag::{CompoundTag, Tag};
pub use vector::{BlockVector2, BlockVector3, Location, Vector3};
