//! # Blocks
//!
//! `BlockState` is the plain, copyable block value stored densely by every
//! backing store. `BaseBlock` pairs a state with optional tile data, the
//! auxiliary compound attached to a single position (container contents,
//! sign text, ...).

use bytemuck::{Pod, Zeroable};

use crate::tag::CompoundTag;

/// A block type plus its packed properties.
///
/// Four bytes, `Pod`, so stores can copy blocks to and from raw pages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct BlockState {
    /// Block type ID.
    pub id: u16,
    /// Packed block properties (rotation, variant, etc.).
    pub meta: u16,
}

impl BlockState {
    /// Air block (empty). Also the value of zeroed storage.
    pub const AIR: Self = Self { id: 0, meta: 0 };
    /// Grass block.
    pub const GRASS: Self = Self { id: 1, meta: 0 };
    /// Stone block.
    pub const STONE: Self = Self { id: 2, meta: 0 };
    /// Dirt block.
    pub const DIRT: Self = Self { id: 3, meta: 0 };
    /// Wood/Log block.
    pub const WOOD: Self = Self { id: 4, meta: 0 };
    /// Chest block, usually carries tile data.
    pub const CHEST: Self = Self { id: 54, meta: 0 };

    /// Creates a block state with the given ID.
    #[inline]
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self { id, meta: 0 }
    }

    /// Creates a block state with ID and properties.
    #[inline]
    #[must_use]
    pub const fn with_meta(id: u16, meta: u16) -> Self {
        Self { id, meta }
    }

    /// Returns true if this is air.
    #[inline]
    #[must_use]
    pub const fn is_air(self) -> bool {
        self.id == 0
    }

    /// Wraps this state into a full block without tile data.
    #[inline]
    #[must_use]
    pub fn to_base_block(self) -> BaseBlock {
        BaseBlock::new(self)
    }
}

/// A block state with its tile data, if any.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BaseBlock {
    state: BlockState,
    tile: Option<CompoundTag>,
}

impl BaseBlock {
    /// Creates a block without tile data.
    #[must_use]
    pub const fn new(state: BlockState) -> Self {
        Self { state, tile: None }
    }

    /// Creates a block carrying tile data.
    #[must_use]
    pub const fn with_tile(state: BlockState, tile: CompoundTag) -> Self {
        Self {
            state,
            tile: Some(tile),
        }
    }

    /// The block state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> BlockState {
        self.state
    }

    /// The tile data, if any.
    #[inline]
    #[must_use]
    pub const fn tile(&self) -> Option<&CompoundTag> {
        self.tile.as_ref()
    }

    /// Returns true if tile data is attached.
    #[inline]
    #[must_use]
    pub const fn has_tile(&self) -> bool {
        self.tile.is_some()
    }
}

impl From<BlockState> for BaseBlock {
    fn from(state: BlockState) -> Self {
        Self::new(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_state_is_four_bytes() {
        assert_eq!(std::mem::size_of::<BlockState>(), 4);
        assert_eq!(bytemuck::bytes_of(&BlockState::AIR), &[0, 0, 0, 0]);
        assert_eq!(BlockState::zeroed(), BlockState::AIR);
    }

    #[test]
    fn test_base_block_tile() {
        let mut tag = CompoundTag::new();
        tag.insert_int("Slots", 27);
        let block = BaseBlock::with_tile(BlockState::CHEST, tag.clone());
        assert!(block.has_tile());
        assert_eq!(block.tile(), Some(&tag));
        assert!(!BlockState::STONE.to_base_block().has_tile());
    }
}
