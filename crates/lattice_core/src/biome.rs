//! # Biome Types
//!
//! Column-level biome tags. Stored as one byte per column, zero is the
//! default so freshly allocated storage reads back as `Plains`.

/// Biome of a block column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BiomeType {
    /// Plains/grassland.
    #[default]
    Plains = 0,
    /// Shallow ocean.
    Ocean = 1,
    /// Beach/coastline.
    Beach = 2,
    /// Forest.
    Forest = 3,
    /// Dense jungle.
    Jungle = 4,
    /// Arid desert.
    Desert = 5,
    /// Cold tundra.
    Tundra = 6,
    /// Snowy taiga forest.
    Taiga = 7,
    /// High mountains.
    Mountains = 8,
    /// Swamp/wetland.
    Swamp = 9,
}

impl BiomeType {
    /// Converts from the stored byte.
    #[must_use]
    pub const fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Plains),
            1 => Some(Self::Ocean),
            2 => Some(Self::Beach),
            3 => Some(Self::Forest),
            4 => Some(Self::Jungle),
            5 => Some(Self::Desert),
            6 => Some(Self::Tundra),
            7 => Some(Self::Taiga),
            8 => Some(Self::Mountains),
            9 => Some(Self::Swamp),
            _ => None,
        }
    }

    /// The stored byte.
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}
