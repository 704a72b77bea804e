//! Block ids and the static block table.

use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Unique identifier for a block type.
///
/// Block ID 0 is reserved for air (empty space). Ids index into [`BLOCK_DATA`].
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct BlockId(pub u16);

impl BlockId {
    pub const AIR: Self = Self(0);
    pub const BEDROCK: Self = Self(1);
    pub const STONE: Self = Self(2);
    pub const COBBLESTONE: Self = Self(3);
    pub const DIRT: Self = Self(4);
    pub const GRASS: Self = Self(5);
    pub const SAND: Self = Self(6);
    pub const GRAVEL: Self = Self(7);
    pub const CLAY: Self = Self(8);
    pub const SNOW: Self = Self(9);
    pub const ICE: Self = Self(10);
    pub const WATER: Self = Self(11);
    pub const COAL_ORE: Self = Self(12);
    pub const IRON_ORE: Self = Self(13);
    pub const GOLD_ORE: Self = Self(14);
    pub const DIAMOND_ORE: Self = Self(15);
    pub const LOG: Self = Self(16);
    pub const LEAVES: Self = Self(17);
    pub const CACTUS: Self = Self(18);
    pub const VINE: Self = Self(19);
    pub const TALL_GRASS: Self = Self(20);
    pub const WHEAT: Self = Self(21);
    pub const FARMLAND: Self = Self(22);
    pub const PLANKS: Self = Self(23);
    pub const TORCH: Self = Self(24);
    pub const CAMPFIRE: Self = Self(25);

    /// Returns true if this block is air (empty)
    #[inline]
    pub const fn is_air(self) -> bool {
        self.0 == 0
    }

    /// Static properties of this block, if the id is known.
    #[inline]
    pub fn data(self) -> Option<&'static BlockData> {
        block_data(self)
    }

    #[inline]
    fn flags(self) -> BlockFlags {
        self.data().map_or(BlockFlags::empty(), |d| d.flags)
    }

    /// Returns true if the block table flags this block as solid.
    #[inline]
    pub fn is_solid(self) -> bool {
        self.flags().contains(BlockFlags::SOLID)
    }

    /// Returns true for liquids (water).
    #[inline]
    pub fn is_liquid(self) -> bool {
        self.flags().contains(BlockFlags::LIQUID)
    }

    /// Whether entities collide with this block: non-air, non-liquid, solid.
    #[inline]
    pub fn is_collidable(self) -> bool {
        !self.is_air() && !self.is_liquid() && self.is_solid()
    }

    /// Sand and gravel: falls when unsupported.
    #[inline]
    pub fn has_gravity(self) -> bool {
        self.flags().contains(BlockFlags::GRAVITY)
    }

    #[inline]
    pub fn is_flammable(self) -> bool {
        self.flags().contains(BlockFlags::FLAMMABLE)
    }

    #[inline]
    pub fn is_fire_source(self) -> bool {
        self.flags().contains(BlockFlags::FIRE_SOURCE)
    }

    #[inline]
    pub fn is_crop(self) -> bool {
        self.flags().contains(BlockFlags::CROP)
    }
}

bitflags! {
    /// Behavioural flags of a block type.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct BlockFlags: u8 {
        /// Occupies its whole cell; blocks movement and counts for height queries.
        const SOLID = 1 << 0;
        /// Falls into non-solid space below.
        const GRAVITY = 1 << 1;
        /// Destroyed by adjacent fire sources.
        const FLAMMABLE = 1 << 2;
        /// Ignites adjacent flammable blocks.
        const FIRE_SOURCE = 1 << 3;
        /// Flows; never collidable.
        const LIQUID = 1 << 4;
        /// Growing plant that keeps farmland from drying out.
        const CROP = 1 << 5;
    }
}

/// Static properties of a block type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockData {
    pub name: &'static str,
    pub flags: BlockFlags,
    /// Seconds to mine by hand; negative means unbreakable.
    pub hardness: f32,
    /// Item left behind when mined, `None` for nothing.
    pub drops: Option<BlockId>,
    /// Base colour (RGB, 0-255)
    pub color: [u8; 3],
}

const fn entry(
    name: &'static str,
    flags: BlockFlags,
    hardness: f32,
    drops: Option<BlockId>,
    color: [u8; 3],
) -> BlockData {
    BlockData {
        name,
        flags,
        hardness,
        drops,
        color,
    }
}

const NONE: BlockFlags = BlockFlags::empty();
const SOLID: BlockFlags = BlockFlags::SOLID;

/// The block table, indexed by `BlockId.0`.
pub static BLOCK_DATA: [BlockData; 26] = [
    entry("air", NONE, 0.0, None, [0, 0, 0]),
    entry("bedrock", SOLID, -1.0, None, [40, 40, 40]),
    entry("stone", SOLID, 1.5, Some(BlockId::COBBLESTONE), [128, 128, 128]),
    entry("cobblestone", SOLID, 2.0, Some(BlockId::COBBLESTONE), [110, 110, 110]),
    entry("dirt", SOLID, 0.5, Some(BlockId::DIRT), [139, 90, 43]),
    entry("grass", SOLID, 0.6, Some(BlockId::DIRT), [86, 125, 70]),
    entry(
        "sand",
        SOLID.union(BlockFlags::GRAVITY),
        0.5,
        Some(BlockId::SAND),
        [215, 199, 133],
    ),
    entry(
        "gravel",
        SOLID.union(BlockFlags::GRAVITY),
        0.6,
        Some(BlockId::GRAVEL),
        [136, 126, 126],
    ),
    entry("clay", SOLID, 0.6, Some(BlockId::CLAY), [160, 166, 179]),
    entry("snow", SOLID, 0.2, Some(BlockId::SNOW), [236, 238, 245]),
    entry("ice", SOLID, 0.5, None, [160, 190, 240]),
    entry("water", BlockFlags::LIQUID, -1.0, None, [58, 103, 178]),
    entry("coal_ore", SOLID, 3.0, Some(BlockId::COAL_ORE), [60, 60, 60]),
    entry("iron_ore", SOLID, 3.0, Some(BlockId::IRON_ORE), [196, 160, 130]),
    entry("gold_ore", SOLID, 3.0, Some(BlockId::GOLD_ORE), [240, 210, 70]),
    entry(
        "diamond_ore",
        SOLID,
        3.0,
        Some(BlockId::DIAMOND_ORE),
        [100, 220, 230],
    ),
    entry(
        "log",
        SOLID.union(BlockFlags::FLAMMABLE),
        2.0,
        Some(BlockId::LOG),
        [94, 68, 42],
    ),
    entry(
        "leaves",
        SOLID.union(BlockFlags::FLAMMABLE),
        0.2,
        None,
        [62, 114, 52],
    ),
    entry("cactus", SOLID, 0.4, Some(BlockId::CACTUS), [80, 140, 60]),
    entry("vine", BlockFlags::FLAMMABLE, 0.2, None, [50, 100, 40]),
    entry("tall_grass", BlockFlags::FLAMMABLE, 0.0, None, [100, 150, 70]),
    entry(
        "wheat",
        BlockFlags::FLAMMABLE.union(BlockFlags::CROP),
        0.0,
        Some(BlockId::WHEAT),
        [220, 190, 90],
    ),
    entry("farmland", SOLID, 0.6, Some(BlockId::DIRT), [110, 70, 35]),
    entry(
        "planks",
        SOLID.union(BlockFlags::FLAMMABLE),
        2.0,
        Some(BlockId::PLANKS),
        [180, 140, 90],
    ),
    entry(
        "torch",
        BlockFlags::FIRE_SOURCE,
        0.0,
        Some(BlockId::TORCH),
        [255, 200, 80],
    ),
    entry(
        "campfire",
        SOLID.union(BlockFlags::FIRE_SOURCE),
        2.0,
        Some(BlockId::LOG),
        [230, 110, 40],
    ),
];

/// Look up a block's static properties.
#[inline]
pub fn block_data(id: BlockId) -> Option<&'static BlockData> {
    BLOCK_DATA.get(id.0 as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_id_air() {
        assert!(BlockId::AIR.is_air());
        assert!(!BlockId::AIR.is_solid());
        assert!(!BlockId::AIR.is_collidable());
    }

    #[test]
    fn water_is_not_collidable() {
        assert!(BlockId::WATER.is_liquid());
        assert!(!BlockId::WATER.is_solid());
        assert!(!BlockId::WATER.is_collidable());
    }

    #[test]
    fn table_is_indexed_by_id() {
        for (index, data) in BLOCK_DATA.iter().enumerate() {
            let id = BlockId(index as u16);
            assert_eq!(id.data().map(|d| d.name), Some(data.name));
        }
        assert_eq!(BlockId::CAMPFIRE.data().unwrap().name, "campfire");
        assert_eq!(BlockId::SAND.data().unwrap().name, "sand");
    }

    #[test]
    fn unknown_ids_behave_like_air() {
        let unknown = BlockId(9000);
        assert!(unknown.data().is_none());
        assert!(!unknown.is_solid());
        assert!(!unknown.has_gravity());
        assert!(!unknown.is_collidable());
    }

    #[test]
    fn gravity_and_fire_flags() {
        assert!(BlockId::SAND.has_gravity());
        assert!(BlockId::GRAVEL.has_gravity());
        assert!(!BlockId::DIRT.has_gravity());
        assert!(BlockId::TORCH.is_fire_source());
        assert!(BlockId::CAMPFIRE.is_fire_source());
        assert!(BlockId::LOG.is_flammable());
        assert!(!BlockId::STONE.is_flammable());
        assert!(BlockId::WHEAT.is_crop());
    }
}
