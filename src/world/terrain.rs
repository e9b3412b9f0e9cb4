use crate::world::cell::TerrainKind;

/// Static per-terrain properties.
/// `color` is a renderer hint only; the core never draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainInfo {
    pub passable: bool,
    /// Blocks line-of-sight sampling.
    pub opaque: bool,
    /// Can be drilled out (converted to open ground).
    pub drillable: bool,
    /// Movement cost multiplier for pathing/AI; 1.0 is normal ground.
    pub move_cost: f32,
    pub color: [u8; 3],
}

impl TerrainKind {
    pub const fn info(self) -> TerrainInfo {
        match self {
            TerrainKind::Open => TerrainInfo {
                passable: true,
                opaque: false,
                drillable: false,
                move_cost: 1.0,
                color: [92, 72, 48],
            },
            TerrainKind::Rubble => TerrainInfo {
                passable: true,
                opaque: false,
                drillable: true,
                move_cost: 1.6,
                color: [120, 108, 92],
            },
            TerrainKind::Wall => TerrainInfo {
                passable: false,
                opaque: true,
                drillable: true,
                move_cost: f32::INFINITY,
                color: [58, 54, 52],
            },
            TerrainKind::Water => TerrainInfo {
                passable: true,
                opaque: false,
                drillable: false,
                move_cost: 2.2,
                color: [40, 84, 140],
            },
            TerrainKind::Lava => TerrainInfo {
                passable: false,
                opaque: false,
                drillable: false,
                move_cost: f32::INFINITY,
                color: [196, 70, 24],
            },
        }
    }
}

/// Map a noise scalar in [0, 1] to a terrain band.
/// Ordered if/else chain, highest band first.
pub fn terrain_for_noise(noise: f32) -> TerrainKind {
    if noise > 0.90 {
        TerrainKind::Lava
    } else if noise > 0.72 {
        TerrainKind::Wall
    } else if noise > 0.58 {
        TerrainKind::Rubble
    } else if noise > 0.14 {
        TerrainKind::Open
    } else {
        TerrainKind::Water
    }
}
