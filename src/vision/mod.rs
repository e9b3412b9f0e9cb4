mod angles;

use glam::Vec2;

use crate::coords::Tile;
use crate::world::WorldGrid;

pub use angles::{angle_difference, normalize_angle};

/// Interior points sampled along the sight line for occlusion.
const LOS_SAMPLES: usize = 12;

/// An observer's pose for cone visibility: where it is, where it faces, and
/// how far it can perceive. The caller widens `range` for lit states
/// (flashlight on, flare burning) before querying.
#[derive(Debug, Clone, Copy)]
pub struct ObserverPose {
    pub position: Vec2,
    pub facing: f32,
    pub range: f32,
}

impl ObserverPose {
    pub fn new(position: Vec2, facing: f32, range: f32) -> Self {
        Self {
            position,
            facing: normalize_angle(facing),
            range,
        }
    }
}

/// Angular half-width of a vision cone. The default 100-degree total cone
/// sits in the band arcade survival games use.
#[derive(Debug, Clone, Copy)]
pub struct VisionCone {
    pub half_angle: f32,
}

impl Default for VisionCone {
    fn default() -> Self {
        Self {
            half_angle: 50f32.to_radians(),
        }
    }
}

/// Cone visibility: range, then angular test (boundary inclusive), then a
/// sampled line-of-sight walk against opaque tiles. Recomputed per frame;
/// unlike `reveal_around` this is not monotonic.
pub fn is_visible(
    pose: &ObserverPose,
    cone: VisionCone,
    target: Vec2,
    grid: &WorldGrid,
    tile_size: f32,
) -> bool {
    let delta = target - pose.position;
    let distance = delta.length();
    if distance > pose.range {
        return false;
    }
    if distance > f32::EPSILON {
        let bearing = delta.y.atan2(delta.x);
        if angle_difference(pose.facing, bearing) > cone.half_angle {
            return false;
        }
    }
    line_of_sight(pose.position, target, grid, tile_size)
}

/// Walk fixed interpolated samples between two points; sight fails when any
/// sample lands on an opaque tile. Endpoints themselves are not sampled.
pub fn line_of_sight(from: Vec2, to: Vec2, grid: &WorldGrid, tile_size: f32) -> bool {
    for i in 1..LOS_SAMPLES {
        let t = i as f32 / LOS_SAMPLES as f32;
        let point = from.lerp(to, t);
        if grid.is_opaque(Tile::from_world(point, tile_size)) {
            return false;
        }
    }
    true
}

/// Radius reveal for fog-of-war: every cell within `radius` (Euclidean) of
/// `center` is marked revealed. Monotonic by construction.
pub fn reveal_around(grid: &mut WorldGrid, center: Tile, radius: i32) {
    let r = radius.max(0);
    for dy in -r..=r {
        for dx in -r..=r {
            let tile = Tile::new(center.x + dx, center.y + dy);
            if center.euclidean(tile) <= radius as f32 {
                grid.reveal(tile);
            }
        }
    }
}
