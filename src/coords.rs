use glam::Vec2;

const SQRT_3: f32 = 1.732_050_8;

/// Axial hex coordinate (pointy-top layout).
/// The implicit third cube coordinate is `s = -q - r`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Axial {
    pub q: i32,
    pub r: i32,
}

impl Axial {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Center of this hex in pixel space for a given hex size.
    pub fn to_pixel(&self, size: f32) -> Vec2 {
        let x = size * (SQRT_3 * self.q as f32 + SQRT_3 / 2.0 * self.r as f32);
        let y = size * 1.5 * self.r as f32;
        Vec2::new(x, y)
    }

    /// Inverse of `to_pixel`: fractional axial coordinates, then cube rounding.
    pub fn from_pixel(point: Vec2, size: f32) -> Self {
        let qf = (SQRT_3 / 3.0 * point.x - 1.0 / 3.0 * point.y) / size;
        let rf = (2.0 / 3.0 * point.y) / size;
        cube_round(qf, rf)
    }

    /// Hex grid distance: the largest of the three cube-coordinate deltas.
    pub fn distance(&self, other: Axial) -> i32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        dq.max(dr).max(ds)
    }
}

/// Round fractional axial coordinates to the nearest hex.
/// Each cube component is rounded independently, then the component with the
/// largest rounding error is recomputed to restore `q + r + s == 0`.
fn cube_round(qf: f32, rf: f32) -> Axial {
    let sf = -qf - rf;

    let mut q = qf.round();
    let mut r = rf.round();
    let s = sf.round();

    let dq = (q - qf).abs();
    let dr = (r - rf).abs();
    let ds = (s - sf).abs();

    if dq > dr && dq > ds {
        q = -r - s;
    } else if dr > ds {
        r = -q - s;
    }
    // s is implicit, so a large s error needs no correction.

    Axial::new(q as i32, r as i32)
}

/// Cartesian tile coordinate for square grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
}

impl Tile {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Center of this tile in world space.
    pub fn to_world(&self, tile_size: f32) -> Vec2 {
        Vec2::new(
            (self.x as f32 + 0.5) * tile_size,
            (self.y as f32 + 0.5) * tile_size,
        )
    }

    pub fn from_world(point: Vec2, tile_size: f32) -> Self {
        Self {
            x: (point.x / tile_size).floor() as i32,
            y: (point.y / tile_size).floor() as i32,
        }
    }

    /// Distance for 8-directional movement.
    pub fn chebyshev(&self, other: Tile) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Distance for 4-directional movement.
    pub fn manhattan(&self, other: Tile) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn euclidean(&self, other: Tile) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }
}
