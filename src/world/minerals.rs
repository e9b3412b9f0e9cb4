use rand::Rng;
use smallvec::SmallVec;

/// Mineral kinds with fixed depth bands, deepest last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MineralKind {
    Coal = 0,
    Iron = 1,
    Silver = 2,
    Gold = 3,
    Ruby = 4,
    Diamond = 5,
}

/// Static mineral properties. `min_depth..=max_depth` is the validity band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MineralDef {
    pub name: &'static str,
    pub value: u32,
    pub min_depth: u32,
    pub max_depth: u32,
    pub color: [u8; 3],
}

impl MineralKind {
    pub const ALL: [MineralKind; 6] = [
        MineralKind::Coal,
        MineralKind::Iron,
        MineralKind::Silver,
        MineralKind::Gold,
        MineralKind::Ruby,
        MineralKind::Diamond,
    ];

    pub const fn def(self) -> &'static MineralDef {
        match self {
            MineralKind::Coal => &MineralDef {
                name: "coal",
                value: 10,
                min_depth: 0,
                max_depth: 40,
                color: [30, 30, 30],
            },
            MineralKind::Iron => &MineralDef {
                name: "iron",
                value: 30,
                min_depth: 5,
                max_depth: 70,
                color: [150, 110, 90],
            },
            MineralKind::Silver => &MineralDef {
                name: "silver",
                value: 80,
                min_depth: 20,
                max_depth: 110,
                color: [200, 200, 210],
            },
            MineralKind::Gold => &MineralDef {
                name: "gold",
                value: 180,
                min_depth: 45,
                max_depth: 160,
                color: [230, 190, 40],
            },
            MineralKind::Ruby => &MineralDef {
                name: "ruby",
                value: 400,
                min_depth: 80,
                max_depth: 220,
                color: [200, 30, 70],
            },
            MineralKind::Diamond => &MineralDef {
                name: "diamond",
                value: 900,
                min_depth: 130,
                max_depth: 300,
                color: [180, 230, 240],
            },
        }
    }
}

/// Weight for a mineral at a given depth. Zero outside its band; inside it,
/// decays linearly from the shallow edge, so a mineral is most common near
/// the top of its band and rare near the bottom.
fn weight_at(def: &MineralDef, depth: u32) -> f32 {
    if depth < def.min_depth || depth > def.max_depth {
        return 0.0;
    }
    let span = (def.max_depth - def.min_depth).max(1) as f32;
    let into_band = (depth - def.min_depth) as f32 / span;
    (1.0 - into_band).max(0.05)
}

/// Weighted random pick among minerals whose band contains `depth`.
/// Cumulative-subtraction sampling; `None` when no mineral qualifies, in
/// which case the caller falls back to plain terrain.
pub fn pick_weighted<R: Rng>(depth: u32, rng: &mut R) -> Option<MineralKind> {
    let mut candidates: SmallVec<[(MineralKind, f32); 6]> = SmallVec::new();
    let mut total = 0.0f32;

    for kind in MineralKind::ALL {
        let w = weight_at(kind.def(), depth);
        if w > 0.0 {
            candidates.push((kind, w));
            total += w;
        }
    }

    if candidates.is_empty() {
        return None;
    }

    let mut roll = rng.gen::<f32>() * total;
    for (kind, w) in &candidates {
        roll -= w;
        if roll <= 0.0 {
            return Some(*kind);
        }
    }
    // Float residue can leave roll a hair above zero after the loop.
    candidates.last().map(|(kind, _)| *kind)
}
