use crate::world::minerals::MineralKind;

/// A single cell of the level grid.
/// Exactly one terrain kind per cell; the occupant is optional and only ever
/// placed on passable terrain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub terrain: TerrainKind,
    pub occupant: Option<Occupant>,
    /// Flips true once any observer's reveal includes this cell; never cleared.
    pub revealed: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            terrain: TerrainKind::Open,
            occupant: None,
            revealed: false,
        }
    }
}

impl Cell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_terrain(terrain: TerrainKind) -> Self {
        Self {
            terrain,
            ..Default::default()
        }
    }

    /// Passable and free of any occupant, so a point of interest may land here.
    pub fn is_open_for_placement(&self) -> bool {
        self.terrain.info().passable && self.occupant.is_none()
    }
}

/// Terrain kinds, closed so lookups are exhaustively checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum TerrainKind {
    #[default]
    Open = 0,
    Rubble = 1,
    Wall = 2,
    Water = 3,
    Lava = 4,
}

/// What sits in a cell on top of the terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupant {
    Deposit(MineralKind),
    Landmark(LandmarkKind),
    Spawn(SpawnKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkKind {
    Shrine,
    Wreck,
    /// Reaching this cell ends the run in victory.
    Exit,
}

/// Markers consumed at level start when the matching entity is spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    Enemy,
    Pickup(MineralKind),
}
