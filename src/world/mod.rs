mod cell;
mod generator;
mod grid;
mod minerals;
mod terrain;

use bevy::prelude::*;
use tracing::info;

pub use cell::{Cell, LandmarkKind, Occupant, SpawnKind, TerrainKind};
pub use generator::{generate, GenContext};
pub use grid::WorldGrid;
pub use minerals::{pick_weighted, MineralDef, MineralKind};
pub use terrain::{terrain_for_noise, TerrainInfo};

/// Default level dimensions, in tiles.
pub const LEVEL_WIDTH: u32 = 64;
pub const LEVEL_HEIGHT: u32 = 64;

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WorldGrid>()
            .init_resource::<GenContext>()
            .add_systems(Startup, initialize_world);
    }
}

/// Build the level grid from the configured generation context.
pub fn initialize_world(mut grid: ResMut<WorldGrid>, ctx: Res<GenContext>) {
    *grid = generate(LEVEL_WIDTH, LEVEL_HEIGHT, &ctx);
    info!(
        seed = ctx.seed,
        depth = ctx.depth,
        "world grid initialized"
    );
}
