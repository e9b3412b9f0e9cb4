use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::coords::Tile;
use crate::world::cell::{LandmarkKind, Occupant, SpawnKind, TerrainKind};
use crate::world::grid::WorldGrid;
use crate::world::minerals::pick_weighted;
use crate::world::terrain::terrain_for_noise;

/// Placement gives up on a point of interest after this many rejected
/// candidates and skips the remainder of its category.
const PLACEMENT_ATTEMPTS: usize = 50;

/// Everything a level generation run needs. Same context + same seed means
/// an identical grid.
#[derive(Debug, Clone, bevy::prelude::Resource)]
pub struct GenContext {
    pub seed: u64,
    /// Depth of this level's surface row; deeper rows add their row index.
    pub depth: u32,
    pub deposit_target: usize,
    pub enemy_count: usize,
    pub pickup_count: usize,
    pub landmark_count: usize,
    /// The exit landmark must be at least this far (Chebyshev) from the start.
    pub goal_min_distance: i32,
    pub player_start: Tile,
}

impl Default for GenContext {
    fn default() -> Self {
        Self {
            seed: 0,
            depth: 0,
            deposit_target: 40,
            enemy_count: 6,
            pickup_count: 4,
            landmark_count: 3,
            goal_min_distance: 18,
            player_start: Tile::new(2, 2),
        }
    }
}

/// Generate a level: banded-noise base terrain, weighted mineral deposits,
/// then point-of-interest placement with bounded retries.
pub fn generate(width: u32, height: u32, ctx: &GenContext) -> WorldGrid {
    let mut grid = WorldGrid::new(width, height);
    fill_terrain(&mut grid, ctx);
    carve_start(&mut grid, ctx);
    scatter_deposits(&mut grid, ctx);
    place_points_of_interest(&mut grid, ctx);
    info!(
        width,
        height,
        seed = ctx.seed,
        "generated level"
    );
    grid
}

fn row_rng(seed: u64, row: usize) -> StdRng {
    // Per-row seed derivation keeps the parallel fill deterministic.
    StdRng::seed_from_u64(seed ^ (row as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15))
}

/// Base terrain: a smooth pseudo-noise scalar per cell (summed sine/cosine of
/// the coordinates plus a seeded jitter term) thresholded into terrain bands.
fn fill_terrain(grid: &mut WorldGrid, ctx: &GenContext) {
    let phase = (ctx.seed % 628) as f32 / 100.0;
    grid.rows_mut()
        .enumerate()
        .par_bridge()
        .for_each(|(y, row)| {
            let mut rng = row_rng(ctx.seed, y);
            for (x, cell) in row.iter_mut().enumerate() {
                let xf = x as f32;
                let yf = y as f32;
                let wave = 0.26 * (xf * 0.31 + phase).sin()
                    + 0.22 * (yf * 0.23 + phase * 0.7).cos()
                    + 0.12 * ((xf + yf) * 0.11).sin();
                let jitter = rng.gen::<f32>() * 0.28;
                let noise = (0.42 + wave + jitter).clamp(0.0, 1.0);
                cell.terrain = terrain_for_noise(noise);
            }
        });
}

/// Keep a guaranteed-passable pocket around the player start.
fn carve_start(grid: &mut WorldGrid, ctx: &GenContext) {
    let start = grid.clamp(ctx.player_start);
    for dy in -1..=1 {
        for dx in -1..=1 {
            let tile = Tile::new(start.x + dx, start.y + dy);
            if let Some(cell) = grid.get_mut(tile) {
                cell.terrain = TerrainKind::Open;
                cell.occupant = None;
            }
        }
    }
}

/// Roll placeable cells against the mineral table, deeper rows drawing from
/// deeper bands, until the deposit budget is spent. Candidate order is
/// shuffled so the budget does not exhaust on the shallowest rows and every
/// depth band stays reachable.
fn scatter_deposits(grid: &mut WorldGrid, ctx: &GenContext) {
    let mut rng = StdRng::seed_from_u64(ctx.seed.wrapping_add(0x5eed_d09e));
    let mut placed = 0usize;
    let start = grid.clamp(ctx.player_start);

    let mut tiles: Vec<Tile> = grid.iter_tiles().collect();
    tiles.shuffle(&mut rng);
    for tile in tiles {
        if placed >= ctx.deposit_target {
            break;
        }
        if tile.chebyshev(start) <= 1 {
            continue;
        }
        let cell = match grid.get(tile) {
            Some(c) => *c,
            None => continue,
        };
        if !cell.is_open_for_placement() {
            continue;
        }
        if rng.gen::<f32>() > 0.12 {
            continue;
        }
        let depth = ctx.depth + tile.y as u32;
        if let Some(kind) = pick_weighted(depth, &mut rng) {
            if let Some(cell) = grid.get_mut(tile) {
                cell.occupant = Some(Occupant::Deposit(kind));
                placed += 1;
            }
        }
    }

    if placed < ctx.deposit_target {
        debug!(
            placed,
            requested = ctx.deposit_target,
            "deposit scatter fell short"
        );
    }
}

fn place_points_of_interest(grid: &mut WorldGrid, ctx: &GenContext) {
    let mut rng = StdRng::seed_from_u64(ctx.seed.wrapping_add(0x901f_00d5));
    let start = grid.clamp(ctx.player_start);

    // Nothing spawns on top of the player: every category keeps some
    // distance from the start, the exit a configurable lot more.
    place_category(
        grid,
        &mut rng,
        ctx.enemy_count,
        Some((start, 3)),
        "enemies",
        |_| Occupant::Spawn(SpawnKind::Enemy),
    );

    let depth = ctx.depth;
    place_category(
        grid,
        &mut rng,
        ctx.pickup_count,
        Some((start, 2)),
        "pickups",
        |rng| {
            let kind =
                pick_weighted(depth, rng).unwrap_or(crate::world::minerals::MineralKind::Coal);
            Occupant::Spawn(SpawnKind::Pickup(kind))
        },
    );

    place_category(
        grid,
        &mut rng,
        ctx.landmark_count,
        Some((start, 2)),
        "landmarks",
        |rng| {
            if rng.gen_bool(0.5) {
                Occupant::Landmark(LandmarkKind::Shrine)
            } else {
                Occupant::Landmark(LandmarkKind::Wreck)
            }
        },
    );

    // The exit is the one "far" point: it must sit away from the start.
    place_category(
        grid,
        &mut rng,
        1,
        Some((start, ctx.goal_min_distance)),
        "exit",
        |_| Occupant::Landmark(LandmarkKind::Exit),
    );
}

/// Place `count` occupants of one category on uniformly random passable,
/// unoccupied cells. Each placement gets `PLACEMENT_ATTEMPTS` candidates;
/// when one placement exhausts them, the rest of the category is skipped.
fn place_category(
    grid: &mut WorldGrid,
    rng: &mut StdRng,
    count: usize,
    min_distance_from: Option<(Tile, i32)>,
    label: &str,
    mut make: impl FnMut(&mut StdRng) -> Occupant,
) {
    let (width, height) = (grid.width() as i32, grid.height() as i32);
    if width == 0 || height == 0 {
        return;
    }

    for placed in 0..count {
        let mut done = false;
        for _ in 0..PLACEMENT_ATTEMPTS {
            let tile = Tile::new(rng.gen_range(0..width), rng.gen_range(0..height));
            let open = grid
                .get(tile)
                .map(|c| c.is_open_for_placement())
                .unwrap_or(false);
            if !open {
                continue;
            }
            if let Some((from, min_d)) = min_distance_from {
                if tile.chebyshev(from) < min_d {
                    continue;
                }
            }
            let occupant = make(rng);
            if let Some(cell) = grid.get_mut(tile) {
                cell.occupant = Some(occupant);
                done = true;
                break;
            }
        }
        if !done {
            debug!(label, placed, requested = count, "placement exhausted, skipping rest");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::cell::Cell;

    fn count_occupants(grid: &WorldGrid, pred: impl Fn(&Occupant) -> bool) -> usize {
        grid.cells()
            .iter()
            .filter_map(|c| c.occupant.as_ref())
            .filter(|o| pred(o))
            .count()
    }

    #[test]
    fn generation_is_deterministic_under_a_fixed_seed() {
        let ctx = GenContext {
            seed: 1234,
            ..Default::default()
        };
        let a = generate(48, 48, &ctx);
        let b = generate(48, 48, &ctx);
        assert_eq!(a.cells(), b.cells());
    }

    #[test]
    fn different_seeds_diverge() {
        let a = generate(48, 48, &GenContext { seed: 1, ..Default::default() });
        let b = generate(48, 48, &GenContext { seed: 2, ..Default::default() });
        assert_ne!(a.cells(), b.cells());
    }

    #[test]
    fn start_pocket_is_passable_and_clear(){
        let ctx = GenContext { seed: 99, ..Default::default() };
        let grid = generate(40, 40, &ctx);
        let start = ctx.player_start;
        assert!(grid.is_passable(start));
        assert!(grid.get(start).unwrap().occupant.is_none());
    }

    #[test]
    fn placements_never_exceed_requests() {
        let ctx = GenContext { seed: 7, ..Default::default() };
        let grid = generate(40, 40, &ctx);
        assert!(
            count_occupants(&grid, |o| matches!(o, Occupant::Deposit(_)))
                <= ctx.deposit_target
        );
        assert!(
            count_occupants(&grid, |o| matches!(o, Occupant::Spawn(SpawnKind::Enemy)))
                <= ctx.enemy_count
        );
        assert!(
            count_occupants(&grid, |o| matches!(o, Occupant::Landmark(LandmarkKind::Exit))) <= 1
        );
    }

    #[test]
    fn exit_respects_minimum_distance() {
        let ctx = GenContext { seed: 21, goal_min_distance: 15, ..Default::default() };
        let grid = generate(40, 40, &ctx);
        for tile in grid.iter_tiles() {
            if matches!(
                grid.occupant(tile),
                Some(Occupant::Landmark(LandmarkKind::Exit))
            ) {
                assert!(tile.chebyshev(ctx.player_start) >= ctx.goal_min_distance);
            }
        }
    }

    #[test]
    fn occupants_only_on_passable_terrain() {
        let grid = generate(40, 40, &GenContext { seed: 5, ..Default::default() });
        for cell in grid.cells() {
            if cell.occupant.is_some() {
                assert!(cell.terrain.info().passable);
            }
        }
    }

    #[test]
    fn crowded_map_degrades_instead_of_hanging() {
        // A 3x3 grid cannot hold the default POI counts; generation must
        // finish and simply place fewer.
        let ctx = GenContext { seed: 3, ..Default::default() };
        let grid = generate(3, 3, &ctx);
        let total: usize = grid.cells().iter().filter(|c| c.occupant.is_some()).count();
        assert!(total <= 9);
    }

    #[test]
    fn deposits_match_their_row_depth() {
        let ctx = GenContext { seed: 11, depth: 0, ..Default::default() };
        let grid = generate(40, 40, &ctx);
        for tile in grid.iter_tiles() {
            if let Some(Occupant::Deposit(kind)) = grid.occupant(tile) {
                let def = kind.def();
                let depth = ctx.depth + tile.y as u32;
                assert!(def.min_depth <= depth && depth <= def.max_depth);
            }
        }
    }

    #[test]
    fn deposits_span_deep_rows_on_a_tall_grid() {
        // With shuffled candidates the budget must not exhaust on the
        // shallowest rows; deep bands (gold, ruby, diamond) stay reachable.
        let ctx = GenContext {
            seed: 17,
            depth: 0,
            deposit_target: 60,
            ..Default::default()
        };
        let grid = generate(16, 200, &ctx);

        let mut deepest = 0i32;
        let mut deep_band_seen = false;
        for tile in grid.iter_tiles() {
            if let Some(Occupant::Deposit(kind)) = grid.occupant(tile) {
                deepest = deepest.max(tile.y);
                if kind.def().min_depth >= 45 {
                    deep_band_seen = true;
                }
            }
        }
        assert!(deepest > 40, "all deposits clustered above row {deepest}");
        assert!(deep_band_seen, "no deep-band mineral was ever placed");
    }

    #[test]
    fn deterministic_even_with_parallel_fill() {
        // Rows seed independently, so thread scheduling cannot change output.
        let ctx = GenContext { seed: 555, ..Default::default() };
        let grids: Vec<Vec<Cell>> = (0..4)
            .map(|_| generate(32, 32, &ctx).cells().to_vec())
            .collect();
        for pair in grids.windows(2) {
            assert_eq!(pair[0], pair[1]);
        }
    }
}
