use bevy::prelude::*;
use glam::Vec2;
use std::f32::consts::{PI, TAU};
use tracing::info;

use crate::coords::Tile;
use crate::sim::behavior::{behavior_velocity, next_state, Behavior, BehaviorState};
use crate::sim::components::*;
use crate::sim::input::{Action, InputState};
use crate::sim::{GameState, SimConfig};
use crate::utils::SpatialIndex;
use crate::vision::{is_visible, normalize_angle, reveal_around, ObserverPose};
use crate::world::{
    GenContext, LandmarkKind, MineralKind, Occupant, SpawnKind, TerrainKind, WorldGrid,
};

/// Consume the grid's spawn markers into live entities and start the run.
pub fn spawn_level_entities(
    mut commands: Commands,
    mut grid: ResMut<WorldGrid>,
    ctx: Res<GenContext>,
    cfg: Res<SimConfig>,
    mut state: ResMut<GameState>,
) {
    let start = grid.clamp(ctx.player_start);
    commands.spawn((
        PlayerTag,
        Position(start.to_world(cfg.tile_size)),
        Velocity::zero(),
        Facing(0.0),
        Pools::full(cfg.player_health, cfg.player_oxygen, cfg.player_fuel),
        Cargo::default(),
        DrillCooldown::default(),
    ));

    let spawns: Vec<(Tile, SpawnKind)> = grid
        .iter_tiles()
        .filter_map(|tile| match grid.occupant(tile) {
            Some(Occupant::Spawn(kind)) => Some((tile, kind)),
            _ => None,
        })
        .collect();

    let mut enemies = 0usize;
    let mut pickups = 0usize;
    for (tile, kind) in spawns {
        grid.clear_occupant(tile);
        let position = Position(tile.to_world(cfg.tile_size));
        match kind {
            SpawnKind::Enemy => {
                commands.spawn((
                    EnemyTag,
                    position,
                    Velocity::zero(),
                    Facing(0.0),
                    Behavior::default(),
                ));
                enemies += 1;
            }
            SpawnKind::Pickup(mineral) => {
                commands.spawn((position, Pickup { kind: mineral }));
                pickups += 1;
            }
        }
    }

    reveal_around(&mut grid, start, cfg.reveal_radius);
    *state = GameState::Playing;
    info!(enemies, pickups, "level entities spawned, run started");
}

/// Sample the pressed-action map into player velocity and facing.
pub fn apply_player_input(
    state: Res<GameState>,
    input: Res<InputState>,
    cfg: Res<SimConfig>,
    mut query: Query<(&mut Velocity, &mut Facing), With<PlayerTag>>,
) {
    if *state != GameState::Playing {
        return;
    }
    for (mut velocity, mut facing) in query.iter_mut() {
        let axis = input.movement_axis();
        velocity.0 = axis * cfg.player_speed;
        if axis != Vec2::ZERO {
            facing.0 = normalize_angle(axis.y.atan2(axis.x));
        }
    }
}

/// Axis-separated tile collision: each axis moves only if its destination
/// tile is passable, so sliding along walls works.
pub fn move_with_collision(
    position: Vec2,
    velocity: Vec2,
    dt: f32,
    grid: &WorldGrid,
    tile_size: f32,
) -> Vec2 {
    let mut next = position;

    let step_x = Vec2::new(position.x + velocity.x * dt, next.y);
    if grid.is_passable(Tile::from_world(step_x, tile_size)) {
        next.x = step_x.x;
    }

    let step_y = Vec2::new(next.x, position.y + velocity.y * dt);
    if grid.is_passable(Tile::from_world(step_y, tile_size)) {
        next.y = step_y.y;
    }

    // Keep positions on the map even if a passability check was skipped by
    // starting out of bounds.
    let margin = tile_size * 0.01;
    let max_x = grid.width() as f32 * tile_size;
    let max_y = grid.height() as f32 * tile_size;
    next.x = next.x.clamp(0.0, (max_x - margin).max(0.0));
    next.y = next.y.clamp(0.0, (max_y - margin).max(0.0));
    next
}

pub fn integrate_movement(
    state: Res<GameState>,
    time: Res<Time>,
    cfg: Res<SimConfig>,
    grid: Res<WorldGrid>,
    mut query: Query<(&mut Position, &Velocity)>,
) {
    if *state != GameState::Playing {
        return;
    }
    let dt = time.delta_seconds();
    for (mut position, velocity) in query.iter_mut() {
        position.0 = move_with_collision(position.0, velocity.0, dt, &grid, cfg.tile_size);
    }
}

/// Rebuild the proximity index from this frame's enemy positions.
pub fn rebuild_spatial_index(
    index: Res<SpatialIndex>,
    query: Query<(Entity, &Position), With<EnemyTag>>,
) {
    index.clear();
    for (entity, position) in query.iter() {
        index.insert(entity, position.0);
    }
}

/// Drive each enemy's state machine. Perception is the enemy's own vision
/// cone plus line of sight against the grid.
pub fn update_enemy_behavior(
    state: Res<GameState>,
    time: Res<Time>,
    cfg: Res<SimConfig>,
    grid: Res<WorldGrid>,
    player_query: Query<&Position, (With<PlayerTag>, Without<EnemyTag>)>,
    mut enemies: Query<
        (&Position, &mut Behavior, &mut Velocity, &mut Facing),
        With<EnemyTag>,
    >,
) {
    if *state != GameState::Playing {
        return;
    }
    let player_pos = match player_query.get_single() {
        Ok(p) => p.0,
        Err(_) => return,
    };
    let dt = time.delta_seconds();

    for (position, mut behavior, mut velocity, mut facing) in enemies.iter_mut() {
        behavior.state_time += dt;

        let distance = position.0.distance(player_pos);
        let pose = ObserverPose::new(position.0, facing.0, cfg.enemy.detect_radius);
        let perceived = is_visible(&pose, cfg.cone, player_pos, &grid, cfg.tile_size);

        let next = next_state(behavior.state, distance, perceived, behavior.state_time, &cfg.enemy);
        if next == BehaviorState::Patrol && behavior.state != BehaviorState::Patrol {
            behavior.patrol_heading = normalize_angle(fastrand::f32() * TAU - PI);
        }
        behavior.set_state(next);
        if matches!(behavior.state, BehaviorState::Chase | BehaviorState::Attack) {
            behavior.target = Some(player_pos);
        }

        velocity.0 = behavior_velocity(&behavior, position.0, cfg.enemy_speed);
        if velocity.0 != Vec2::ZERO {
            facing.0 = normalize_angle(velocity.0.y.atan2(velocity.0.x));
        }
    }
}

/// Enemies in contact range chip the player's health each tick.
pub fn enemy_contact_damage(
    state: Res<GameState>,
    time: Res<Time>,
    cfg: Res<SimConfig>,
    index: Res<SpatialIndex>,
    mut player_query: Query<(&Position, &mut Pools), With<PlayerTag>>,
) {
    if *state != GameState::Playing {
        return;
    }
    let dt = time.delta_seconds();
    for (position, mut pools) in player_query.iter_mut() {
        let attackers = index.within(position.0, cfg.contact_radius).len();
        if attackers > 0 {
            pools.health.drain(cfg.contact_damage * attackers as f32 * dt);
        }
    }
}

/// What a single drill action did to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillOutcome {
    Nothing,
    /// A deposit was consumed: exactly one item of its table value went to
    /// cargo and the cell's occupant was cleared.
    Collected(MineralKind),
    /// Drillable terrain was broken open.
    Cleared,
}

pub fn drill_cell(grid: &mut WorldGrid, tile: Tile, cargo: &mut Cargo) -> DrillOutcome {
    let cell = match grid.get_mut(tile) {
        Some(c) => c,
        None => return DrillOutcome::Nothing,
    };
    if let Some(Occupant::Deposit(kind)) = cell.occupant {
        cell.occupant = None;
        cargo.add(kind);
        return DrillOutcome::Collected(kind);
    }
    if cell.terrain.info().drillable {
        cell.terrain = TerrainKind::Open;
        return DrillOutcome::Cleared;
    }
    DrillOutcome::Nothing
}

/// Drill the tile in front of the player while the drill action is held.
pub fn handle_drilling(
    state: Res<GameState>,
    time: Res<Time>,
    cfg: Res<SimConfig>,
    input: Res<InputState>,
    mut grid: ResMut<WorldGrid>,
    mut player_query: Query<
        (&Position, &Facing, &mut Cargo, &mut Pools, &mut DrillCooldown),
        With<PlayerTag>,
    >,
) {
    if *state != GameState::Playing {
        return;
    }
    let dt = time.delta_seconds();
    for (position, facing, mut cargo, mut pools, mut cooldown) in player_query.iter_mut() {
        cooldown.0 = (cooldown.0 - dt).max(0.0);
        if !input.is_pressed(Action::Drill) || cooldown.0 > 0.0 || pools.fuel.is_empty() {
            continue;
        }
        let front = position.0 + Vec2::from_angle(facing.0) * cfg.tile_size;
        let tile = Tile::from_world(front, cfg.tile_size);
        match drill_cell(&mut grid, tile, &mut cargo) {
            DrillOutcome::Nothing => {}
            outcome => {
                pools.fuel.drain(cfg.drill_fuel_cost);
                cooldown.0 = cfg.drill_cooldown;
                if let DrillOutcome::Collected(kind) = outcome {
                    info!(mineral = kind.def().name, value = kind.def().value, "deposit collected");
                }
            }
        }
    }
}

/// Pickups within reach go straight to cargo.
pub fn collect_pickups(
    state: Res<GameState>,
    cfg: Res<SimConfig>,
    mut commands: Commands,
    mut player_query: Query<(&Position, &mut Cargo), With<PlayerTag>>,
    pickups: Query<(Entity, &Position, &Pickup), Without<PlayerTag>>,
) {
    if *state != GameState::Playing {
        return;
    }
    for (player_pos, mut cargo) in player_query.iter_mut() {
        for (entity, pickup_pos, pickup) in pickups.iter() {
            if player_pos.0.distance(pickup_pos.0) <= cfg.pickup_radius {
                cargo.add(pickup.kind);
                commands.entity(entity).despawn();
            }
        }
    }
}

/// Fixed per-tick pool deltas, gated by movement and action flags.
pub fn drain_pools(
    state: Res<GameState>,
    time: Res<Time>,
    cfg: Res<SimConfig>,
    input: Res<InputState>,
    mut player_query: Query<(&Velocity, &mut Pools), With<PlayerTag>>,
) {
    if *state != GameState::Playing {
        return;
    }
    let dt = time.delta_seconds();
    for (velocity, mut pools) in player_query.iter_mut() {
        pools.oxygen.drain(cfg.oxygen_drain * dt);
        if velocity.0.length_squared() > 1e-6 {
            pools.fuel.drain(cfg.fuel_drain_moving * dt);
        }
        if input.is_pressed(Action::Light) {
            pools.fuel.drain(cfg.light_fuel_drain * dt);
        }
    }
}

/// Monotonic fog-of-war reveal around the player.
pub fn reveal_explored(
    state: Res<GameState>,
    cfg: Res<SimConfig>,
    mut grid: ResMut<WorldGrid>,
    player_query: Query<&Position, With<PlayerTag>>,
) {
    if *state != GameState::Playing {
        return;
    }
    for position in player_query.iter() {
        let tile = Tile::from_world(position.0, cfg.tile_size);
        reveal_around(&mut grid, tile, cfg.reveal_radius);
    }
}

/// Decide whether the run ends this frame. An empty pool always wins over
/// standing on the exit.
pub fn terminal_transition(pools: &Pools, at_exit: bool) -> Option<GameState> {
    if pools.any_empty() {
        Some(GameState::GameOver)
    } else if at_exit {
        Some(GameState::Victory)
    } else {
        None
    }
}

/// Checked once per frame after all mutation.
pub fn check_terminal_state(
    mut state: ResMut<GameState>,
    cfg: Res<SimConfig>,
    grid: Res<WorldGrid>,
    player_query: Query<(&Position, &Pools), With<PlayerTag>>,
) {
    if *state != GameState::Playing {
        return;
    }
    for (position, pools) in player_query.iter() {
        let tile = Tile::from_world(position.0, cfg.tile_size);
        let at_exit = matches!(
            grid.occupant(tile),
            Some(Occupant::Landmark(LandmarkKind::Exit))
        );
        if let Some(next) = terminal_transition(pools, at_exit) {
            info!(?next, "run ended");
            *state = next;
        }
    }
}
