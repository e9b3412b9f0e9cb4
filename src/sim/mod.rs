mod behavior;
mod components;
mod input;
mod systems;

use bevy::prelude::*;

use crate::utils::SpatialIndex;
use crate::vision::VisionCone;

pub use behavior::{behavior_velocity, next_state, Behavior, BehaviorState, EnemyTuning};
pub use components::{
    Cargo, DrillCooldown, EnemyTag, Facing, Pickup, PlayerTag, Pool, Pools, Position, Velocity,
};
pub use input::{Action, InputState};
pub use systems::{drill_cell, move_with_collision, terminal_transition, DrillOutcome};

/// Top-level run state, checked once per frame after mutation.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    Menu,
    Playing,
    GameOver,
    Victory,
}

/// All simulation tuning in one place. Per-second rates; systems multiply by
/// the frame delta.
#[derive(Resource, Debug, Clone)]
pub struct SimConfig {
    pub tile_size: f32,
    pub player_speed: f32,
    pub enemy_speed: f32,
    pub player_health: f32,
    pub player_oxygen: f32,
    pub player_fuel: f32,
    pub oxygen_drain: f32,
    pub fuel_drain_moving: f32,
    pub light_fuel_drain: f32,
    pub drill_fuel_cost: f32,
    pub drill_cooldown: f32,
    pub contact_damage: f32,
    pub contact_radius: f32,
    pub pickup_radius: f32,
    pub reveal_radius: i32,
    pub cone: VisionCone,
    pub enemy: EnemyTuning,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tile_size: 1.0,
            player_speed: 6.0,
            enemy_speed: 4.0,
            player_health: 100.0,
            player_oxygen: 60.0,
            player_fuel: 80.0,
            oxygen_drain: 0.5,
            fuel_drain_moving: 0.8,
            light_fuel_drain: 0.3,
            drill_fuel_cost: 2.0,
            drill_cooldown: 0.35,
            contact_damage: 12.0,
            contact_radius: 0.9,
            pickup_radius: 0.6,
            reveal_radius: 4,
            cone: VisionCone::default(),
            enemy: EnemyTuning::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attack_range_sits_inside_contact_damage_range() {
        // An enemy in Attack stops moving, so the state is only reachable
        // where contact damage actually applies.
        let cfg = SimConfig::default();
        assert!(cfg.enemy.attack_radius <= cfg.contact_radius);
    }

    #[test]
    fn perception_radii_are_ordered() {
        let cfg = SimConfig::default();
        assert!(cfg.enemy.detect_radius < cfg.enemy.lose_radius);
        assert!(cfg.enemy.attack_radius < cfg.enemy.detect_radius);
    }
}

pub struct SimPlugin;

impl Plugin for SimPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputState>()
            .init_resource::<SpatialIndex>()
            .init_resource::<GameState>()
            .init_resource::<SimConfig>()
            // PostStartup so the world grid exists before markers are consumed.
            .add_systems(PostStartup, systems::spawn_level_entities)
            .add_systems(
                Update,
                (
                    systems::apply_player_input,
                    systems::integrate_movement,
                    systems::rebuild_spatial_index,
                    systems::update_enemy_behavior,
                    systems::enemy_contact_damage,
                    systems::handle_drilling,
                    systems::collect_pickups,
                    systems::drain_pools,
                    systems::reveal_explored,
                    systems::check_terminal_state,
                )
                    .chain(),
            );
    }
}
