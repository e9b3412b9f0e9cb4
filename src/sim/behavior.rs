use bevy::prelude::*;
use glam::Vec2;

/// Enemy state machine:
/// idle -> (target perceived in range) -> chase -> (contact) -> attack,
/// losing the target beyond the lose radius drops back to idle.
/// Patrol is the wandering flavor of idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorState {
    Idle,
    Patrol,
    Chase,
    Attack,
}

#[derive(Component, Debug)]
pub struct Behavior {
    pub state: BehaviorState,
    /// Last known target position while chasing or attacking.
    pub target: Option<Vec2>,
    /// Seconds spent in the current state.
    pub state_time: f32,
    /// Wander heading while patrolling.
    pub patrol_heading: f32,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            state: BehaviorState::Idle,
            target: None,
            state_time: 0.0,
            patrol_heading: 0.0,
        }
    }
}

impl Behavior {
    pub fn set_state(&mut self, new_state: BehaviorState) {
        if self.state != new_state {
            self.state = new_state;
            self.state_time = 0.0;
            self.target = None;
        }
    }
}

/// Perception radii and timings for the enemy FSM.
#[derive(Debug, Clone, Copy)]
pub struct EnemyTuning {
    pub detect_radius: f32,
    pub lose_radius: f32,
    pub attack_radius: f32,
    /// Seconds of idling before picking a patrol heading.
    pub idle_time: f32,
    /// Seconds of patrolling before pausing again.
    pub patrol_time: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            detect_radius: 9.0,
            lose_radius: 13.0,
            // Must stay inside the contact-damage radius: an attacker holds
            // still, so it only hurts if contact already applies.
            attack_radius: 0.8,
            idle_time: 1.5,
            patrol_time: 4.0,
        }
    }
}

/// Pure transition function; perception (cone + line of sight) is resolved by
/// the caller and passed in as `target_perceived`.
pub fn next_state(
    current: BehaviorState,
    distance_to_target: f32,
    target_perceived: bool,
    state_time: f32,
    tuning: &EnemyTuning,
) -> BehaviorState {
    let detected = target_perceived && distance_to_target <= tuning.detect_radius;
    match current {
        BehaviorState::Idle => {
            if detected {
                BehaviorState::Chase
            } else if state_time >= tuning.idle_time {
                BehaviorState::Patrol
            } else {
                BehaviorState::Idle
            }
        }
        BehaviorState::Patrol => {
            if detected {
                BehaviorState::Chase
            } else if state_time >= tuning.patrol_time {
                BehaviorState::Idle
            } else {
                BehaviorState::Patrol
            }
        }
        BehaviorState::Chase => {
            if distance_to_target <= tuning.attack_radius {
                BehaviorState::Attack
            } else if distance_to_target > tuning.lose_radius {
                BehaviorState::Idle
            } else {
                BehaviorState::Chase
            }
        }
        BehaviorState::Attack => {
            if distance_to_target > tuning.lose_radius {
                BehaviorState::Idle
            } else if distance_to_target > tuning.attack_radius {
                BehaviorState::Chase
            } else {
                BehaviorState::Attack
            }
        }
    }
}

/// Desired velocity for the current state.
pub fn behavior_velocity(behavior: &Behavior, position: Vec2, speed: f32) -> Vec2 {
    match behavior.state {
        BehaviorState::Idle => Vec2::ZERO,
        BehaviorState::Patrol => Vec2::from_angle(behavior.patrol_heading) * speed * 0.5,
        BehaviorState::Chase => match behavior.target {
            Some(target) => (target - position).normalize_or_zero() * speed,
            None => Vec2::ZERO,
        },
        // Contact damage is applied by a separate system; attackers hold still.
        BehaviorState::Attack => Vec2::ZERO,
    }
}
