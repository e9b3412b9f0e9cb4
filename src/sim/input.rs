use bevy::prelude::Resource;
use glam::Vec2;
use std::collections::HashSet;

/// Game actions a host maps raw key/pointer events onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Drill,
    Light,
}

/// Sparse pressed-action map plus pointer state, sampled once per frame.
/// The host sets and clears actions from its own event loop; the simulation
/// only reads.
#[derive(Resource, Debug, Default)]
pub struct InputState {
    pressed: HashSet<Action>,
    pub pointer: Vec2,
    pub pointer_down: bool,
}

impl InputState {
    pub fn press(&mut self, action: Action) {
        self.pressed.insert(action);
    }

    pub fn release(&mut self, action: Action) {
        self.pressed.remove(&action);
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    pub fn clear(&mut self) {
        self.pressed.clear();
        self.pointer_down = false;
    }

    /// 8-directional movement axis; diagonals normalized so they are not
    /// faster than cardinal movement.
    pub fn movement_axis(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.is_pressed(Action::MoveRight) {
            axis.x += 1.0;
        }
        if self.is_pressed(Action::MoveLeft) {
            axis.x -= 1.0;
        }
        if self.is_pressed(Action::MoveDown) {
            axis.y += 1.0;
        }
        if self.is_pressed(Action::MoveUp) {
            axis.y -= 1.0;
        }
        axis.normalize_or_zero()
    }
}
