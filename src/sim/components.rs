use bevy::prelude::*;
use glam::Vec2;

use crate::world::MineralKind;

/// Position in world units (continuous, not grid-snapped).
#[derive(Component, Debug, Clone, Copy)]
pub struct Position(pub Vec2);

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}

/// Velocity in world units per second.
#[derive(Component, Debug, Clone, Copy)]
pub struct Velocity(pub Vec2);

impl Velocity {
    pub fn zero() -> Self {
        Self(Vec2::ZERO)
    }
}

/// Facing angle in radians, normalized into `(-PI, PI]` by its writers.
#[derive(Component, Debug, Clone, Copy)]
pub struct Facing(pub f32);

#[derive(Component, Debug)]
pub struct PlayerTag;

#[derive(Component, Debug)]
pub struct EnemyTag;

/// A collectible left in the world; consumed on contact.
#[derive(Component, Debug, Clone, Copy)]
pub struct Pickup {
    pub kind: MineralKind,
}

/// One bounded resource pool. Draining clamps at zero; it never goes
/// negative, so the terminal check can test equality with 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pool {
    pub current: f32,
    pub max: f32,
}

impl Pool {
    pub fn full(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn drain(&mut self, amount: f32) {
        self.current = (self.current - amount.max(0.0)).max(0.0);
    }

    pub fn refill(&mut self, amount: f32) {
        self.current = (self.current + amount.max(0.0)).min(self.max);
    }

    pub fn ratio(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }
}

/// The player's survival pools. Any of them hitting zero ends the run.
#[derive(Component, Debug, Clone, Copy)]
pub struct Pools {
    pub health: Pool,
    pub oxygen: Pool,
    pub fuel: Pool,
}

impl Pools {
    pub fn full(health: f32, oxygen: f32, fuel: f32) -> Self {
        Self {
            health: Pool::full(health),
            oxygen: Pool::full(oxygen),
            fuel: Pool::full(fuel),
        }
    }

    pub fn any_empty(&self) -> bool {
        self.health.is_empty() || self.oxygen.is_empty() || self.fuel.is_empty()
    }
}

/// Minerals collected this run.
#[derive(Component, Debug, Clone, Default)]
pub struct Cargo {
    pub items: Vec<(MineralKind, u32)>,
    pub total_value: u32,
}

impl Cargo {
    /// Record exactly one item at the mineral's table value.
    pub fn add(&mut self, kind: MineralKind) {
        let value = kind.def().value;
        self.items.push((kind, value));
        self.total_value += value;
    }
}

/// Seconds until the drill can fire again.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct DrillCooldown(pub f32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_never_goes_negative() {
        let mut pool = Pool::full(10.0);
        pool.drain(25.0);
        assert_eq!(pool.current, 0.0);
        assert!(pool.is_empty());
    }

    #[test]
    fn pool_refill_caps_at_max() {
        let mut pool = Pool::full(10.0);
        pool.drain(4.0);
        pool.refill(100.0);
        assert_eq!(pool.current, 10.0);
        assert!((pool.ratio() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn any_empty_triggers_on_each_pool() {
        let mut pools = Pools::full(5.0, 5.0, 5.0);
        assert!(!pools.any_empty());
        pools.oxygen.drain(5.0);
        assert!(pools.any_empty());
    }

    #[test]
    fn cargo_accumulates_table_values() {
        let mut cargo = Cargo::default();
        cargo.add(MineralKind::Coal);
        cargo.add(MineralKind::Gold);
        assert_eq!(cargo.items.len(), 2);
        assert_eq!(
            cargo.total_value,
            MineralKind::Coal.def().value + MineralKind::Gold.def().value
        );
    }
}
