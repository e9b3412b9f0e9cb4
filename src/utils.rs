use bevy_ecs::prelude::{Entity, Resource};
use dashmap::DashMap;
use glam::Vec2;

/// Entity positions rebuilt once per frame for proximity queries.
/// Cleared and refilled by the index system; readers only ever see the
/// current frame's snapshot.
#[derive(Resource, Default)]
pub struct SpatialIndex {
    entries: DashMap<Entity, Vec2>,
}

impl SpatialIndex {
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn insert(&self, entity: Entity, position: Vec2) {
        self.entries.insert(entity, position);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All indexed entities within `radius` of `center`.
    pub fn within(&self, center: Vec2, radius: f32) -> Vec<(Entity, Vec2)> {
        self.entries
            .iter()
            .filter(|entry| entry.value().distance(center) <= radius)
            .map(|entry| (*entry.key(), *entry.value()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_filters_by_radius() {
        let index = SpatialIndex::default();
        let near = Entity::from_raw(1);
        let far = Entity::from_raw(2);
        index.insert(near, Vec2::new(1.0, 0.0));
        index.insert(far, Vec2::new(50.0, 0.0));

        let hits = index.within(Vec2::ZERO, 5.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, near);
    }

    #[test]
    fn clear_resets_the_frame() {
        let index = SpatialIndex::default();
        index.insert(Entity::from_raw(3), Vec2::ZERO);
        assert_eq!(index.len(), 1);
        index.clear();
        assert!(index.is_empty());
    }
}
