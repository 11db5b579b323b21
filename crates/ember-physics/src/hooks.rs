//! Gameplay seam inside the collision pass

use ember_ecs::{Entity, World};
use glam::Vec3;

/// Side effects layered on top of generic collision resolution.
///
/// Both callbacks run inside the pair loop of every sub-step: `filter_pair`
/// before the narrow-phase test, `on_contact` after a hit is detected and
/// before positions and velocities are corrected.
pub trait CollisionHooks: Send + Sync {
    /// Return `false` to skip the pair entirely.
    fn filter_pair(&mut self, _world: &World, _a: Entity, _b: Entity) -> bool {
        true
    }

    /// Called once per detected contact.
    fn on_contact(&mut self, _world: &mut World, _a: Entity, _b: Entity) {}
}

/// Pure physics, no gameplay reactions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl CollisionHooks for NoHooks {}

/// One resolved contact, recorded for consumers scheduled after physics
/// (audio cues, hit reactions).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub a: Entity,
    pub b: Entity,
    /// Unit vector from A toward B
    pub normal: Vec3,
    pub depth: f32,
}

/// Contacts detected during the current frame, across all sub-steps.
#[derive(Debug, Clone, Default)]
pub struct CollisionEvents {
    pub events: Vec<CollisionEvent>,
}

impl CollisionEvents {
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Whether `entity` took part in any contact this frame.
    pub fn involves(&self, entity: Entity) -> bool {
        self.events.iter().any(|e| e.a == entity || e.b == entity)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
