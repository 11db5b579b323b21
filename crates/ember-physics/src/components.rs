//! Components owned by the physics engine

use ember_core::Color;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::{MAX_MASS, MIN_MASS};

/// Rigid body state for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsObject {
    pub velocity: Vec3,
    /// Component-wise bound on |velocity|
    pub terminal_velocity: Vec3,
    /// Single-step force accumulator, zeroed after every sub-step
    pub force: Vec3,
    pub mass: f32,
}

impl Default for PhysicsObject {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            terminal_velocity: Vec3::splat(100.0),
            force: Vec3::ZERO,
            mass: 1.0,
        }
    }
}

impl PhysicsObject {
    pub fn with_mass(mass: f32) -> Self {
        Self {
            mass: mass.clamp(MIN_MASS, MAX_MASS),
            ..Default::default()
        }
    }

    /// Add a force to this sub-step's accumulator
    pub fn add_force(&mut self, force: Vec3) {
        self.force += force;
    }
}

/// Collision shape. The set is closed, so every pair of shapes has a
/// narrow-phase routine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColliderShape {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
}

impl ColliderShape {
    /// Radius of a sphere enclosing the shape, for broad-phase rejection
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            ColliderShape::Sphere { radius } => radius,
            ColliderShape::Box { half_extents } => half_extents.length(),
        }
    }
}

/// Collision volume attached to an entity's Transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub shape: ColliderShape,
    /// Displacement from the Transform position
    pub offset: Vec3,
    /// Detected against but never corrected
    pub immovable: bool,
}

impl Collider {
    pub fn sphere(radius: f32) -> Self {
        Self {
            shape: ColliderShape::Sphere { radius },
            offset: Vec3::ZERO,
            immovable: false,
        }
    }

    pub fn cuboid(half_extents: Vec3) -> Self {
        Self {
            shape: ColliderShape::Box { half_extents },
            offset: Vec3::ZERO,
            immovable: false,
        }
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn immovable(mut self) -> Self {
        self.immovable = true;
        self
    }

    /// World-space centre of the shape for a body at `position`
    pub fn center(&self, position: Vec3) -> Vec3 {
        position + self.offset
    }
}

/// Collision visualisation colour, rewritten every collision pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebugColor(pub Color);

impl DebugColor {
    pub const IDLE: Color = Color::GREEN;
    pub const COLLIDING: Color = Color::RED;

    pub fn is_colliding(&self) -> bool {
        self.0 == Self::COLLIDING
    }
}

impl Default for DebugColor {
    fn default() -> Self {
        Self(Self::IDLE)
    }
}

/// Render-space position blended between the last two sub-steps.
///
/// Written after the fixed-step loop for movable bodies; the simulated
/// Transform is left untouched so the next frame resumes from real state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Interpolated {
    pub position: Vec3,
}
