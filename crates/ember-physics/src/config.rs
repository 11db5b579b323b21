//! Physics tuning constants and configuration

use ember_core::StepMode;
use serde::{Deserialize, Serialize};

/// Smallest mass used in force/acceleration maths
pub const MIN_MASS: f32 = 1e-4;
/// Largest mass used in force/acceleration maths
pub const MAX_MASS: f32 = 1e9;
/// Downward acceleration applied to movable bodies
pub const GRAVITY: f32 = 50.0;
/// Per-axis deceleration coefficient, divided by mass
pub const DECELERATION: f32 = 10.0;
/// Spheres closer than `ra + rb - SPHERE_CONTACT_TOLERANCE` collide
pub const SPHERE_CONTACT_TOLERANCE: f32 = 0.002;
/// Upper bound on the frame delta fed to the accumulator
pub const MAX_FRAME_DT: f32 = 0.1;

/// Physics world configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity magnitude on the -Y axis
    pub gravity: f32,
    /// Deceleration coefficient D in `v -= v * (D / mass) * dt`
    pub deceleration: f32,
    pub min_mass: f32,
    pub max_mass: f32,
    /// Tolerance subtracted from the radius sum in sphere-sphere tests
    pub sphere_tolerance: f32,
    /// Frame delta clamp (spiral-of-death guard)
    pub max_frame_dt: f32,
    /// Sub-step length policy
    pub step_mode: StepMode,
    /// Maximum sub-steps per frame; excess accumulated time is dropped
    pub max_substeps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            deceleration: DECELERATION,
            min_mass: MIN_MASS,
            max_mass: MAX_MASS,
            sphere_tolerance: SPHERE_CONTACT_TOLERANCE,
            max_frame_dt: MAX_FRAME_DT,
            step_mode: StepMode::default(),
            max_substeps: 8,
        }
    }
}

impl PhysicsConfig {
    /// Reproduces the engine's original timing, where each sub-step equals
    /// the clamped frame delta.
    pub fn frame_clamped() -> Self {
        Self {
            step_mode: StepMode::FrameClamped,
            ..Self::default()
        }
    }

    /// Clamp a mass into the configured range
    pub fn clamp_mass(&self, mass: f32) -> f32 {
        if mass.is_nan() {
            return self.min_mass;
        }
        mass.clamp(self.min_mass, self.max_mass)
    }
}
