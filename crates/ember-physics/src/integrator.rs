//! Semi-implicit Euler integration of forces, deceleration and velocity limits

use glam::Vec3;

use crate::components::PhysicsObject;
use crate::config::PhysicsConfig;

/// Decay one velocity component toward zero: `v - v * (D / mass) * dt`.
///
/// The decay factor is clamped to `[0, 1]`, so the result keeps the sign of
/// `velocity` or becomes zero; it never overshoots.
pub fn apply_deceleration(velocity: f32, deceleration: f32, mass: f32, dt: f32) -> f32 {
    let factor = (deceleration / mass * dt).clamp(0.0, 1.0);
    if factor.is_nan() {
        return velocity;
    }
    velocity * (1.0 - factor)
}

/// Component-wise clamp into `[-terminal, terminal]`.
pub fn clamp_velocity(velocity: Vec3, terminal: Vec3) -> Vec3 {
    let bound = terminal.abs();
    velocity.clamp(-bound, bound)
}

/// Advance one body by `dt`.
///
/// Mass is always clamped and the force accumulator always cleared; immovable
/// bodies are otherwise left exactly as they were.
pub fn integrate_body(
    body: &mut PhysicsObject,
    position: &mut Vec3,
    immovable: bool,
    config: &PhysicsConfig,
    dt: f32,
) {
    body.mass = config.clamp_mass(body.mass);

    if !immovable {
        body.force.y -= body.mass * config.gravity;
        body.velocity += body.force / body.mass * dt;

        let mass = body.mass;
        let d = config.deceleration;
        body.velocity = Vec3::new(
            apply_deceleration(body.velocity.x, d, mass, dt),
            apply_deceleration(body.velocity.y, d, mass, dt),
            apply_deceleration(body.velocity.z, d, mass, dt),
        );
        body.velocity = clamp_velocity(body.velocity, body.terminal_velocity);

        *position += body.velocity * dt;
    }

    body.force = Vec3::ZERO;
}
