//! Gameplay components

use ember_core::{Color, Transform};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A fired shot. Removed once both its flight time and its explosion have
/// run out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub damage: f32,
    /// Seconds of flight left
    pub time_to_live: f32,
    /// Seconds of explosion left once flight has ended
    pub explosion_duration: f32,
}

impl Projectile {
    pub fn new(damage: f32, time_to_live: f32, explosion_duration: f32) -> Self {
        Self {
            damage,
            time_to_live,
            explosion_duration,
        }
    }

    /// Still in flight
    pub fn is_flying(&self) -> bool {
        self.time_to_live > 0.0
    }

    /// Flight and explosion both finished
    pub fn is_spent(&self) -> bool {
        self.time_to_live <= 0.0 && self.explosion_duration <= 0.0
    }
}

/// Elapsed-time accumulator owned by one system per entity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Timer {
    pub elapsed: f32,
}

impl Timer {
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn has_elapsed(&self, seconds: f32) -> bool {
        self.elapsed >= seconds
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitpoints(pub f32);

impl Hitpoints {
    /// Subtract `damage`, never dropping below zero and never healing.
    pub fn apply_damage(&mut self, damage: f32) {
        let current = self.0.max(0.0);
        self.0 = (current - damage).clamp(0.0, current);
    }

    pub fn is_depleted(&self) -> bool {
        self.0 <= 0.0
    }
}

/// Gameplay tag matched by name equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Point light
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub color: Color,
    pub intensity: f32,
    pub radius: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
            radius: 20.0,
        }
    }
}

/// Drawable mesh reference. The mesh itself lives with the render backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub mesh: String,
    pub tint: Color,
    pub visible: bool,
}

impl Model {
    pub fn new(mesh: impl Into<String>) -> Self {
        Self {
            mesh: mesh.into(),
            tint: Color::WHITE,
            visible: true,
        }
    }

    pub fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }
}

/// Keyframed transform animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub keyframes: Vec<Transform>,
    pub seconds_per_frame: f32,
    pub looping: bool,
    /// Transform parts the animation drives; the rest stay with other systems
    #[serde(default)]
    pub channels: AnimationChannels,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationChannels {
    pub position: bool,
    pub rotation: bool,
    pub scale: bool,
}

impl AnimationChannels {
    pub const ALL: Self = Self {
        position: true,
        rotation: true,
        scale: true,
    };

    /// Copy the enabled parts of `pose` onto `transform`.
    pub fn apply(&self, pose: &Transform, transform: &mut Transform) {
        if self.position {
            transform.position = pose.position;
        }
        if self.rotation {
            transform.rotation = pose.rotation;
        }
        if self.scale {
            transform.scale = pose.scale;
        }
    }
}

impl Default for AnimationChannels {
    fn default() -> Self {
        Self::ALL
    }
}

/// Per-entity playback position within an [`Animation`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnimationBlendState {
    pub last: usize,
    pub current: usize,
    pub next: usize,
    /// Progress from `current` toward `next`, in `[0, 1]`
    pub blend: f32,
}

impl AnimationBlendState {
    /// Start at the first keyframe of an animation with `frames` keyframes.
    pub fn start(frames: usize, looping: bool) -> Self {
        Self {
            last: 0,
            current: 0,
            next: Self::following(0, frames, looping),
            blend: 0.0,
        }
    }

    /// Shift to the next keyframe pair.
    pub fn advance(&mut self, frames: usize, looping: bool) {
        self.last = self.current;
        self.current = self.next;
        self.next = Self::following(self.current, frames, looping);
        self.blend = 0.0;
    }

    fn following(index: usize, frames: usize, looping: bool) -> usize {
        if frames == 0 {
            return 0;
        }
        if looping {
            (index + 1) % frames
        } else {
            (index + 1).min(frames - 1)
        }
    }
}

/// Parameters of projectiles fired by a controller or AI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSpec {
    pub speed: f32,
    pub damage: f32,
    pub time_to_live: f32,
    pub explosion_duration: f32,
    pub radius: f32,
    pub mass: f32,
    /// Spawn distance ahead of the shooter, clear of its own collider
    pub muzzle_distance: f32,
}

impl Default for ProjectileSpec {
    fn default() -> Self {
        Self {
            speed: 60.0,
            damage: 10.0,
            time_to_live: 2.0,
            explosion_duration: 0.3,
            radius: 0.2,
            mass: 50.0,
            muzzle_distance: 2.0,
        }
    }
}

/// Input-driven movement and firing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerControl {
    /// Force applied while a movement key is held
    pub move_force: f32,
    /// One-step upward force on jump
    pub jump_force: f32,
    /// Degrees of yaw per unit of horizontal mouse motion
    pub turn_rate: f32,
    /// Minimum seconds between shots
    pub fire_cooldown: f32,
    pub projectile: ProjectileSpec,
}

impl Default for PlayerControl {
    fn default() -> Self {
        Self {
            move_force: 100.0,
            jump_force: 1500.0,
            turn_rate: 0.2,
            fire_cooldown: 0.25,
            projectile: ProjectileSpec::default(),
        }
    }
}

/// Turret-style AI that fires at the entity carrying a given [`Name`].
///
/// Carries its own reload timer so an entity's [`Timer`] stays free for
/// animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShooterAi {
    pub target: String,
    pub cooldown: f32,
    pub reload: Timer,
    pub projectile: ProjectileSpec,
}

impl ShooterAi {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            cooldown: 1.5,
            reload: Timer::default(),
            projectile: ProjectileSpec {
                speed: 30.0,
                damage: 5.0,
                muzzle_distance: 3.0,
                ..Default::default()
            },
        }
    }
}

/// Yaw in degrees that turns the default forward axis (-Z) toward `direction`.
pub fn yaw_toward(direction: Vec3) -> f32 {
    (-direction.x).atan2(-direction.z).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_clamps_at_zero() {
        let mut hp = Hitpoints(15.0);
        hp.apply_damage(10.0);
        assert_eq!(hp.0, 5.0);
        hp.apply_damage(10.0);
        assert_eq!(hp.0, 0.0);
        assert!(hp.is_depleted());
    }

    #[test]
    fn negative_damage_never_heals() {
        let mut hp = Hitpoints(20.0);
        hp.apply_damage(-50.0);
        assert_eq!(hp.0, 20.0);
    }

    #[test]
    fn projectile_spent_only_after_explosion() {
        let mut p = Projectile::new(1.0, 0.0, 0.5);
        assert!(!p.is_flying());
        assert!(!p.is_spent());
        p.explosion_duration = 0.0;
        assert!(p.is_spent());
    }

    #[test]
    fn blend_state_wraps_when_looping() {
        let mut state = AnimationBlendState::start(3, true);
        assert_eq!((state.current, state.next), (0, 1));
        state.advance(3, true);
        state.advance(3, true);
        assert_eq!((state.last, state.current, state.next), (1, 2, 0));
    }

    #[test]
    fn blend_state_holds_last_frame_otherwise() {
        let mut state = AnimationBlendState::start(2, false);
        state.advance(2, false);
        state.advance(2, false);
        assert_eq!((state.current, state.next), (1, 1));
    }

    #[test]
    fn yaw_matches_transform_forward() {
        let mut transform = Transform::default();
        transform.rotation.y = yaw_toward(Vec3::new(1.0, 0.0, 0.0));
        let forward = transform.forward();
        assert!((forward - Vec3::X).length() < 1e-4);
    }
}
