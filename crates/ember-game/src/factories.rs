//! Scene composition helpers
//!
//! Each factory spawns one entity with a consistent component set: anything
//! with a Collider also gets a Transform and a DebugColor.

use ember_core::{Color, Transform};
use ember_ecs::{Entity, World};
use ember_physics::{Collider, DebugColor, PhysicsObject};
use glam::Vec3;
use rand::Rng;

use crate::camera::Camera;
use crate::components::{
    Animation, AnimationBlendState, AnimationChannels, Hitpoints, Light, Model, Name,
    PlayerControl, Projectile, ProjectileSpec, ShooterAi, Timer,
};

pub const PLAYER_NAME: &str = "player";
pub const OPHANIM_NAME: &str = "ophanim";

/// Static ground slab.
pub fn spawn_floor(world: &mut World, position: Vec3, half_extents: Vec3) -> Entity {
    let e = world.spawn();
    world.insert(e, Transform::from_position_scale(position, half_extents * 2.0));
    world.insert(e, Collider::cuboid(half_extents).immovable());
    world.insert(e, DebugColor::default());
    world.insert(e, Model::new("cube").with_tint(Color::from_hex(0x5a5a66)));
    world.insert(e, Name::new("floor"));
    e
}

/// Dynamic sphere with mass proportional to its volume.
pub fn spawn_ball(world: &mut World, position: Vec3, radius: f32) -> Entity {
    let e = world.spawn();
    world.insert(
        e,
        Transform::from_position_scale(position, Vec3::splat(radius * 2.0)),
    );
    world.insert(e, PhysicsObject::with_mass(radius * radius * radius));
    world.insert(e, Collider::sphere(radius));
    world.insert(e, DebugColor::default());
    world.insert(e, Model::new("sphere"));
    e
}

/// Projectile travelling along `direction` at the projectile's speed.
pub fn spawn_bullet(
    world: &mut World,
    origin: Vec3,
    direction: Vec3,
    projectile: &ProjectileSpec,
) -> Entity {
    let direction = direction.normalize_or_zero();
    let e = world.spawn();
    world.insert(
        e,
        Transform::from_position_scale(
            origin + direction * projectile.muzzle_distance,
            Vec3::splat(projectile.radius * 2.0),
        ),
    );
    world.insert(
        e,
        PhysicsObject {
            velocity: direction * projectile.speed,
            terminal_velocity: Vec3::splat(projectile.speed.abs().max(1.0)),
            ..PhysicsObject::with_mass(projectile.mass)
        },
    );
    world.insert(e, Collider::sphere(projectile.radius));
    world.insert(e, DebugColor::default());
    world.insert(
        e,
        Projectile::new(projectile.damage, projectile.time_to_live, projectile.explosion_duration),
    );
    world.insert(e, Model::new("bullet").with_tint(Color::from_hex(0xffcc33)));
    e
}

/// Input-controlled character.
pub fn spawn_player(world: &mut World, position: Vec3) -> Entity {
    let e = world.spawn();
    world.insert(e, Transform::from_position(position));
    world.insert(
        e,
        PhysicsObject {
            terminal_velocity: Vec3::new(20.0, 60.0, 20.0),
            ..PhysicsObject::with_mass(1.0)
        },
    );
    world.insert(e, Collider::sphere(1.0));
    world.insert(e, DebugColor::default());
    world.insert(e, Hitpoints(100.0));
    world.insert(e, Name::new(PLAYER_NAME));
    world.insert(e, PlayerControl::default());
    // Start with the cooldown elapsed so the first shot is immediate.
    world.insert(
        e,
        Timer {
            elapsed: PlayerControl::default().fire_cooldown,
        },
    );
    world.insert(e, Model::new("player"));
    e
}

/// Hovering turret enemy that bobs in place and fires at `target`.
pub fn spawn_ophanim(world: &mut World, position: Vec3, target: &str) -> Entity {
    let bob = |dy: f32| Transform {
        position: position + Vec3::Y * dy,
        scale: Vec3::splat(2.0),
        ..Default::default()
    };
    // Facing belongs to the shooter AI.
    let animation = Animation {
        keyframes: vec![bob(0.0), bob(0.75), bob(0.0), bob(-0.75)],
        seconds_per_frame: 0.5,
        looping: true,
        channels: AnimationChannels {
            rotation: false,
            ..AnimationChannels::ALL
        },
    };

    let e = world.spawn();
    world.insert(e, animation.keyframes[0]);
    world.insert(e, AnimationBlendState::start(animation.keyframes.len(), true));
    world.insert(e, animation);
    world.insert(e, Collider::sphere(2.0).immovable());
    world.insert(e, DebugColor::default());
    world.insert(e, Hitpoints(50.0));
    world.insert(e, Name::new(OPHANIM_NAME));
    world.insert(e, ShooterAi::new(target));
    world.insert(e, Timer::default());
    world.insert(e, Model::new("ophanim").with_tint(Color::from_hex(0xe0c060)));
    e
}

pub fn spawn_camera(world: &mut World, target: Option<Entity>, aspect: f32) -> Entity {
    let e = world.spawn();
    world.insert(e, Transform::default());
    world.insert(
        e,
        Camera {
            target,
            aspect,
            ..Default::default()
        },
    );
    e
}

pub fn spawn_light(world: &mut World, position: Vec3, color: Color, intensity: f32) -> Entity {
    let e = world.spawn();
    world.insert(e, Transform::from_position(position));
    world.insert(
        e,
        Light {
            color,
            intensity,
            ..Default::default()
        },
    );
    e
}

/// Scatter `count` balls around `center` within `spread` on each horizontal
/// axis and `[0, spread]` above it.
pub fn spawn_ball_cluster<R: Rng>(
    world: &mut World,
    rng: &mut R,
    center: Vec3,
    count: usize,
    spread: f32,
    radius_range: (f32, f32),
) -> Vec<Entity> {
    let spread = spread.abs();
    let (lo, hi) = if radius_range.0 <= radius_range.1 {
        radius_range
    } else {
        (radius_range.1, radius_range.0)
    };

    (0..count)
        .map(|_| {
            let offset = Vec3::new(
                rng.gen_range(-spread..=spread),
                rng.gen_range(0.0..=spread),
                rng.gen_range(-spread..=spread),
            );
            let radius = rng.gen_range(lo..=hi);
            spawn_ball(world, center + offset, radius)
        })
        .collect()
}
