//! Per-frame gameplay systems
//!
//! Registration order matters: controllers accumulate forces before physics,
//! projectile and health bookkeeping reads collision outcomes after it, and
//! cleanup runs last.

use ember_core::Transform;
use ember_ecs::{Entity, World};
use ember_physics::PhysicsObject;
use glam::Vec3;
use tracing::{debug, info};

use crate::components::{
    yaw_toward, Hitpoints, Name, PlayerControl, Projectile, ProjectileSpec, ShooterAi, Timer,
};
use crate::factories::{spawn_bullet, PLAYER_NAME};
use crate::input::{InputAction, InputState};

struct Shot {
    origin: Vec3,
    direction: Vec3,
    projectile: ProjectileSpec,
}

fn fire(world: &mut World, shots: Vec<Shot>) {
    for shot in shots {
        spawn_bullet(world, shot.origin, shot.direction, &shot.projectile);
    }
}

/// Turn input into forces on player-controlled bodies and fire on demand.
pub fn player_control_system(world: &mut World, dt: f32) {
    let Some(input) = world.resource::<InputState>() else {
        return;
    };
    let axis = input.movement_axis();
    let jump = input.is_just_pressed(InputAction::Jump);
    let firing = input.is_held(InputAction::Fire);
    let turn = if input.cursor_captured {
        input.mouse_delta.x
    } else {
        0.0
    };

    let mut shots = Vec::new();
    for (_, (control, body, transform, timer)) in world.query_mut::<(
        &PlayerControl,
        &mut PhysicsObject,
        &mut Transform,
        Option<&mut Timer>,
    )>() {
        transform.rotation.y -= turn * control.turn_rate;

        let forward = flatten(transform.forward());
        let right = flatten(transform.right());
        let wish = (right * axis.x + forward * axis.y).normalize_or_zero();
        body.add_force(wish * control.move_force);
        if jump {
            body.add_force(Vec3::Y * control.jump_force);
        }

        if let Some(timer) = timer {
            timer.tick(dt);
            if firing && timer.has_elapsed(control.fire_cooldown) {
                timer.reset();
                shots.push(Shot {
                    origin: transform.position,
                    direction: transform.forward(),
                    projectile: control.projectile,
                });
            }
        }
    }
    fire(world, shots);
}

fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z).normalize_or_zero()
}

/// Cooldown-driven turrets: face the named target and fire when ready.
pub fn shooter_ai_system(world: &mut World, dt: f32) {
    let mut shots = Vec::new();
    for entity in world.entities_with::<ShooterAi>() {
        let Some(origin) = world.get::<Transform>(entity).map(|t| t.position) else {
            continue;
        };
        let Some(ai) = world.get_mut::<ShooterAi>(entity) else {
            continue;
        };
        ai.reload.tick(dt);
        let ready = ai.reload.has_elapsed(ai.cooldown);
        let target = ai.target.clone();
        let projectile = ai.projectile;

        let Some(target_pos) = find_named(world, &target)
            .and_then(|t| world.get::<Transform>(t))
            .map(|t| t.position)
        else {
            continue;
        };
        let direction = (target_pos - origin).normalize_or_zero();
        if direction == Vec3::ZERO {
            continue;
        }

        if let Some(transform) = world.get_mut::<Transform>(entity) {
            transform.rotation.y = yaw_toward(direction);
        }

        if ready {
            if let Some(ai) = world.get_mut::<ShooterAi>(entity) {
                ai.reload.reset();
            }
            shots.push(Shot {
                origin,
                direction,
                projectile,
            });
        }
    }
    fire(world, shots);
}

/// Lowest-id alive entity whose Name equals `name`.
pub fn find_named(world: &World, name: &str) -> Option<Entity> {
    world
        .query::<(&Name,)>()
        .find(|(_, (n,))| n.as_str() == name)
        .map(|(e, _)| e)
}

/// Count down flight, then explosion, then queue the projectile for removal.
pub fn projectile_system(world: &mut World, dt: f32) {
    let mut spent = Vec::new();
    for (entity, (projectile,)) in world.query_mut::<(&mut Projectile,)>() {
        if projectile.time_to_live > 0.0 {
            projectile.time_to_live -= dt;
        } else if projectile.explosion_duration > 0.0 {
            projectile.explosion_duration -= dt;
        }
        if projectile.is_spent() {
            spent.push(entity);
        }
    }
    for entity in spent {
        if !world.is_marked_for_deletion(entity) {
            world.mark_for_deletion(entity);
        }
    }
}

/// Queue entities whose hitpoints ran out. The player is never removed.
pub fn health_system(world: &mut World, _dt: f32) {
    let mut dead = Vec::new();
    for (entity, (hp, name)) in world.query::<(&Hitpoints, Option<&Name>)>() {
        if !hp.is_depleted() || world.is_marked_for_deletion(entity) {
            continue;
        }
        if name.is_some_and(|n| n.as_str() == PLAYER_NAME) {
            debug!(entity = %entity, "player has no hitpoints left");
            continue;
        }
        dead.push((entity, name.map(|n| n.0.clone())));
    }
    for (entity, name) in dead {
        info!(entity = %entity, name = ?name, "destroyed");
        world.mark_for_deletion(entity);
    }
}

/// Erase everything queued during this frame.
pub fn cleanup_system(world: &mut World, _dt: f32) {
    world.drain_deletions();
}
