//! Fixed-step physics driver: integration, collision resolution, interpolation

use ember_core::{StepAccumulator, Transform};
use ember_ecs::{Entity, System, World};
use glam::Vec3;
use tracing::{trace, warn};

use crate::collision::{bounds_overlap, test_collision};
use crate::components::{Collider, DebugColor, Interpolated, PhysicsObject};
use crate::config::PhysicsConfig;
use crate::hooks::{CollisionEvent, CollisionEvents, CollisionHooks, NoHooks};
use crate::integrator::integrate_body;
use crate::response::{cancel_normal_velocity, contact_normal, displacement_shares};

/// One simulation sub-step: integrate every body, then resolve every contact.
pub fn update_physics<H: CollisionHooks + ?Sized>(
    world: &mut World,
    config: &PhysicsConfig,
    hooks: &mut H,
    dt: f32,
) {
    integrate_bodies(world, config, dt);
    resolve_collisions(world, config, hooks);
}

/// Integrate all bodies that have both a `PhysicsObject` and a `Transform`.
pub fn integrate_bodies(world: &mut World, config: &PhysicsConfig, dt: f32) {
    for (_, (body, transform, collider)) in
        world.query_mut::<(&mut PhysicsObject, &mut Transform, Option<&Collider>)>()
    {
        let immovable = collider.is_some_and(|c| c.immovable);
        integrate_body(body, &mut transform.position, immovable, config, dt);
    }
}

/// Test every unordered collider pair once, in ascending id order, and
/// separate the ones that overlap.
pub fn resolve_collisions<H: CollisionHooks + ?Sized>(
    world: &mut World,
    config: &PhysicsConfig,
    hooks: &mut H,
) {
    let colliders: Vec<Entity> = world
        .entities_with::<Collider>()
        .into_iter()
        .filter(|&e| world.has::<Transform>(e))
        .collect();

    for &entity in &colliders {
        if let Some(color) = world.get_mut::<DebugColor>(entity) {
            *color = DebugColor::default();
        }
    }

    for (i, &a) in colliders.iter().enumerate() {
        for &b in &colliders[i + 1..] {
            if !hooks.filter_pair(world, a, b) {
                continue;
            }

            // Earlier contacts may have moved either body; always read fresh.
            let (Some((collider_a, pos_a)), Some((collider_b, pos_b))) =
                (placed_collider(world, a), placed_collider(world, b))
            else {
                continue;
            };

            if !bounds_overlap(
                &collider_a,
                collider_a.center(pos_a),
                &collider_b,
                collider_b.center(pos_b),
            ) {
                continue;
            }

            let points = test_collision(&collider_a, pos_a, &collider_b, pos_b, config);
            if !points.has_collision {
                continue;
            }

            for entity in [a, b] {
                if let Some(color) = world.get_mut::<DebugColor>(entity) {
                    color.0 = DebugColor::COLLIDING;
                }
            }

            hooks.on_contact(world, a, b);

            let Some((normal, depth)) = contact_normal(&points) else {
                continue;
            };
            trace!(a = %a, b = %b, depth, "contact");

            let (share_a, share_b) =
                displacement_shares(depth, collider_a.immovable, collider_b.immovable);
            if !collider_a.immovable {
                separate(world, a, -normal, share_a);
            }
            if !collider_b.immovable {
                separate(world, b, normal, share_b);
            }

            world
                .resource_or_insert_with(CollisionEvents::default)
                .events
                .push(CollisionEvent {
                    a,
                    b,
                    normal,
                    depth,
                });
        }
    }
}

fn placed_collider(world: &World, entity: Entity) -> Option<(Collider, Vec3)> {
    let collider = *world.get::<Collider>(entity)?;
    let position = world.get::<Transform>(entity)?.position;
    Some((collider, position))
}

/// Push one body `distance` along `direction` and drop its velocity along
/// the contact normal.
fn separate(world: &mut World, entity: Entity, direction: Vec3, distance: f32) {
    if let Some(body) = world.get_mut::<PhysicsObject>(entity) {
        body.velocity = cancel_normal_velocity(body.velocity, direction);
    }
    if let Some(transform) = world.get_mut::<Transform>(entity) {
        transform.position += direction * distance;
    }
}

/// Runs the physics engine as a scheduled system.
///
/// Each frame the clamped delta is fed into a [`StepAccumulator`], whole
/// sub-steps are simulated, and movable bodies receive an [`Interpolated`]
/// position blended by the leftover fraction of a step.
pub struct PhysicsSystem<H = NoHooks> {
    config: PhysicsConfig,
    accumulator: StepAccumulator,
    hooks: H,
    /// Movable body positions before the most recent sub-step, sorted by id
    previous: Vec<(Entity, Vec3)>,
}

impl PhysicsSystem<NoHooks> {
    pub fn new(config: PhysicsConfig) -> Self {
        Self::with_hooks(config, NoHooks)
    }
}

impl<H: CollisionHooks> PhysicsSystem<H> {
    pub fn with_hooks(config: PhysicsConfig, hooks: H) -> Self {
        let accumulator =
            StepAccumulator::new(config.step_mode, config.max_frame_dt, config.max_substeps);
        Self {
            config,
            accumulator,
            hooks,
            previous: Vec::new(),
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    pub fn accumulator(&self) -> &StepAccumulator {
        &self.accumulator
    }

    /// Advance the simulation by one frame. Returns the number of sub-steps run.
    pub fn advance(&mut self, world: &mut World, frame_dt: f32) -> u32 {
        world.resource_or_insert_with(CollisionEvents::default).clear();

        let clamped = self.accumulator.begin_frame(frame_dt);
        while let Some(step) = self.accumulator.next_step() {
            self.snapshot(world);
            update_physics(world, &self.config, &mut self.hooks, step);
        }

        let steps = self.accumulator.steps_taken();
        let dropped = self.accumulator.drop_excess();
        if dropped > 0.0 {
            warn!(
                dropped_seconds = dropped,
                substeps = steps,
                "physics fell behind, dropping simulated time"
            );
        }

        if steps == 0 {
            // An id erased and reissued since the last snapshot has no
            // Interpolated yet; its old position belongs to another body.
            self.previous.retain(|&(entity, _)| world.has::<Interpolated>(entity));
        }

        self.write_interpolation(world);
        trace!(
            frame_dt = clamped,
            substeps = steps,
            alpha = self.accumulator.alpha(),
            "physics frame"
        );
        steps
    }

    fn snapshot(&mut self, world: &World) {
        self.previous.clear();
        for (entity, (_, transform, collider)) in
            world.query::<(&PhysicsObject, &Transform, Option<&Collider>)>()
        {
            if !collider.is_some_and(|c| c.immovable) {
                self.previous.push((entity, transform.position));
            }
        }
    }

    fn write_interpolation(&self, world: &mut World) {
        let alpha = self.accumulator.alpha();
        let mut blended = Vec::new();
        for (entity, (_, transform, collider)) in
            world.query::<(&PhysicsObject, &Transform, Option<&Collider>)>()
        {
            if collider.is_some_and(|c| c.immovable) {
                continue;
            }
            let current = transform.position;
            let position = match self.previous.binary_search_by_key(&entity, |&(e, _)| e) {
                Ok(index) => self.previous[index].1.lerp(current, alpha),
                Err(_) => current,
            };
            blended.push((entity, position));
        }
        for (entity, position) in blended {
            world.insert(entity, Interpolated { position });
        }
    }
}

impl<H: CollisionHooks> System for PhysicsSystem<H> {
    fn run(&mut self, world: &mut World, dt: f32) {
        self.advance(world, dt);
    }

    fn name(&self) -> &str {
        "physics"
    }
}
