//! Projectile reactions inside the collision pass

use ember_ecs::{Entity, World};
use ember_physics::CollisionHooks;
use tracing::debug;

use crate::components::{Hitpoints, Name, Projectile};

/// Damage and destruction rules for projectiles.
///
/// Projectiles never collide with each other. Any projectile that touches
/// something stops flying. Touching an entity whose [`Name`] is listed as
/// damageable, in flight or mid-explosion, deals the damage and ends the
/// explosion, which leaves the shot spent.
#[derive(Debug, Clone, Default)]
pub struct GameplayHooks {
    damageable: Vec<String>,
}

impl GameplayHooks {
    pub fn new<I, S>(damageable: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            damageable: damageable.into_iter().map(Into::into).collect(),
        }
    }

    pub fn damageable(&self) -> &[String] {
        &self.damageable
    }

    fn is_damageable(&self, world: &World, entity: Entity) -> bool {
        world
            .get::<Name>(entity)
            .is_some_and(|name| self.damageable.iter().any(|d| d == name.as_str()))
    }

    fn projectile_hit(&self, world: &mut World, projectile: Entity, other: Entity) {
        let Some(shot) = world.get_mut::<Projectile>(projectile) else {
            return;
        };
        // A spent shot has already dealt its damage and waits for cleanup.
        if shot.is_spent() {
            return;
        }
        let damage = shot.damage;
        shot.time_to_live = 0.0;

        if !self.is_damageable(world, other) {
            return;
        }

        if let Some(hp) = world.get_mut::<Hitpoints>(other) {
            hp.apply_damage(damage);
            debug!(target_entity = %other, damage, remaining = hp.0, "projectile hit");
        }
        if let Some(shot) = world.get_mut::<Projectile>(projectile) {
            shot.explosion_duration = 0.0;
        }
    }
}

impl CollisionHooks for GameplayHooks {
    fn filter_pair(&mut self, world: &World, a: Entity, b: Entity) -> bool {
        !(world.has::<Projectile>(a) && world.has::<Projectile>(b))
    }

    fn on_contact(&mut self, world: &mut World, a: Entity, b: Entity) {
        self.projectile_hit(world, a, b);
        self.projectile_hit(world, b, a);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hooks() -> GameplayHooks {
        GameplayHooks::new(["player", "ophanim"])
    }

    #[test]
    fn projectiles_ignore_each_other() {
        let mut world = World::new();
        let a = world.spawn();
        let b = world.spawn();
        let wall = world.spawn();
        world.insert(a, Projectile::new(1.0, 1.0, 1.0));
        world.insert(b, Projectile::new(1.0, 1.0, 1.0));

        let mut hooks = hooks();
        assert!(!hooks.filter_pair(&world, a, b));
        assert!(hooks.filter_pair(&world, a, wall));
    }

    #[test]
    fn hit_on_damageable_target_deals_damage() {
        let mut world = World::new();
        let target = world.spawn();
        world.insert(target, Name::new("ophanim"));
        world.insert(target, Hitpoints(12.0));
        let shot = world.spawn();
        world.insert(shot, Projectile::new(5.0, 1.0, 0.5));

        hooks().on_contact(&mut world, target, shot);

        assert_eq!(world.get::<Hitpoints>(target).unwrap().0, 7.0);
        let p = world.get::<Projectile>(shot).unwrap();
        assert_eq!(p.time_to_live, 0.0);
        assert_eq!(p.explosion_duration, 0.0);
    }

    #[test]
    fn damage_never_goes_below_zero() {
        let mut world = World::new();
        let target = world.spawn();
        world.insert(target, Name::new("player"));
        world.insert(target, Hitpoints(3.0));
        let shot = world.spawn();
        world.insert(shot, Projectile::new(50.0, 1.0, 0.5));

        hooks().on_contact(&mut world, shot, target);
        assert_eq!(world.get::<Hitpoints>(target).unwrap().0, 0.0);
    }

    #[test]
    fn scenery_stops_projectile_without_damage() {
        let mut world = World::new();
        let floor = world.spawn();
        world.insert(floor, Name::new("floor"));
        world.insert(floor, Hitpoints(10.0));
        let shot = world.spawn();
        world.insert(shot, Projectile::new(5.0, 1.0, 0.5));

        hooks().on_contact(&mut world, floor, shot);

        assert_eq!(world.get::<Hitpoints>(floor).unwrap().0, 10.0);
        let p = world.get::<Projectile>(shot).unwrap();
        assert_eq!(p.time_to_live, 0.0);
        assert_eq!(p.explosion_duration, 0.5);
    }

    #[test]
    fn spent_projectile_deals_no_further_damage() {
        let mut world = World::new();
        let target = world.spawn();
        world.insert(target, Name::new("player"));
        world.insert(target, Hitpoints(20.0));
        let shot = world.spawn();
        world.insert(shot, Projectile::new(5.0, 1.0, 0.5));

        let mut hooks = hooks();
        hooks.on_contact(&mut world, shot, target);
        hooks.on_contact(&mut world, shot, target);
        assert_eq!(world.get::<Hitpoints>(target).unwrap().0, 15.0);
    }

    #[test]
    fn exploding_projectile_still_damages_target() {
        let mut world = World::new();
        let floor = world.spawn();
        world.insert(floor, Name::new("floor"));
        let target = world.spawn();
        world.insert(target, Name::new("player"));
        world.insert(target, Hitpoints(20.0));
        let shot = world.spawn();
        world.insert(shot, Projectile::new(5.0, 1.0, 0.3));

        let mut hooks = hooks();
        hooks.on_contact(&mut world, shot, floor);
        assert!(!world.get::<Projectile>(shot).unwrap().is_flying());

        hooks.on_contact(&mut world, target, shot);
        assert_eq!(world.get::<Hitpoints>(target).unwrap().0, 15.0);
        assert!(world.get::<Projectile>(shot).unwrap().is_spent());
    }
}
