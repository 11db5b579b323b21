use tracing::{debug, trace};

use crate::world::World;

/// A system that operates on the world once per frame.
pub trait System: Send + Sync {
    fn run(&mut self, world: &mut World, dt: f32);

    /// Name used in diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Blanket implementation so closures and plain functions can be used as systems.
impl<F: FnMut(&mut World, f32) + Send + Sync> System for F {
    fn run(&mut self, world: &mut World, dt: f32) {
        (self)(world, dt);
    }
}

/// An ordered list of systems to run each frame.
///
/// Registration order is execution order. There is no dependency inference,
/// reordering, or parallelism.
pub struct SystemSchedule {
    systems: Vec<Box<dyn System>>,
}

impl SystemSchedule {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
        }
    }

    /// Add a system to the end of the schedule.
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.systems.push(Box::new(system));
    }

    /// Builder form of [`add_system`](Self::add_system).
    pub fn with_system<S: System + 'static>(mut self, system: S) -> Self {
        self.add_system(system);
        self
    }

    /// Run all systems in order on the given world.
    pub fn run_all(&mut self, world: &mut World, dt: f32) {
        for system in &mut self.systems {
            trace!(system = system.name(), "run");
            system.run(world, dt);
        }
    }

    /// Names of the registered systems, in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

impl Default for SystemSchedule {
    fn default() -> Self {
        Self::new()
    }
}

/// A named schedule installed as a unit at a stage transition (menu, level,
/// game over). Systems are only added or removed by building a new stage.
pub struct Stage {
    name: String,
    schedule: SystemSchedule,
}

impl Stage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schedule: SystemSchedule::new(),
        }
    }

    pub fn with_system<S: System + 'static>(mut self, system: S) -> Self {
        self.schedule.add_system(system);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schedule(&self) -> &SystemSchedule {
        &self.schedule
    }

    /// Run one frame of this stage.
    pub fn run(&mut self, world: &mut World, dt: f32) {
        self.schedule.run_all(world, dt);
    }

    /// Log the stage layout; called by the owner when the stage is installed.
    pub fn announce(&self) {
        debug!(
            stage = %self.name,
            systems = ?self.schedule.names(),
            "stage installed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn closure_system() {
        let mut world = World::new();
        world.insert_resource(0.0f32);

        let mut system = |w: &mut World, dt: f32| {
            *w.resource_mut::<f32>().unwrap() += dt;
        };
        system.run(&mut world, 0.5);
        system.run(&mut world, 0.25);
        assert_eq!(*world.resource::<f32>().unwrap(), 0.75);
    }

    #[test]
    fn schedule_ordering() {
        let mut world = World::new();
        let log = Arc::new(Mutex::new(Vec::<u32>::new()));

        let mut schedule = SystemSchedule::new();
        let log1 = log.clone();
        schedule.add_system(move |_: &mut World, _: f32| log1.lock().unwrap().push(1));
        let log2 = log.clone();
        schedule.add_system(move |_: &mut World, _: f32| log2.lock().unwrap().push(2));
        let log3 = log.clone();
        schedule.add_system(move |_: &mut World, _: f32| log3.lock().unwrap().push(3));

        schedule.run_all(&mut world, 0.016);
        schedule.run_all(&mut world, 0.016);
        assert_eq!(*log.lock().unwrap(), vec![1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn writes_are_visible_to_later_systems() {
        let mut world = World::new();
        let e = world.spawn();
        world.insert(e, 0i32);

        let seen = Arc::new(Mutex::new(None));
        let seen_clone = seen.clone();
        let mut stage = Stage::new("level")
            .with_system(move |w: &mut World, _: f32| {
                *w.get_mut::<i32>(e).unwrap() = 7;
            })
            .with_system(move |w: &mut World, _: f32| {
                *seen_clone.lock().unwrap() = w.get::<i32>(e).copied();
            });

        stage.run(&mut world, 0.016);
        assert_eq!(*seen.lock().unwrap(), Some(7));
        assert_eq!(stage.name(), "level");
        assert_eq!(stage.schedule().len(), 2);
    }
}
