//! Frame driver: clock, active stage, and render submission

use ember_core::GameTime;
use ember_ecs::{Stage, World};
use ember_physics::PhysicsSystem;
use tracing::info;

use crate::animation::animation_system;
use crate::camera::camera_system;
use crate::config::EngineConfig;
use crate::hooks::GameplayHooks;
use crate::input::{InputAction, InputState};
use crate::render::{render_system, RenderBackend, RenderFrame};
use crate::systems::{
    cleanup_system, health_system, player_control_system, projectile_system, shooter_ai_system,
};

/// The standard in-game schedule.
pub fn gameplay_stage(config: &EngineConfig) -> Stage {
    let hooks = GameplayHooks::new(config.gameplay.damageable.iter().cloned());
    Stage::new("gameplay")
        .with_system(player_control_system)
        .with_system(shooter_ai_system)
        .with_system(PhysicsSystem::with_hooks(config.physics.clone(), hooks))
        .with_system(projectile_system)
        .with_system(health_system)
        .with_system(animation_system)
        .with_system(camera_system)
        .with_system(render_system)
        .with_system(cleanup_system)
}

/// Owns the world and runs one stage per frame.
pub struct Engine {
    world: World,
    stage: Option<Stage>,
    time: GameTime,
    backend: Option<Box<dyn RenderBackend>>,
}

impl Engine {
    pub fn new(config: &EngineConfig) -> Self {
        let mut world = World::with_capacity(config.ecs.max_entities);
        world.insert_resource(InputState::new());
        info!(
            max_entities = config.ecs.max_entities,
            step_mode = ?config.physics.step_mode,
            "engine created"
        );
        Self {
            world,
            stage: None,
            time: GameTime::new(config.time.clone()),
            backend: None,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn time(&self) -> &GameTime {
        &self.time
    }

    pub fn time_mut(&mut self) -> &mut GameTime {
        &mut self.time
    }

    pub fn stage(&self) -> Option<&Stage> {
        self.stage.as_ref()
    }

    /// Replace the running schedule. Only call between frames.
    pub fn set_stage(&mut self, stage: Stage) -> Option<Stage> {
        stage.announce();
        info!(stage = stage.name(), "stage transition");
        self.stage.replace(stage)
    }

    pub fn set_backend(&mut self, backend: Box<dyn RenderBackend>) {
        self.backend = Some(backend);
    }

    /// Run one frame with the raw elapsed time since the previous one.
    /// Returns the delta handed to the systems.
    pub fn frame(&mut self, raw_dt: f32) -> f32 {
        if self
            .world
            .resource::<InputState>()
            .is_some_and(|input| input.is_just_pressed(InputAction::Pause))
        {
            self.time.toggle_pause();
            info!(paused = self.time.paused, "pause toggled");
        }

        self.time.update(raw_dt);
        let dt = self.time.delta_time;

        if let Some(stage) = self.stage.as_mut() {
            stage.run(&mut self.world, dt);
        }

        if let (Some(backend), Some(frame)) =
            (self.backend.as_mut(), self.world.resource::<RenderFrame>())
        {
            backend.submit(frame);
        }

        if let Some(input) = self.world.resource_mut::<InputState>() {
            input.clear_frame();
        }
        dt
    }

    /// Run `frames` frames of `dt` seconds each, for headless execution.
    pub fn run_frames(&mut self, frames: u32, dt: f32) {
        for _ in 0..frames {
            self.frame(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn gameplay_stage_order() {
        let stage = gameplay_stage(&EngineConfig::default());
        let names = stage.schedule().names();
        assert_eq!(names.len(), 9);
        assert!(names[0].ends_with("player_control_system"));
        assert!(names[1].ends_with("shooter_ai_system"));
        assert_eq!(names[2], "physics");
        assert!(names[8].ends_with("cleanup_system"));
    }

    #[test]
    fn set_stage_swaps_schedule() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let first_log = Arc::clone(&log);
        let second_log = Arc::clone(&log);

        let mut engine = Engine::new(&EngineConfig::default());
        engine.set_stage(Stage::new("first").with_system(move |_: &mut World, _: f32| {
            first_log.lock().unwrap().push("first");
        }));
        engine.frame(0.016);

        let previous =
            engine.set_stage(Stage::new("second").with_system(move |_: &mut World, _: f32| {
                second_log.lock().unwrap().push("second");
            }));
        engine.frame(0.016);

        assert_eq!(previous.map(|s| s.name().to_string()), Some("first".to_string()));
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn pause_freezes_delta() {
        let mut engine = Engine::new(&EngineConfig::default());
        engine
            .world_mut()
            .resource_mut::<InputState>()
            .unwrap()
            .press(InputAction::Pause);
        assert_eq!(engine.frame(0.016), 0.0);
        assert!(engine.time().paused);
        assert!(engine
            .world()
            .resource::<InputState>()
            .unwrap()
            .just_pressed
            .is_empty());
    }

    #[test]
    fn backend_sees_every_frame() {
        struct Counter(Arc<Mutex<u64>>);
        impl RenderBackend for Counter {
            fn submit(&mut self, frame: &RenderFrame) {
                *self.0.lock().unwrap() = frame.frame;
            }
        }

        let last = Arc::new(Mutex::new(0));
        let config = EngineConfig::default();
        let mut engine = Engine::new(&config);
        engine.set_stage(gameplay_stage(&config));
        engine.set_backend(Box::new(Counter(Arc::clone(&last))));
        engine.run_frames(5, 1.0 / 60.0);
        assert_eq!(*last.lock().unwrap(), 4);
    }
}
