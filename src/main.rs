//! Ember - headless demo runner
//!
//! Builds a small arena, scripts a few seconds of player input, and runs the
//! gameplay stage without a window. Pass a config path as the first argument
//! to override `~/.config/ember/engine.toml`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use ember_core::Color;
use ember_ecs::World;
use ember_game::factories::{
    spawn_ball_cluster, spawn_camera, spawn_floor, spawn_light, spawn_ophanim, spawn_player,
    OPHANIM_NAME, PLAYER_NAME,
};
use ember_game::{
    find_named, gameplay_stage, Engine, EngineConfig, Hitpoints, InputAction, InputState,
    RenderBackend, RenderFrame,
};
use ember_physics::CollisionEvents;
use glam::Vec3;
use rand::Rng;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const FRAME_DT: f32 = 1.0 / 60.0;
const DEMO_FRAMES: u32 = 600;

/// Logs a summary of every Nth extracted frame.
struct FrameLog {
    every: u64,
}

impl RenderBackend for FrameLog {
    fn submit(&mut self, frame: &RenderFrame) {
        if frame.frame % self.every == 0 {
            info!(
                frame = frame.frame,
                draws = frame.draws.len(),
                lights = frame.lights.len(),
                camera = ?frame.camera_position,
                "render frame"
            );
        }
    }
}

fn load_config() -> Result<EngineConfig> {
    if let Some(path) = std::env::args().nth(1).map(PathBuf::from) {
        return EngineConfig::load_from(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }
    Ok(EngineConfig::load().unwrap_or_else(|e| {
        warn!("{}, using default engine config", e);
        EngineConfig::default()
    }))
}

fn compose_scene(world: &mut World, rng: &mut impl Rng) {
    spawn_floor(world, Vec3::ZERO, Vec3::new(40.0, 1.0, 40.0));
    let player = spawn_player(world, Vec3::new(0.0, 2.0, 10.0));
    spawn_ophanim(world, Vec3::new(0.0, 5.0, -15.0), PLAYER_NAME);
    spawn_camera(world, Some(player), 16.0 / 9.0);
    spawn_light(world, Vec3::new(0.0, 20.0, 0.0), Color::WHITE, 3.0);
    spawn_light(world, Vec3::new(-10.0, 8.0, -10.0), Color::from_hex(0xff8844), 1.5);
    let balls = spawn_ball_cluster(world, rng, Vec3::new(0.0, 4.0, 0.0), 24, 8.0, (0.4, 1.2));
    info!(entities = world.entity_count(), balls = balls.len(), "scene composed");
}

/// Scripted input: walk forward for two seconds, then hold fire.
fn drive_input(world: &mut World, frame: u32) {
    let Some(input) = world.resource_mut::<InputState>() else {
        return;
    };
    match frame {
        0 => input.press(InputAction::MoveForward),
        120 => {
            input.release(InputAction::MoveForward);
            input.press(InputAction::Fire);
        }
        150 => input.press(InputAction::Jump),
        151 => input.release(InputAction::Jump),
        480 => input.release(InputAction::Fire),
        _ => {}
    }
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Starting Ember headless demo...");

    let config = load_config()?;
    let mut engine = Engine::new(&config);
    compose_scene(engine.world_mut(), &mut rand::thread_rng());
    engine.set_stage(gameplay_stage(&config));
    engine.set_backend(Box::new(FrameLog { every: 60 }));

    for frame in 0..DEMO_FRAMES {
        drive_input(engine.world_mut(), frame);
        engine.frame(FRAME_DT);
    }

    let world = engine.world();
    let hitpoints = |name: &str| {
        find_named(world, name).and_then(|e| world.get::<Hitpoints>(e).map(|hp| hp.0))
    };
    info!(
        frames = engine.time().frame_count,
        simulated_seconds = engine.time().total_time,
        entities = world.entity_count(),
        contacts_last_frame = world.resource::<CollisionEvents>().map_or(0, |c| c.len()),
        player_hp = ?hitpoints(PLAYER_NAME),
        ophanim_hp = ?hitpoints(OPHANIM_NAME),
        "demo finished"
    );

    Ok(())
}
