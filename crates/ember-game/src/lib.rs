//! Ember Game - gameplay on top of the engine core
//!
//! Provides gameplay components, the projectile collision hooks, controller,
//! AI, animation, camera and render-extraction systems, scene factories,
//! engine configuration, and the frame driver that ties them together.

pub mod animation;
pub mod camera;
pub mod components;
pub mod config;
pub mod engine;
pub mod factories;
pub mod hooks;
pub mod input;
pub mod render;
pub mod systems;

pub use animation::animation_system;
pub use camera::{camera_system, Camera};
pub use components::{
    Animation, AnimationBlendState, AnimationChannels, Hitpoints, Light, Model, Name,
    PlayerControl, Projectile, ProjectileSpec, ShooterAi, Timer,
};
pub use config::{ConfigError, EcsConfig, EngineConfig, GameplayConfig};
pub use engine::{gameplay_stage, Engine};
pub use hooks::GameplayHooks;
pub use input::{InputAction, InputState};
pub use render::{render_system, DrawCommand, LightData, RenderBackend, RenderFrame};
pub use systems::{
    cleanup_system, find_named, health_system, player_control_system, projectile_system,
    shooter_ai_system,
};
