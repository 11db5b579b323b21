//! Ember Physics - fixed-step rigid bodies and collision
//!
//! Semi-implicit Euler integration with gravity, mass-scaled deceleration and
//! terminal velocity, followed by pairwise sphere/box collision detection with
//! inelastic resolution. Gameplay reacts to contacts through [`CollisionHooks`].

pub mod collision;
pub mod components;
pub mod config;
pub mod hooks;
pub mod integrator;
pub mod response;
pub mod system;

pub use collision::{test_collision, Aabb, CollisionPoints};
pub use components::{Collider, ColliderShape, DebugColor, Interpolated, PhysicsObject};
pub use config::PhysicsConfig;
pub use hooks::{CollisionEvent, CollisionEvents, CollisionHooks, NoHooks};
pub use system::{integrate_bodies, resolve_collisions, update_physics, PhysicsSystem};
