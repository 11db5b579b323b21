//! Ember ECS - Entity Component System
//!
//! A custom ECS implementation for the Ember engine.
//! Entities are plain ids drawn from a bounded pool; each component kind lives
//! in its own id-indexed table. Systems run in registration order and destroy
//! entities only through the deferred deletion queue.

mod component;
mod entity;
mod error;
mod query;
mod resource;
mod system;
mod world;

pub use component::Component;
pub use entity::{Entity, EntityPool, DEFAULT_MAX_ENTITIES};
pub use error::EcsError;
pub use query::{Access, ReadOnlyQuery, WorldQuery};
pub use resource::Resources;
pub use system::{Stage, System, SystemSchedule};
pub use world::World;
