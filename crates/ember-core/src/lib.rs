//! Ember Core - Core types and utilities for the Ember engine
//!
//! This crate provides the foundational types used throughout the engine:
//! - Mathematical primitives (re-exported from glam)
//! - Transform component for entity positioning
//! - Frame clock and the fixed-step accumulator used by the simulation

pub mod time;
pub mod types;

pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use time::{GameTime, StepAccumulator, StepMode, TimeConfig};
pub use types::{Color, Transform};
