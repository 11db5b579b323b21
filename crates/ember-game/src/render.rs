//! Render frame extraction
//!
//! The render system reads simulation state and produces a [`RenderFrame`]
//! resource. A [`RenderBackend`] consumes that frame; nothing here mutates
//! simulation components.

use ember_core::{Color, Transform};
use ember_ecs::{Entity, World};
use ember_physics::DebugColor;
use glam::{Mat4, Vec3};

use crate::camera::{render_position, Camera};
use crate::components::{Light, Model};

/// One mesh to draw
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub entity: Entity,
    pub mesh: String,
    pub model_matrix: Mat4,
    pub tint: Color,
    /// Collision visualisation colour, when the entity has a collider
    pub debug_color: Option<Color>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightData {
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
    pub radius: f32,
}

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub frame: u64,
    pub view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec3,
    pub draws: Vec<DrawCommand>,
    pub lights: Vec<LightData>,
}

impl Default for RenderFrame {
    fn default() -> Self {
        Self {
            frame: 0,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            camera_position: Vec3::ZERO,
            draws: Vec::new(),
            lights: Vec::new(),
        }
    }
}

/// Consumer of extracted frames (GPU renderer, recorder, headless logger).
pub trait RenderBackend {
    fn submit(&mut self, frame: &RenderFrame);
}

/// Build this frame's [`RenderFrame`] from the first camera, every visible
/// Model, and every Light.
pub fn render_system(world: &mut World, _dt: f32) {
    let frame_number = world.resource::<RenderFrame>().map_or(0, |f| f.frame + 1);
    let mut frame = RenderFrame {
        frame: frame_number,
        ..Default::default()
    };

    if let Some((_, (camera,))) = world.query::<(&Camera,)>().next() {
        frame.view = camera.view;
        frame.projection = camera.projection;
        frame.camera_position = camera.position;
    }

    for (entity, (model, transform)) in world.query::<(&Model, &Transform)>() {
        if !model.visible {
            continue;
        }
        let placed = Transform {
            position: render_position(world, entity).unwrap_or(transform.position),
            ..*transform
        };
        frame.draws.push(DrawCommand {
            entity,
            mesh: model.mesh.clone(),
            model_matrix: placed.matrix(),
            tint: model.tint,
            debug_color: world.get::<DebugColor>(entity).map(|c| c.0),
        });
    }

    for (_, (light, transform)) in world.query::<(&Light, &Transform)>() {
        frame.lights.push(LightData {
            position: transform.position,
            color: light.color,
            intensity: light.intensity,
            radius: light.radius,
        });
    }

    world.insert_resource(frame);
}
