//! Orbit camera with mouse look and zoom

use ember_core::Transform;
use ember_ecs::{Entity, World};
use ember_physics::Interpolated;
use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::input::InputState;

/// Pitch limit in degrees, either side of the horizon
pub const MAX_PITCH: f32 = 89.0;

/// Camera component. Orbits its follow target, or looks along its own yaw
/// and pitch when it has none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Entity to follow
    #[serde(skip)]
    pub target: Option<Entity>,
    /// Horizontal rotation in degrees
    pub yaw: f32,
    /// Vertical rotation in degrees, clamped to [-MAX_PITCH, MAX_PITCH]
    pub pitch: f32,
    /// Orbit distance from the target
    pub zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Degrees per unit of mouse motion
    pub sensitivity: f32,
    /// Zoom distance per scroll unit
    pub zoom_speed: f32,
    /// Height of the look-at point above the target's origin
    pub focus_height: f32,
    #[serde(skip)]
    pub position: Vec3,
    #[serde(skip)]
    pub view: Mat4,
    #[serde(skip)]
    pub projection: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            target: None,
            yaw: 0.0,
            pitch: -15.0,
            zoom: 12.0,
            min_zoom: 2.0,
            max_zoom: 40.0,
            fov: 70.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            sensitivity: 0.15,
            zoom_speed: 2.0,
            focus_height: 1.0,
            position: Vec3::ZERO,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }
}

impl Camera {
    pub fn following(target: Entity) -> Self {
        Self {
            target: Some(target),
            ..Default::default()
        }
    }

    /// Direction the camera looks in
    pub fn forward(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(
            -yaw.sin() * pitch.cos(),
            pitch.sin(),
            -yaw.cos() * pitch.cos(),
        )
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(-MAX_PITCH, MAX_PITCH);
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Handle mouse look input
    pub fn handle_mouse_look(&mut self, mouse_delta: Vec2) {
        self.yaw -= mouse_delta.x * self.sensitivity;
        self.set_pitch(self.pitch - mouse_delta.y * self.sensitivity);
    }

    /// Handle scroll wheel zoom
    pub fn handle_zoom(&mut self, scroll_delta: f32) {
        self.set_zoom(self.zoom - scroll_delta * self.zoom_speed);
    }

    /// Recompute position and matrices. `focus` is the followed point, or
    /// `None` to look from `eye` along the camera's own orientation.
    pub fn update(&mut self, eye: Vec3, focus: Option<Vec3>) {
        self.set_pitch(self.pitch);
        self.set_zoom(self.zoom);

        let look_at = match focus {
            Some(point) => {
                let point = point + Vec3::Y * self.focus_height;
                self.position = point - self.forward() * self.zoom;
                point
            }
            None => {
                self.position = eye;
                eye + self.forward()
            }
        };

        self.view = Mat4::look_at_rh(self.position, look_at, Vec3::Y);
        self.projection =
            Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// Render-space position of an entity: the interpolated position when
/// physics produced one, otherwise the Transform.
pub fn render_position(world: &World, entity: Entity) -> Option<Vec3> {
    world
        .get::<Interpolated>(entity)
        .map(|i| i.position)
        .or_else(|| world.get::<Transform>(entity).map(|t| t.position))
}

/// Apply look/zoom input, follow targets, and refresh view/projection.
pub fn camera_system(world: &mut World, _dt: f32) {
    let (look, scroll) = world
        .resource::<InputState>()
        .map(|input| {
            let look = if input.cursor_captured {
                input.mouse_delta
            } else {
                Vec2::ZERO
            };
            (look, input.scroll_delta)
        })
        .unwrap_or((Vec2::ZERO, 0.0));

    for entity in world.entities_with::<Camera>() {
        let eye = world
            .get::<Transform>(entity)
            .map_or(Vec3::ZERO, |t| t.position);
        let focus = world
            .get::<Camera>(entity)
            .and_then(|c| c.target)
            .and_then(|target| render_position(world, target));

        let Some(camera) = world.get_mut::<Camera>(entity) else {
            continue;
        };
        if look != Vec2::ZERO {
            camera.handle_mouse_look(look);
        }
        if scroll != 0.0 {
            camera.handle_zoom(scroll);
        }
        camera.update(eye, focus);
        let position = camera.position;

        if let Some(transform) = world.get_mut::<Transform>(entity) {
            transform.position = position;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_pitch_clamping() {
        let mut camera = Camera::default();
        camera.set_pitch(100.0);
        assert_eq!(camera.pitch, MAX_PITCH);
        camera.set_pitch(-100.0);
        assert_eq!(camera.pitch, -MAX_PITCH);

        camera.handle_mouse_look(Vec2::new(0.0, 10_000.0));
        assert_eq!(camera.pitch, -MAX_PITCH);
    }

    #[test]
    fn test_camera_zoom_clamping() {
        let mut camera = Camera::default();
        camera.handle_zoom(1000.0);
        assert_eq!(camera.zoom, camera.min_zoom);
        camera.handle_zoom(-1000.0);
        assert_eq!(camera.zoom, camera.max_zoom);
    }

    #[test]
    fn test_orbit_keeps_distance() {
        let mut camera = Camera {
            focus_height: 0.0,
            ..Default::default()
        };
        camera.set_zoom(10.0);
        let focus = Vec3::new(3.0, 0.0, -4.0);
        camera.update(Vec3::ZERO, Some(focus));
        assert!((camera.position.distance(focus) - 10.0).abs() < 1e-3);

        // The focus point projects to the centre of the screen.
        let clip = camera.view_projection() * focus.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
    }

    #[test]
    fn test_camera_system_follows_interpolated_position() {
        let mut world = World::new();
        let target = world.spawn();
        world.insert(target, Transform::from_position(Vec3::new(100.0, 0.0, 0.0)));
        world.insert(
            target,
            Interpolated {
                position: Vec3::new(5.0, 0.0, 0.0),
            },
        );
        let cam = world.spawn();
        world.insert(cam, Transform::default());
        world.insert(
            cam,
            Camera {
                focus_height: 0.0,
                ..Camera::following(target)
            },
        );

        camera_system(&mut world, 0.016);

        let camera = world.get::<Camera>(cam).unwrap();
        let distance = camera.position.distance(Vec3::new(5.0, 0.0, 0.0));
        assert!((distance - camera.zoom).abs() < 1e-3);
        assert_eq!(world.get::<Transform>(cam).unwrap().position, camera.position);
    }
}
