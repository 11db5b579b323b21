//! Narrow-phase collision tests between sphere and axis-aligned box shapes
//!
//! Every test reports a pair of contact points. Response code treats
//! `point_a - point_b` as the penetration vector: body A is pushed along its
//! negation and body B along it.

use glam::Vec3;

use crate::components::{Collider, ColliderShape};
use crate::config::PhysicsConfig;

/// Result of a narrow-phase test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionPoints {
    /// Deepest point of B inside A, or for box pairs the penetration vector itself
    pub point_a: Vec3,
    /// Deepest point of A inside B, or zero for box pairs
    pub point_b: Vec3,
    pub has_collision: bool,
}

impl CollisionPoints {
    pub const NONE: CollisionPoints = CollisionPoints {
        point_a: Vec3::ZERO,
        point_b: Vec3::ZERO,
        has_collision: false,
    };

    fn hit(point_a: Vec3, point_b: Vec3) -> Self {
        Self {
            point_a,
            point_b,
            has_collision: true,
        }
    }

    /// Relabel the points for the reversed operand order.
    pub fn swapped(self) -> Self {
        Self {
            point_a: self.point_b,
            point_b: self.point_a,
            has_collision: self.has_collision,
        }
    }

    /// `point_a - point_b`
    pub fn penetration(&self) -> Vec3 {
        self.point_a - self.point_b
    }
}

/// Axis-aligned bounds of a box centred at `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Closest point inside the box to `point`
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    /// Per-axis overlap with another box; negative on separated axes
    pub fn overlap(&self, other: &Aabb) -> Vec3 {
        self.max.min(other.max) - self.min.max(other.min)
    }
}

/// Cheap bounding-sphere rejection. Never rejects a pair the narrow phase
/// would report as colliding.
pub fn bounds_overlap(a: &Collider, a_center: Vec3, b: &Collider, b_center: Vec3) -> bool {
    let reach = a.shape.bounding_radius() + b.shape.bounding_radius();
    a_center.distance_squared(b_center) <= reach * reach
}

/// Test two colliders whose bodies sit at `a_position` and `b_position`.
///
/// Sphere-box is answered by the box-sphere routine with the operands swapped,
/// then relabelled, so the result is always in the caller's order.
pub fn test_collision(
    a: &Collider,
    a_position: Vec3,
    b: &Collider,
    b_position: Vec3,
    config: &PhysicsConfig,
) -> CollisionPoints {
    let a_center = a.center(a_position);
    let b_center = b.center(b_position);

    match (a.shape, b.shape) {
        (ColliderShape::Box { half_extents }, ColliderShape::Sphere { radius }) => {
            box_sphere(a_center, half_extents, b_center, radius)
        }
        (ColliderShape::Sphere { radius }, ColliderShape::Box { half_extents }) => {
            box_sphere(b_center, half_extents, a_center, radius).swapped()
        }
        (ColliderShape::Sphere { radius: ra }, ColliderShape::Sphere { radius: rb }) => {
            sphere_sphere(a_center, ra, b_center, rb, config.sphere_tolerance)
        }
        (
            ColliderShape::Box { half_extents: ha },
            ColliderShape::Box { half_extents: hb },
        ) => box_box(a_center, ha, b_center, hb),
    }
}

/// Box (A) against sphere (B).
pub fn box_sphere(
    box_center: Vec3,
    half_extents: Vec3,
    sphere_center: Vec3,
    radius: f32,
) -> CollisionPoints {
    let bounds = Aabb::from_center(box_center, half_extents);
    let closest = bounds.closest_point(sphere_center);
    let to_box = closest - sphere_center;
    let distance = to_box.length();

    // A centre inside the box clamps onto itself; no usable normal.
    if distance <= f32::EPSILON || distance >= radius {
        return CollisionPoints::NONE;
    }

    let sphere_point = sphere_center + to_box / distance * radius;
    CollisionPoints::hit(closest, sphere_point)
}

/// Sphere (A) against sphere (B).
pub fn sphere_sphere(
    a_center: Vec3,
    a_radius: f32,
    b_center: Vec3,
    b_radius: f32,
    tolerance: f32,
) -> CollisionPoints {
    let between = b_center - a_center;
    let distance = between.length();

    if distance <= f32::EPSILON || distance >= a_radius + b_radius - tolerance {
        return CollisionPoints::NONE;
    }

    let direction = between / distance;
    CollisionPoints::hit(
        a_center + direction * a_radius,
        b_center - direction * b_radius,
    )
}

/// Box (A) against box (B), resolved along the axis of least penetration.
///
/// The signed penetration vector is returned in `point_a`; `point_b` is zero.
pub fn box_box(a_center: Vec3, a_half: Vec3, b_center: Vec3, b_half: Vec3) -> CollisionPoints {
    let a = Aabb::from_center(a_center, a_half);
    let b = Aabb::from_center(b_center, b_half);
    let overlap = a.overlap(&b);

    if overlap.min_element() < 0.0 {
        return CollisionPoints::NONE;
    }

    let axis = if overlap.x <= overlap.y && overlap.x <= overlap.z {
        0
    } else if overlap.y <= overlap.z {
        1
    } else {
        2
    };

    let sign = if a.min[axis] < b.min[axis] { 1.0 } else { -1.0 };
    let mut penetration = Vec3::ZERO;
    penetration[axis] = overlap[axis] * sign;

    CollisionPoints {
        point_a: penetration,
        point_b: Vec3::ZERO,
        has_collision: penetration.length_squared() > 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn spheres_overlapping_collide() {
        let config = PhysicsConfig::default();
        let s = Collider::sphere(5.0);
        let hit = test_collision(&s, Vec3::ZERO, &s, Vec3::new(9.0, 0.0, 0.0), &config);
        assert!(hit.has_collision);
        assert!(close(hit.point_a, Vec3::new(5.0, 0.0, 0.0)));
        assert!(close(hit.point_b, Vec3::new(4.0, 0.0, 0.0)));
        assert!((hit.penetration().length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn spheres_touching_do_not_collide() {
        let config = PhysicsConfig::default();
        let s = Collider::sphere(5.0);
        let miss = test_collision(&s, Vec3::ZERO, &s, Vec3::new(10.0, 0.0, 0.0), &config);
        assert!(!miss.has_collision);
    }

    #[test]
    fn sphere_tolerance_boundary() {
        let config = PhysicsConfig::default();
        let s = Collider::sphere(5.0);
        let boundary = 5.0 + 5.0 - config.sphere_tolerance;

        // Exactly at radius sum minus tolerance: the strict test fails.
        let at = test_collision(&s, Vec3::ZERO, &s, Vec3::new(boundary, 0.0, 0.0), &config);
        assert!(!at.has_collision);

        // Inside the tolerance band but not yet touching.
        let band = test_collision(&s, Vec3::ZERO, &s, Vec3::new(9.999, 0.0, 0.0), &config);
        assert!(!band.has_collision);

        let inside = test_collision(&s, Vec3::ZERO, &s, Vec3::new(9.99, 0.0, 0.0), &config);
        assert!(inside.has_collision);
    }

    #[test]
    fn sphere_sphere_is_symmetric() {
        let config = PhysicsConfig::default();
        let a = Collider::sphere(2.0);
        let b = Collider::sphere(3.0).with_offset(Vec3::new(0.0, 1.0, 0.0));
        let pa = Vec3::new(1.0, 2.0, 3.0);
        let pb = Vec3::new(2.5, 1.0, 4.0);

        let ab = test_collision(&a, pa, &b, pb, &config);
        let ba = test_collision(&b, pb, &a, pa, &config);
        assert!(ab.has_collision);
        assert_eq!(ab.has_collision, ba.has_collision);
        assert!(close(ab.point_a, ba.point_b));
        assert!(close(ab.point_b, ba.point_a));
    }

    #[test]
    fn coincident_spheres_are_ignored() {
        let hit = sphere_sphere(Vec3::ONE, 1.0, Vec3::ONE, 1.0, 0.002);
        assert!(!hit.has_collision);
    }

    #[test]
    fn box_sphere_contact_points() {
        let hit = box_sphere(
            Vec3::ZERO,
            Vec3::new(10.0, 1.0, 10.0),
            Vec3::new(0.0, 5.5, 0.0),
            5.0,
        );
        assert!(hit.has_collision);
        assert!(close(hit.point_a, Vec3::new(0.0, 1.0, 0.0)));
        assert!(close(hit.point_b, Vec3::new(0.0, 0.5, 0.0)));
        // Penetration points from the box toward the sphere.
        assert!(hit.penetration().y > 0.0);
    }

    #[test]
    fn box_sphere_miss_and_centre_inside() {
        let miss = box_sphere(Vec3::ZERO, Vec3::ONE, Vec3::new(0.0, 7.0, 0.0), 5.0);
        assert!(!miss.has_collision);

        let inside = box_sphere(Vec3::ZERO, Vec3::splat(2.0), Vec3::new(0.5, 0.5, 0.5), 1.0);
        assert!(!inside.has_collision);
    }

    #[test]
    fn sphere_box_is_relabelled() {
        let config = PhysicsConfig::default();
        let floor = Collider::cuboid(Vec3::new(10.0, 1.0, 10.0));
        let ball = Collider::sphere(5.0);
        let ball_pos = Vec3::new(0.0, 5.5, 0.0);

        let box_first = test_collision(&floor, Vec3::ZERO, &ball, ball_pos, &config);
        let sphere_first = test_collision(&ball, ball_pos, &floor, Vec3::ZERO, &config);
        assert!(sphere_first.has_collision);
        assert_eq!(sphere_first, box_first.swapped());
    }

    #[test]
    fn collider_offset_is_applied() {
        let config = PhysicsConfig::default();
        let a = Collider::sphere(1.0).with_offset(Vec3::new(5.0, 0.0, 0.0));
        let b = Collider::sphere(1.0);
        let hit = test_collision(&a, Vec3::ZERO, &b, Vec3::new(6.5, 0.0, 0.0), &config);
        assert!(hit.has_collision);
        let miss = test_collision(&b, Vec3::ZERO, &b, Vec3::new(6.5, 0.0, 0.0), &config);
        assert!(!miss.has_collision);
    }

    #[test]
    fn box_box_least_penetration_axis() {
        // Overlap is 0.5 on Y and 1.5 on X/Z: resolve along Y.
        let hit = box_box(
            Vec3::ZERO,
            Vec3::ONE,
            Vec3::new(0.5, 1.5, 0.5),
            Vec3::ONE,
        );
        assert!(hit.has_collision);
        assert!(close(hit.point_a, Vec3::new(0.0, 0.5, 0.0)));
        assert_eq!(hit.point_b, Vec3::ZERO);

        let reversed = box_box(
            Vec3::new(0.5, 1.5, 0.5),
            Vec3::ONE,
            Vec3::ZERO,
            Vec3::ONE,
        );
        assert!(close(reversed.point_a, Vec3::new(0.0, -0.5, 0.0)));
    }

    #[test]
    fn box_box_touching_and_separated() {
        let touching = box_box(Vec3::ZERO, Vec3::ONE, Vec3::new(2.0, 0.0, 0.0), Vec3::ONE);
        assert!(!touching.has_collision);

        let apart = box_box(Vec3::ZERO, Vec3::ONE, Vec3::new(3.0, 0.0, 0.0), Vec3::ONE);
        assert!(!apart.has_collision);
    }

    #[test]
    fn broad_phase_never_rejects_hits() {
        let config = PhysicsConfig::default();
        let cube = Collider::cuboid(Vec3::ONE);
        let ball = Collider::sphere(0.5);
        let pb = Vec3::new(1.2, 1.2, 1.2);
        let hit = test_collision(&cube, Vec3::ZERO, &ball, pb, &config);
        assert!(hit.has_collision);
        assert!(bounds_overlap(&cube, Vec3::ZERO, &ball, pb));

        assert!(!bounds_overlap(&ball, Vec3::ZERO, &ball, Vec3::new(5.0, 0.0, 0.0)));
    }
}
