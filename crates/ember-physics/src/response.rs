//! Inelastic contact response: normal velocity cancellation and positional correction

use glam::Vec3;

use crate::collision::CollisionPoints;

/// Unit normal (A toward B) and penetration depth of a contact.
///
/// Returns `None` for a zero-length penetration, which carries no direction.
pub fn contact_normal(points: &CollisionPoints) -> Option<(Vec3, f32)> {
    let delta = points.penetration();
    let depth = delta.length();
    if depth <= f32::EPSILON || !depth.is_finite() {
        return None;
    }
    Some((delta / depth, depth))
}

/// Remove the component of `velocity` along `normal`. Not a bounce: the
/// body keeps only its tangential motion.
pub fn cancel_normal_velocity(velocity: Vec3, normal: Vec3) -> Vec3 {
    velocity - normal * velocity.dot(normal)
}

/// How far each side moves to separate. Movable pairs split the depth evenly;
/// against an immovable body the movable side takes all of it.
pub fn displacement_shares(depth: f32, a_immovable: bool, b_immovable: bool) -> (f32, f32) {
    match (a_immovable, b_immovable) {
        (false, false) => (depth * 0.5, depth * 0.5),
        (true, false) => (0.0, depth),
        (false, true) => (depth, 0.0),
        (true, true) => (0.0, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_points_from_a_to_b() {
        let points = CollisionPoints {
            point_a: Vec3::new(5.0, 0.0, 0.0),
            point_b: Vec3::new(4.0, 0.0, 0.0),
            has_collision: true,
        };
        let (normal, depth) = contact_normal(&points).unwrap();
        assert_eq!(normal, Vec3::X);
        assert_eq!(depth, 1.0);
    }

    #[test]
    fn zero_penetration_has_no_normal() {
        let points = CollisionPoints {
            point_a: Vec3::ONE,
            point_b: Vec3::ONE,
            has_collision: true,
        };
        assert!(contact_normal(&points).is_none());
    }

    #[test]
    fn only_normal_component_is_removed() {
        let v = cancel_normal_velocity(Vec3::new(3.0, -7.0, 2.0), Vec3::Y);
        assert_eq!(v, Vec3::new(3.0, 0.0, 2.0));
    }

    #[test]
    fn immovable_side_takes_no_share() {
        assert_eq!(displacement_shares(2.0, false, false), (1.0, 1.0));
        assert_eq!(displacement_shares(2.0, true, false), (0.0, 2.0));
        assert_eq!(displacement_shares(2.0, false, true), (2.0, 0.0));
        assert_eq!(displacement_shares(2.0, true, true), (0.0, 0.0));
    }
}
