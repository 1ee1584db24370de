use bevy_math::{Vec2, Vec3};

use crate::constants::PHYSICS_EPSILON;

// Check if two 1D ranges overlap.
#[must_use]
pub fn ranges_overlap_1d(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> bool {
    a_max >= b_min && a_min <= b_max
}

// Compute the intersection interval of a ray with a slab (used in ray-AABB tests)
#[must_use]
pub fn sweep_slab_interval(
    local_coord: f32,
    ray_dir: f32,
    half_extent: f32,
    t_min: f32,
    t_max: f32,
) -> Option<(f32, f32)> {
    if ray_dir.abs() > PHYSICS_EPSILON {
        let t1 = (-half_extent - local_coord) / ray_dir;
        let t2 = (half_extent - local_coord) / ray_dir;
        let new_min = t_min.max(t1.min(t2));
        let new_max = t_max.min(t1.max(t2));
        (new_min <= new_max).then_some((new_min, new_max))
    } else if local_coord.abs() > half_extent {
        None
    } else {
        Some((t_min, t_max))
    }
}

// Ray vs axis-aligned box given by center and half extents. Returns the entry
// distance along `dir` (0 when the origin is inside), or None on a miss.
#[must_use]
pub fn ray_hits_box(origin: Vec3, dir: Vec3, center: Vec3, half_extents: Vec3, max_t: f32) -> Option<f32> {
    let local = origin - center;
    let (t_min, t_max) = sweep_slab_interval(local.x, dir.x, half_extents.x, 0.0, max_t)?;
    let (t_min, t_max) = sweep_slab_interval(local.y, dir.y, half_extents.y, t_min, t_max)?;
    let (t_min, _) = sweep_slab_interval(local.z, dir.z, half_extents.z, t_min, t_max)?;
    Some(t_min)
}

#[must_use]
pub fn point_in_box(point: Vec3, center: Vec3, half_extents: Vec3) -> bool {
    ranges_overlap_1d(point.x, point.x, center.x - half_extents.x, center.x + half_extents.x)
        && ranges_overlap_1d(point.y, point.y, center.y - half_extents.y, center.y + half_extents.y)
        && ranges_overlap_1d(point.z, point.z, center.z - half_extents.z, center.z + half_extents.z)
}

// Same as point_in_box but ignoring height
#[must_use]
pub fn point_in_box_xz(point: Vec3, center: Vec3, half_extents: Vec3) -> bool {
    ranges_overlap_1d(point.x, point.x, center.x - half_extents.x, center.x + half_extents.x)
        && ranges_overlap_1d(point.z, point.z, center.z - half_extents.z, center.z + half_extents.z)
}

#[must_use]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

// True if `target` lies within `max_angle_degrees` of the look direction, measured in the xz plane
#[must_use]
pub fn within_look_cone(eye: Vec3, look: Vec3, target: Vec3, max_angle_degrees: f32) -> bool {
    let Some(to_target) = Vec2::new(target.x - eye.x, target.z - eye.z).try_normalize() else {
        // Standing on top of it
        return true;
    };
    let Some(facing) = Vec2::new(look.x, look.z).try_normalize() else {
        return false;
    };
    facing.dot(to_target) >= max_angle_degrees.to_radians().cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_through_box_hits_at_entry_distance() {
        let t = ray_hits_box(Vec3::ZERO, Vec3::X, Vec3::new(5.0, 0.0, 0.0), Vec3::splat(1.0), 100.0);
        assert!((t.expect("should hit") - 4.0).abs() < 1e-4);
    }

    #[test]
    fn ray_pointing_away_misses() {
        assert!(ray_hits_box(Vec3::ZERO, -Vec3::X, Vec3::new(5.0, 0.0, 0.0), Vec3::splat(1.0), 100.0).is_none());
    }

    #[test]
    fn ray_passing_beside_box_misses() {
        assert!(ray_hits_box(Vec3::new(0.0, 0.0, 3.0), Vec3::X, Vec3::new(5.0, 0.0, 0.0), Vec3::splat(1.0), 100.0).is_none());
    }

    #[test]
    fn ray_starting_inside_hits_at_zero() {
        let t = ray_hits_box(Vec3::ZERO, Vec3::Z, Vec3::ZERO, Vec3::splat(1.0), 10.0);
        assert_eq!(t, Some(0.0));
    }

    #[test]
    fn look_cone_respects_angle() {
        let eye = Vec3::ZERO;
        let target = Vec3::new(1.0, 0.0, 0.0);
        assert!(within_look_cone(eye, Vec3::X, target, 10.0));
        assert!(within_look_cone(eye, Vec3::new(1.0, 0.0, 0.3), target, 20.0));
        assert!(!within_look_cone(eye, Vec3::new(1.0, 0.0, 0.3), target, 10.0));
        assert!(!within_look_cone(eye, -Vec3::X, target, 90.0 - 1.0));
    }
}
