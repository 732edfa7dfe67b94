//! Movement policy geometry: wander, chase, flee, and frame-rate
//! independent interpolation helpers.

use rand::Rng;

use crate::vector::Vec3;

/// Advance an interval timer by `delta`.
///
/// Returns `true` once the accumulated time is strictly past `period`; the
/// caller performs its periodic action and resets the timer.
pub fn interval_elapsed(timer: &mut f32, delta: f32, period: f32) -> bool {
    *timer += delta;
    *timer > period
}

/// Uniform random point inside a sphere of `radius` around `origin`.
pub fn random_point_in_sphere(origin: Vec3, radius: f32, rng: &mut impl Rng) -> Vec3 {
    loop {
        let candidate = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if candidate.length() <= 1.0 {
            return origin + candidate * radius;
        }
    }
}

/// One-unit step from `position` toward `target`.
///
/// Chasers re-request this every frame instead of the full target position
/// so repathing stays short.
pub fn chase_step(position: Vec3, target: Vec3) -> Vec3 {
    position + (target - position).normalize()
}

/// Destination that runs away from `threat`, turned by `yaw_degrees`.
pub fn flee_destination(position: Vec3, threat: Vec3, yaw_degrees: f32) -> Vec3 {
    position + (position - threat).rotate_yaw(yaw_degrees)
}

/// Random flee yaw in [-180, 180] degrees.
pub fn random_flee_yaw(rng: &mut impl Rng) -> f32 {
    rng.gen_range(-180.0..=180.0)
}

/// Linear blend between two weights at `elapsed / duration`.
pub fn blend_weight(from: f32, to: f32, elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return to;
    }
    let t = (elapsed / duration).clamp(0.0, 1.0);
    from + (to - from) * t
}

/// Facing that looks from `position` toward `target` on the horizontal plane.
/// Falls back to `current` when the two points overlap.
pub fn face_towards(position: Vec3, target: Vec3, current: Vec3) -> Vec3 {
    let dir = (target - position).horizontal().normalize();
    if dir == Vec3::ZERO {
        current
    } else {
        dir
    }
}
