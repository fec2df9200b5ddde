//! Vector type alias for 3D positions and directions.

use nalgebra::Vector3;

/// 3D vector type for positions, aim directions and ray directions.
///
/// This is a simple alias for `nalgebra::Vector3<f32>`, used throughout
/// the crate for player positions, mesh vertices and view vectors.
/// Coordinates follow the game's world space (z up).
pub type Vec3 = Vector3<f32>;

/// Below this length a vector is treated as having no direction.
const MIN_DIRECTION_LENGTH: f32 = 1e-6;

/// Angle between two vectors in radians.
///
/// The normalized dot product is clamped to [-1, 1] before `acos` so rounding
/// never produces NaN. A zero-length input has no direction; the angle is
/// reported as 0.
#[inline]
pub fn angle_between(a: &Vec3, b: &Vec3) -> f32 {
    let (Some(a), Some(b)) = (
        a.try_normalize(MIN_DIRECTION_LENGTH),
        b.try_normalize(MIN_DIRECTION_LENGTH),
    ) else {
        return 0.0;
    };
    a.dot(&b).clamp(-1.0, 1.0).acos()
}

/// Unit view vector from pitch and yaw in degrees.
///
/// `forward = (cos(yaw)·cos(pitch), sin(yaw)·cos(pitch), sin(pitch))`
#[inline]
pub fn aim_direction(pitch_deg: f32, yaw_deg: f32) -> Vec3 {
    let (pitch, yaw) = (pitch_deg.to_radians(), yaw_deg.to_radians());
    Vec3::new(yaw.cos() * pitch.cos(), yaw.sin() * pitch.cos(), pitch.sin())
}

/// View vector projected onto the horizontal plane (z = 0).
///
/// Used by the crosshair-placement estimate, which works in 2D.
#[inline]
pub fn flat_aim_direction(pitch_deg: f32, yaw_deg: f32) -> Vec3 {
    let (pitch, yaw) = (pitch_deg.to_radians(), yaw_deg.to_radians());
    Vec3::new(yaw.cos() * pitch.cos(), yaw.sin() * pitch.cos(), 0.0)
}

/// `true` when every component is finite.
#[inline]
pub fn is_finite(v: &Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}
