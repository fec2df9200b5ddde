//! Field-of-view cone tests

use crate::core_types::player::PlayerTickData;
use crate::core_types::vec3::{aim_direction, angle_between, Vec3};

/// Observer position and view angles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    /// Feet (center-bottom) position
    pub position: Vec3,
    /// View pitch in degrees
    pub pitch: f32,
    /// View yaw in degrees
    pub yaw: f32,
}

impl Observer {
    /// Create an observer
    pub fn new(position: Vec3, pitch: f32, yaw: f32) -> Self {
        Self {
            position,
            pitch,
            yaw,
        }
    }

    /// Unit view vector
    #[inline]
    pub fn aim(&self) -> Vec3 {
        aim_direction(self.pitch, self.yaw)
    }

    /// `true` when `target` lies within `half_angle_deg` of this observer's aim
    #[inline]
    pub fn can_face(&self, target: &Vec3, half_angle_deg: f32) -> bool {
        is_in_fov(&self.position, &self.aim(), target, half_angle_deg)
    }
}

impl From<&PlayerTickData> for Observer {
    fn from(sample: &PlayerTickData) -> Self {
        Self::new(sample.position, sample.aim_pitch, sample.aim_yaw)
    }
}

/// `true` when the direction from `observer` to `target` is within
/// `half_angle_deg` of `aim`.
///
/// A target at the observer's own position is always inside the cone.
pub fn is_in_fov(observer: &Vec3, aim: &Vec3, target: &Vec3, half_angle_deg: f32) -> bool {
    let to_target = target - observer;
    angle_between(aim, &to_target) <= half_angle_deg.to_radians()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_straight_ahead_in_fov() {
        let observer = Observer::new(Vec3::zeros(), 0.0, 0.0);
        assert!(observer.can_face(&Vec3::new(500.0, 0.0, 0.0), 90.0));
    }

    #[test]
    fn test_target_behind_not_in_fov() {
        let observer = Observer::new(Vec3::zeros(), 0.0, 0.0);
        assert!(!observer.can_face(&Vec3::new(-500.0, 0.0, 0.0), 90.0));
    }

    #[test]
    fn test_cone_boundary() {
        // Aim along +x, target 45° off axis
        let aim = Vec3::x();
        let target = Vec3::new(100.0, 100.0, 0.0);
        assert!(is_in_fov(&Vec3::zeros(), &aim, &target, 60.0));
        assert!(!is_in_fov(&Vec3::zeros(), &aim, &target, 30.0));
    }

    #[test]
    fn test_yaw_rotates_cone() {
        let observer = Observer::new(Vec3::zeros(), 0.0, 180.0);
        assert!(observer.can_face(&Vec3::new(-500.0, 10.0, 0.0), 60.0));
        assert!(!observer.can_face(&Vec3::new(500.0, 0.0, 0.0), 60.0));
    }

    #[test]
    fn test_observer_from_tick_sample() {
        let sample = PlayerTickData::new(7, 1, 100, Vec3::new(1.0, 2.0, 3.0), -10.0, 45.0);
        let observer = Observer::from(&sample);
        assert_eq!(observer.position, sample.position);
        assert_eq!(observer.pitch, -10.0);
        assert_eq!(observer.yaw, 45.0);
    }
}
