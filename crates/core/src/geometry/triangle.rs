//! Triangles, rays and the ray–triangle intersector.

use serde::{Deserialize, Serialize};

use crate::core_types::vec3::{is_finite, Vec3};

/// Below this |dot(direction, normal)| a ray is treated as parallel to the plane.
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// A ray with a unit-length direction, so `t` is a distance in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`.
    ///
    /// Returns `None` when `direction` has no length.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize(PARALLEL_EPSILON)?;
        Some(Self { origin, direction })
    }

    /// Ray from `from` toward `to`, together with the distance between them.
    ///
    /// Returns `None` when the two points coincide.
    pub fn between(from: &Vec3, to: &Vec3) -> Option<(Self, f32)> {
        let delta = to - from;
        let distance = delta.norm();
        let ray = Self::new(*from, delta)?;
        Some((ray, distance))
    }

    /// Point at distance `t` along the ray
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// One triangle of the static level mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    /// First vertex
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Build from nine floats ordered (v0.x, v0.y, v0.z, v1.x, …, v2.z)
    pub fn from_coords(c: [f32; 9]) -> Self {
        Self::new(
            Vec3::new(c[0], c[1], c[2]),
            Vec3::new(c[3], c[4], c[5]),
            Vec3::new(c[6], c[7], c[8]),
        )
    }

    /// `true` when no vertex coordinate is NaN or infinite
    pub fn is_finite(&self) -> bool {
        is_finite(&self.v0) && is_finite(&self.v1) && is_finite(&self.v2)
    }

    /// Unit normal (right-hand rule), `None` for a degenerate triangle
    pub fn normal(&self) -> Option<Vec3> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        edge1.cross(&edge2).try_normalize(f32::EPSILON)
    }

    /// Intersect a ray with this triangle.
    ///
    /// Plane intersection followed by a barycentric inside test. Returns the
    /// distance `t` along the ray when the ray hits the triangle in front of
    /// its origin, `None` when it is parallel to the plane, points away, or
    /// crosses the plane outside the triangle.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let normal = self.normal()?;

        let denom = ray.direction.dot(&normal);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.v0 - ray.origin).dot(&normal) / denom;
        if t < 0.0 {
            return None;
        }

        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        let w = ray.at(t) - self.v0;
        let d00 = e1.dot(&e1);
        let d01 = e1.dot(&e2);
        let d11 = e2.dot(&e2);
        let d20 = w.dot(&e1);
        let d21 = w.dot(&e2);
        let det = d00 * d11 - d01 * d01;
        if det.abs() < f32::EPSILON {
            return None;
        }

        let u = (d11 * d20 - d01 * d21) / det;
        let v = (d00 * d21 - d01 * d20) / det;
        (u >= 0.0 && v >= 0.0 && u + v <= 1.0).then_some(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Unit right triangle in the z = 0 plane
    fn floor_triangle() -> Triangle {
        Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, 10.0, 0.0),
        )
    }

    #[test]
    fn test_ray_hits_triangle_from_above() {
        let ray = Ray::new(Vec3::new(2.0, 2.0, 5.0), Vec3::new(0.0, 0.0, -1.0)).unwrap();
        let t = floor_triangle().intersect(&ray).expect("should hit");
        assert_relative_eq!(t, 5.0, epsilon = 1e-5);
    }

    #[test]
    fn test_ray_hits_triangle_from_below() {
        // Two-sided: winding does not matter
        let ray = Ray::new(Vec3::new(2.0, 2.0, -3.0), Vec3::new(0.0, 0.0, 1.0)).unwrap();
        let t = floor_triangle().intersect(&ray).expect("should hit");
        assert_relative_eq!(t, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_ray_misses_outside_triangle() {
        // Crosses the plane at (8, 8) where u + v > 1
        let ray = Ray::new(Vec3::new(8.0, 8.0, 5.0), Vec3::new(0.0, 0.0, -1.0)).unwrap();
        assert!(floor_triangle().intersect(&ray).is_none());
    }

    #[test]
    fn test_ray_behind_origin() {
        let ray = Ray::new(Vec3::new(2.0, 2.0, 5.0), Vec3::new(0.0, 0.0, 1.0)).unwrap();
        assert!(floor_triangle().intersect(&ray).is_none());
    }

    #[test]
    fn test_parallel_ray_never_hits() {
        let tri = floor_triangle();
        for direction in [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-3.0, 2.0, 0.0),
        ] {
            // Both in the plane and above it
            for z in [0.0, 1.0, -2.0] {
                let ray = Ray::new(Vec3::new(-5.0, 1.0, z), direction).unwrap();
                assert!(tri.intersect(&ray).is_none(), "dir {direction:?} z {z}");
            }
        }
    }

    #[test]
    fn test_degenerate_triangle_never_hits() {
        let tri = Triangle::new(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0));
        assert!(tri.normal().is_none());
        let ray = Ray::new(Vec3::new(0.5, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0)).unwrap();
        assert!(tri.intersect(&ray).is_none());
    }

    #[test]
    fn test_ray_between_coincident_points() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!(Ray::between(&p, &p).is_none());

        let (ray, dist) = Ray::between(&p, &Vec3::new(1.0, 2.0, 13.0)).unwrap();
        assert_relative_eq!(dist, 10.0);
        assert_relative_eq!(ray.direction.z, 1.0);
    }

    #[test]
    fn test_triangle_finiteness() {
        assert!(floor_triangle().is_finite());
        let mut coords = [0.0_f32; 9];
        coords[4] = f32::NAN;
        assert!(!Triangle::from_coords(coords).is_finite());
        coords[4] = f32::INFINITY;
        assert!(!Triangle::from_coords(coords).is_finite());
    }
}
