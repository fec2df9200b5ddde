//! Line-of-sight evaluation against the static level mesh
//!
//! Three layers, each built on the previous one:
//!
//! 1. [`LosDetector::point_los`] casts a single ray between two points.
//! 2. [`LosDetector::box_los`] samples 11 points per player hitbox and
//!    reports LOS if *any* point pair is unobstructed.
//! 3. [`LosDetector::sees`] / [`LosDetector::mutual_visibility`] additionally
//!    gate each side on its own field-of-view cone.
//!
//! The detector is immutable after construction apart from its scratch pool,
//! so one `Arc<LosDetector>` can serve any number of concurrent searches.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core_types::pool::ScratchPool;
use crate::core_types::vec3::Vec3;
use crate::geometry::{Hitbox, Ray, Triangle, HITBOX_SAMPLE_COUNT};
use crate::map::TriangleMesh;
use crate::visibility::fov::Observer;

/// Sample buffers kept idle in the pool; two per concurrently running worker.
const SAMPLE_POOL_IDLE: usize = 32;

/// Tolerances for the point-to-point test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LosConfig {
    /// A hit only blocks if it is closer than `distance - end_epsilon`, so the
    /// target's own surface never occludes it
    pub end_epsilon: f32,
    /// Hits closer than this to the ray origin are ignored
    pub hit_epsilon: f32,
}

impl Default for LosConfig {
    fn default() -> Self {
        Self {
            end_epsilon: 0.1,
            hit_epsilon: 0.001,
        }
    }
}

/// Result of a point-to-point query.
#[derive(Debug, Clone, PartialEq)]
pub struct LosOutcome {
    /// `true` when nothing blocks the segment
    pub has_los: bool,
    /// Every triangle that blocks the segment
    pub blocking: Vec<Triangle>,
}

/// Per-side visibility between two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FovVisibility {
    /// Box-sampled geometric LOS between the two hitboxes
    pub line_of_sight: bool,
    /// A has LOS and B is inside A's view cone
    pub a_sees_b: bool,
    /// B has LOS and A is inside B's view cone
    pub b_sees_a: bool,
}

/// Line-of-sight detector for one map.
#[derive(Debug)]
pub struct LosDetector {
    mesh: Arc<TriangleMesh>,
    config: LosConfig,
    samples: ScratchPool<Vec<Vec3>>,
}

impl LosDetector {
    /// Create a detector with default tolerances
    pub fn new(mesh: Arc<TriangleMesh>) -> Self {
        Self::with_config(mesh, LosConfig::default())
    }

    /// Create a detector with explicit tolerances
    pub fn with_config(mesh: Arc<TriangleMesh>, config: LosConfig) -> Self {
        Self {
            mesh,
            config,
            samples: ScratchPool::new(SAMPLE_POOL_IDLE),
        }
    }

    /// Mesh queried by this detector
    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    /// Tolerances in use
    pub fn config(&self) -> &LosConfig {
        &self.config
    }

    /// Cast one ray from `from` to `to` and collect every blocking triangle.
    ///
    /// Coincident points always have LOS.
    pub fn point_los(&self, from: &Vec3, to: &Vec3) -> LosOutcome {
        let Some((ray, distance)) = Ray::between(from, to) else {
            return LosOutcome {
                has_los: true,
                blocking: Vec::new(),
            };
        };

        let blocking: Vec<Triangle> = self
            .mesh
            .triangles()
            .iter()
            .filter(|tri| self.blocks(tri, &ray, distance))
            .copied()
            .collect();

        LosOutcome {
            has_los: blocking.is_empty(),
            blocking,
        }
    }

    /// Same test as [`Self::point_los`] but stops at the first blocker.
    pub fn is_clear(&self, from: &Vec3, to: &Vec3) -> bool {
        let Some((ray, distance)) = Ray::between(from, to) else {
            return true;
        };
        !self
            .mesh
            .triangles()
            .iter()
            .any(|tri| self.blocks(tri, &ray, distance))
    }

    /// Box-sampled LOS: `true` if any of the 11 × 11 point pairs is clear.
    pub fn box_los(&self, a: &Vec3, a_box: &Hitbox, b: &Vec3, b_box: &Hitbox) -> bool {
        if self.mesh.is_empty() {
            return true;
        }

        let mut a_points = self.samples.acquire();
        let mut b_points = self.samples.acquire();
        a_box.sample_points(a, &mut a_points);
        b_box.sample_points(b, &mut b_points);
        debug_assert_eq!(a_points.len(), HITBOX_SAMPLE_COUNT);

        a_points
            .iter()
            .any(|pa| b_points.iter().any(|pb| self.is_clear(pa, pb)))
    }

    /// One-sided check: `observer` faces `target` within `half_angle_deg` and
    /// has box-sampled LOS to it.
    ///
    /// The cheap cone test runs first so geometry is only queried when it can
    /// change the answer.
    pub fn sees(
        &self,
        observer: &Observer,
        target: &Observer,
        hitbox: &Hitbox,
        half_angle_deg: f32,
    ) -> bool {
        observer.can_face(&target.position, half_angle_deg)
            && self.box_los(&observer.position, hitbox, &target.position, hitbox)
    }

    /// Evaluate both sides independently; A may see B without B seeing A.
    pub fn mutual_visibility(
        &self,
        a: &Observer,
        b: &Observer,
        hitbox: &Hitbox,
        half_angle_deg: f32,
    ) -> FovVisibility {
        let line_of_sight = self.box_los(&a.position, hitbox, &b.position, hitbox);
        FovVisibility {
            line_of_sight,
            a_sees_b: line_of_sight && a.can_face(&b.position, half_angle_deg),
            b_sees_a: line_of_sight && b.can_face(&a.position, half_angle_deg),
        }
    }

    #[inline]
    fn blocks(&self, tri: &Triangle, ray: &Ray, distance: f32) -> bool {
        tri.intersect(ray).is_some_and(|t| {
            t > self.config.hit_epsilon && t < distance - self.config.end_epsilon
        })
    }
}
