//! Sightline Core Library
//!
//! Line-of-sight and aim analytics for Counter-Strike 2 demo data.
//! Given decoded per-tick player telemetry plus shot and damage events for a
//! round, it decides whether a shooter could have seen their target and
//! derives reaction-time, accuracy and crosshair-placement statistics.
//!
//! ## Layers
//!
//! - Level meshes loaded from `.tri` files of packed triangles
//! - Ray/triangle intersection, point and hitbox-sampled LOS, FOV cones
//! - Per-round aim analysis with a bounded-parallel earliest-visible-tick search

// Core types and utilities
pub mod core_types;
pub mod error;
pub mod profiler;

// Geometry and level data
pub mod geometry;
pub mod map;

// Visibility and aim analysis
pub mod analysis;
pub mod visibility;

// Re-export core types
pub use core_types::{DamageEvent, HitGroup, HitRegion, PlayerId, PlayerShootingData, PlayerTickData};
pub use core_types::{Tick, Vec3};
pub use error::{AnalysisError, MeshError};

// Re-export geometry and visibility types
pub use geometry::{Hitbox, Ray, Triangle};
pub use map::{DetectorCache, TriangleMesh};
pub use visibility::{LosDetector, Observer};

// Re-export analysis types
pub use analysis::{AimAnalysisResult, AimAnalyzer, AnalysisConfig, RoundAnalysis};
pub use analysis::{Engagement, WeaponAimAnalysisResult};
