//! Aim analysis: engagements, reaction times, accuracy and crosshair placement

pub mod aggregate;
pub mod analyzer;
pub mod config;
pub mod correlation;
pub mod first_shot;
pub mod grouping;
pub mod reaction;

pub use aggregate::{AimAnalysisResult, AimStats, StatsAccumulator, WeaponAimAnalysisResult};
pub use analyzer::{AimAnalyzer, RoundAnalysis};
pub use config::{AnalysisConfig, DEFAULT_EXCLUDED_WEAPONS};
pub use correlation::{closest_damage, crosshair_deviation, CrosshairDeviation, ShotAnalysisData};
pub use first_shot::first_shot_indices;
pub use grouping::{PlayerTrack, RoundGroups};
pub use reaction::{worker_count, Engagement, LosResult, ReactionSearch};
