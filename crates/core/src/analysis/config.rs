//! Tuning thresholds for aim analysis
//!
//! All thresholds live here and are passed to the analyzer at construction, so
//! tests can run the pipeline with different tuning values.

use serde::{Deserialize, Serialize};

use crate::core_types::tick::{seconds_to_ticks, Tick, DEFAULT_TICK_RATE};
use crate::error::AnalysisError;
use crate::geometry::Hitbox;

/// Weapon name substrings that mark non-gun damage (utility, melee, taser).
pub const DEFAULT_EXCLUDED_WEAPONS: &[&str] = &[
    "hegrenade",
    "flashbang",
    "smokegrenade",
    "molotov",
    "incgrenade",
    "inferno",
    "decoy",
    "knife",
    "bayonet",
    "taser",
];

/// Aim analysis thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Demo tick rate (ticks per second)
    pub tick_rate: u32,
    /// Same attacker/victim/weapon damage within this many ticks continues an
    /// engagement instead of starting a new one (5 s at 64 tick)
    pub engagement_gap_ticks: Tick,
    /// Ticks before the damage tick searched for the first visible tick
    pub reaction_window_ticks: Tick,
    /// Only every `tick_stride`-th sample in the window is evaluated
    pub tick_stride: usize,
    /// Upper bound on concurrent LOS workers per search
    pub max_workers: usize,
    /// Reaction times below this are measurement noise (ms)
    pub min_reaction_ms: f32,
    /// Shots within this many ticks of a damage event may correlate with it
    pub correlation_window_ticks: Tick,
    /// View cone half-angle in degrees
    pub fov_half_angle_deg: f32,
    /// Player hull used for box-sampled LOS
    pub hitbox: Hitbox,
    /// Weapon name substrings excluded from first-shot detection
    pub excluded_weapons: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            engagement_gap_ticks: seconds_to_ticks(5.0, DEFAULT_TICK_RATE),
            reaction_window_ticks: 128,
            tick_stride: 4,
            max_workers: 9,
            min_reaction_ms: 50.0,
            correlation_window_ticks: 10,
            fov_half_angle_deg: 60.0,
            hitbox: Hitbox::default(),
            excluded_weapons: DEFAULT_EXCLUDED_WEAPONS
                .iter()
                .map(|w| (*w).to_string())
                .collect(),
        }
    }
}

impl AnalysisConfig {
    /// Check every threshold is usable.
    ///
    /// # Errors
    /// Returns [`AnalysisError::InvalidConfig`] naming the first bad field
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let invalid = |msg: &str| Err(AnalysisError::InvalidConfig(msg.to_string()));

        if self.tick_rate == 0 {
            return invalid("tick_rate must be positive");
        }
        if self.tick_stride == 0 {
            return invalid("tick_stride must be positive");
        }
        if self.max_workers == 0 {
            return invalid("max_workers must be positive");
        }
        if self.reaction_window_ticks < 0
            || self.engagement_gap_ticks < 0
            || self.correlation_window_ticks < 0
        {
            return invalid("tick windows must not be negative");
        }
        if !(self.fov_half_angle_deg > 0.0 && self.fov_half_angle_deg <= 180.0) {
            return invalid("fov_half_angle_deg must be in (0, 180]");
        }
        Ok(())
    }

    /// `true` for bullet weapons; utility, knives and the taser are excluded
    pub fn is_gun(&self, weapon: &str) -> bool {
        let weapon = weapon.to_ascii_lowercase();
        !self
            .excluded_weapons
            .iter()
            .any(|excluded| weapon.contains(excluded.as_str()))
    }
}
