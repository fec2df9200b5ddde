//! Per-player and per-weapon aim statistics

use serde::{Deserialize, Serialize};

use crate::analysis::correlation::ShotAnalysisData;
use crate::core_types::player::{HitRegion, PlayerId};

/// Aggregated aim statistics over a set of shots.
///
/// Percentages are 0..=100. Every ratio is 0 when its denominator is 0, and
/// averages are 0 when they have no samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AimStats {
    pub shots_fired: u32,
    pub shots_hit: u32,
    pub accuracy: f32,
    pub spray_shots_fired: u32,
    pub spray_shots_hit: u32,
    pub spray_accuracy: f32,
    /// Head hits relative to all hits
    pub headshot_accuracy: f32,
    pub head_hits: u32,
    pub chest_hits: u32,
    pub stomach_hits: u32,
    pub arm_hits: u32,
    pub leg_hits: u32,
    pub avg_crosshair_x: f32,
    pub avg_crosshair_y: f32,
    /// Mean of `hypot(x, y)` over hits with crosshair data
    pub avg_crosshair_deviation: f32,
    /// Mean accepted reaction time in ms
    pub avg_reaction_time_ms: f32,
    /// Number of accepted reaction times behind the average
    pub reaction_samples: u32,
}

/// Aim statistics of one player in one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AimAnalysisResult {
    pub player_id: PlayerId,
    pub round_number: u32,
    #[serde(flatten)]
    pub stats: AimStats,
}

/// Aim statistics of one player with one weapon in one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponAimAnalysisResult {
    pub player_id: PlayerId,
    pub round_number: u32,
    pub weapon_name: String,
    #[serde(flatten)]
    pub stats: AimStats,
}

fn percent(part: u32, whole: u32) -> f32 {
    if whole == 0 {
        0.0
    } else {
        part as f32 / whole as f32 * 100.0
    }
}

fn mean(sum: f64, count: u32) -> f32 {
    if count == 0 {
        0.0
    } else {
        (sum / f64::from(count)) as f32
    }
}

/// Running totals folded into an [`AimStats`].
///
/// Sums are kept in `f64` and shots are fed in tick order, so the same input
/// always yields bit-identical averages.
#[derive(Debug, Clone, Default)]
pub struct StatsAccumulator {
    shots_fired: u32,
    shots_hit: u32,
    spray_fired: u32,
    spray_hit: u32,
    head: u32,
    chest: u32,
    stomach: u32,
    arms: u32,
    legs: u32,
    crosshair_samples: u32,
    crosshair_x: f64,
    crosshair_y: f64,
    crosshair_magnitude: f64,
    reaction_samples: u32,
    reaction_ms: f64,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one analyzed shot in.
    ///
    /// The shot's own reaction time is not counted here; reactions are
    /// per engagement and go through [`Self::add_reaction`].
    pub fn add_shot(&mut self, shot: &ShotAnalysisData) {
        self.shots_fired += 1;
        if shot.is_spray_shot {
            self.spray_fired += 1;
        }
        if !shot.hit {
            return;
        }

        self.shots_hit += 1;
        if shot.is_spray_shot {
            self.spray_hit += 1;
        }
        match shot.hit_group.and_then(|g| g.region()) {
            Some(HitRegion::Head) => self.head += 1,
            Some(HitRegion::Chest) => self.chest += 1,
            Some(HitRegion::Stomach) => self.stomach += 1,
            Some(HitRegion::Arms) => self.arms += 1,
            Some(HitRegion::Legs) => self.legs += 1,
            None => {}
        }
        if let Some(crosshair) = shot.crosshair {
            self.crosshair_samples += 1;
            self.crosshair_x += f64::from(crosshair.x);
            self.crosshair_y += f64::from(crosshair.y);
            self.crosshair_magnitude += f64::from(crosshair.magnitude());
        }
    }

    /// Count one accepted reaction time
    pub fn add_reaction(&mut self, reaction_ms: f32) {
        self.reaction_samples += 1;
        self.reaction_ms += f64::from(reaction_ms);
    }

    pub fn finish(&self) -> AimStats {
        AimStats {
            shots_fired: self.shots_fired,
            shots_hit: self.shots_hit,
            accuracy: percent(self.shots_hit, self.shots_fired),
            spray_shots_fired: self.spray_fired,
            spray_shots_hit: self.spray_hit,
            spray_accuracy: percent(self.spray_hit, self.spray_fired),
            headshot_accuracy: percent(self.head, self.shots_hit),
            head_hits: self.head,
            chest_hits: self.chest,
            stomach_hits: self.stomach,
            arm_hits: self.arms,
            leg_hits: self.legs,
            avg_crosshair_x: mean(self.crosshair_x, self.crosshair_samples),
            avg_crosshair_y: mean(self.crosshair_y, self.crosshair_samples),
            avg_crosshair_deviation: mean(self.crosshair_magnitude, self.crosshair_samples),
            avg_reaction_time_ms: mean(self.reaction_ms, self.reaction_samples),
            reaction_samples: self.reaction_samples,
        }
    }
}
