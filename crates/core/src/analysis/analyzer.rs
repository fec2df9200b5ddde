//! Per-round aim analysis pipeline
//!
//! Groups the round's records, finds engagement-opening hits, measures their
//! reaction times with the parallel LOS search, correlates shots with damage,
//! and folds everything into per-player and per-weapon statistics.

use std::collections::BTreeMap;
use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::aggregate::{AimAnalysisResult, StatsAccumulator, WeaponAimAnalysisResult};
use crate::analysis::config::AnalysisConfig;
use crate::analysis::correlation::{closest_damage, crosshair_deviation, ShotAnalysisData};
use crate::analysis::first_shot::first_shot_indices;
use crate::analysis::grouping::RoundGroups;
use crate::analysis::reaction::{Engagement, ReactionSearch};
use crate::core_types::player::{DamageEvent, PlayerShootingData, PlayerTickData};
use crate::error::AnalysisError;
use crate::profiler::ProfilerScope;
use crate::visibility::LosDetector;

/// Everything computed for one round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundAnalysis {
    /// Round these results belong to
    pub round_number: u32,
    /// One entry per player that fired or dealt damage, ordered by player id
    pub players: Vec<AimAnalysisResult>,
    /// Ordered by player id, then weapon name
    pub weapons: Vec<WeaponAimAnalysisResult>,
    /// Engagement-opening hits in tick order
    pub engagements: Vec<Engagement>,
}

/// Aim analyzer bound to one map.
///
/// Owns the worker pool used by the reaction search. The detector is shared,
/// so analyzers for concurrent rounds on the same map can hold the same one.
pub struct AimAnalyzer {
    detector: Arc<LosDetector>,
    config: AnalysisConfig,
    pool: ThreadPool,
}

impl AimAnalyzer {
    /// Create an analyzer with validated thresholds.
    ///
    /// # Errors
    /// [`AnalysisError::InvalidConfig`] if `config` fails validation, or
    /// [`AnalysisError::ThreadPool`] if the worker pool cannot be started
    pub fn new(detector: Arc<LosDetector>, config: AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.max_workers)
            .thread_name(|i| format!("los-worker-{i}"))
            .build()?;

        Ok(Self {
            detector,
            config,
            pool,
        })
    }

    /// Thresholds this analyzer was built with
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Shared detector of the analyzed map
    pub fn detector(&self) -> &Arc<LosDetector> {
        &self.detector
    }

    /// Analyze one round.
    ///
    /// Records belonging to other rounds are ignored. Missing data never
    /// fails the round: it shows up as misses, empty crosshair fields or
    /// unmeasured reactions.
    pub fn analyze_round(
        &self,
        round_number: u32,
        ticks: &[PlayerTickData],
        shots: &[PlayerShootingData],
        damage: &[DamageEvent],
    ) -> RoundAnalysis {
        let _timer = ProfilerScope::new("analyze round");
        let groups = RoundGroups::build(round_number, ticks, shots, damage);
        let search = ReactionSearch::new(&self.detector, &self.pool, &self.config);

        let mut engagements = Vec::new();
        let mut opened_by: FxHashMap<usize, usize> = FxHashMap::default();
        for damage_idx in first_shot_indices(&groups.damage, &self.config) {
            let event = groups.damage[damage_idx];
            let engagement = search.measure(
                event.attacker_id,
                event.victim_id,
                &event.weapon,
                event.tick,
                groups.track(event.attacker_id),
                groups.track(event.victim_id),
            );
            opened_by.insert(damage_idx, engagements.len());
            engagements.push(engagement);
        }

        let mut players = Vec::new();
        let mut weapons = Vec::new();
        for player in groups.players() {
            let mut totals = StatsAccumulator::new();
            let mut per_weapon: BTreeMap<&str, StatsAccumulator> = BTreeMap::new();
            let dealt = groups.damage_dealt(player);

            for shot in groups.shots(player) {
                let record = self.analyze_shot(shot, &groups, dealt, &opened_by, &engagements);
                totals.add_shot(&record);
                per_weapon
                    .entry(shot.weapon_name.as_str())
                    .or_default()
                    .add_shot(&record);
            }

            for engagement in engagements.iter().filter(|e| e.attacker_id == player) {
                let weapon = per_weapon.entry(engagement.weapon.as_str()).or_default();
                if engagement.accepted {
                    totals.add_reaction(engagement.reaction_time_ms);
                    weapon.add_reaction(engagement.reaction_time_ms);
                }
            }

            players.push(AimAnalysisResult {
                player_id: player,
                round_number,
                stats: totals.finish(),
            });
            weapons.extend(per_weapon.into_iter().map(|(weapon_name, acc)| {
                WeaponAimAnalysisResult {
                    player_id: player,
                    round_number,
                    weapon_name: weapon_name.to_string(),
                    stats: acc.finish(),
                }
            }));
        }

        let accepted = engagements.iter().filter(|e| e.accepted).count();
        info!(
            "Round {}: {} players, {} weapon rows, {} engagements ({} accepted)",
            round_number,
            players.len(),
            weapons.len(),
            engagements.len(),
            accepted
        );

        RoundAnalysis {
            round_number,
            players,
            weapons,
            engagements,
        }
    }

    fn analyze_shot(
        &self,
        shot: &PlayerShootingData,
        groups: &RoundGroups<'_>,
        dealt: &[usize],
        opened_by: &FxHashMap<usize, usize>,
        engagements: &[Engagement],
    ) -> ShotAnalysisData {
        let Some(damage_idx) = closest_damage(
            shot.tick,
            dealt,
            &groups.damage,
            self.config.correlation_window_ticks,
        ) else {
            return ShotAnalysisData::miss(shot);
        };
        let event = groups.damage[damage_idx];

        let shooter = groups
            .track(shot.player_id)
            .and_then(|t| t.at_or_before(shot.tick));
        let victim = groups
            .track(event.victim_id)
            .and_then(|t| t.at_or_before(event.tick));
        let crosshair = shooter
            .zip(victim)
            .map(|(shooter, victim)| crosshair_deviation(shooter, &victim.position));
        if crosshair.is_none() {
            debug!(
                "No crosshair samples for shot by {} at tick {}",
                shot.player_id, shot.tick
            );
        }

        let reaction_time_ms = opened_by
            .get(&damage_idx)
            .map(|&i| &engagements[i])
            .filter(|e| e.accepted)
            .map(|e| e.reaction_time_ms);

        ShotAnalysisData {
            hit: true,
            hit_group: Some(event.hit_group),
            crosshair,
            reaction_time_ms,
            ..ShotAnalysisData::miss(shot)
        }
    }
}
