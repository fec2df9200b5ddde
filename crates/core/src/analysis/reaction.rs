//! Parallel earliest-visible-tick search
//!
//! For one engagement, the attacker's samples in the window before the damage
//! tick are candidates. A single producer enqueues every `stride`-th candidate
//! index into a bounded job queue and closes it. Workers on the rayon pool
//! evaluate box-sampled, FOV-gated LOS from attacker to victim for each index
//! and stream [`LosResult`]s back. The collector keeps the visible result with
//! the smallest index; samples are in tick order, so that is the earliest
//! visible tick no matter which worker finishes first.
//!
//! There is no cancellation: every enqueued index is evaluated exactly once.

use std::num::NonZeroUsize;

use crossbeam_channel::bounded;
use rayon::ThreadPool;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::analysis::config::AnalysisConfig;
use crate::analysis::grouping::PlayerTrack;
use crate::core_types::player::{PlayerId, PlayerTickData};
use crate::core_types::tick::{ticks_to_ms, Tick};
use crate::profiler::ProfilerScope;
use crate::visibility::{LosDetector, Observer};

/// Outcome of evaluating one candidate tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LosResult {
    /// Index into the attacker's window samples
    pub tick_index: usize,
    /// Tick of that sample
    pub tick: Tick,
    /// Attacker had FOV-gated LOS to the victim at this tick
    pub has_los: bool,
}

/// Reaction-time measurement for one engagement-opening damage event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Engagement {
    /// Player dealing the damage
    pub attacker_id: PlayerId,
    /// Player receiving the damage
    pub victim_id: PlayerId,
    /// Weapon of the opening hit
    pub weapon: String,
    /// Tick of the opening hit
    pub damage_tick: Tick,
    /// Earliest tick in the window at which the attacker saw the victim
    pub first_visible_tick: Option<Tick>,
    /// `damage_tick - first_visible_tick` in ms, 0 when never visible
    pub reaction_time_ms: f32,
    /// Reaction time is long enough to count as a real reaction
    pub accepted: bool,
}

/// Worker count for a window of `ticks_in_window` samples.
///
/// `clamp(min(ticks / 10, available parallelism), 1, max_workers)`
pub fn worker_count(ticks_in_window: usize, max_workers: usize) -> usize {
    let available = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
    (ticks_in_window / 10)
        .min(available)
        .clamp(1, max_workers.max(1))
}

/// Earliest-visible-tick search over one map's detector.
pub struct ReactionSearch<'a> {
    detector: &'a LosDetector,
    pool: &'a ThreadPool,
    config: &'a AnalysisConfig,
}

impl<'a> ReactionSearch<'a> {
    /// Create a search using `pool` for its workers
    pub fn new(detector: &'a LosDetector, pool: &'a ThreadPool, config: &'a AnalysisConfig) -> Self {
        Self {
            detector,
            pool,
            config,
        }
    }

    /// Earliest candidate at which `attacker` sees `victim`.
    ///
    /// `attacker` must be ordered by tick. Candidates without a victim sample
    /// at the same tick report no LOS.
    pub fn earliest_visible(
        &self,
        attacker: &[&PlayerTickData],
        victim: &PlayerTrack<'_>,
    ) -> Option<LosResult> {
        let mut earliest: Option<LosResult> = None;
        self.evaluate(attacker, victim, |result| {
            if result.has_los && earliest.is_none_or(|e| result.tick_index < e.tick_index) {
                earliest = Some(result);
            }
        });
        earliest
    }

    /// Evaluate every stride-aligned candidate once, handing each result to
    /// `collect` on the calling thread in completion order.
    fn evaluate(
        &self,
        attacker: &[&PlayerTickData],
        victim: &PlayerTrack<'_>,
        mut collect: impl FnMut(LosResult),
    ) {
        let stride = self.config.tick_stride.max(1);
        let candidates: Vec<usize> = (0..attacker.len()).step_by(stride).collect();
        if candidates.is_empty() {
            return;
        }

        let workers = worker_count(attacker.len(), self.config.max_workers);
        debug!(
            "Reaction search: {} candidates of {} ticks on {} workers",
            candidates.len(),
            attacker.len(),
            workers
        );
        let _timer = ProfilerScope::new("reaction search");

        // Both queues can hold every candidate, so the producer never blocks
        // on workers that are themselves waiting for the collector.
        let (job_tx, job_rx) = bounded::<usize>(candidates.len());
        let (result_tx, result_rx) = bounded::<LosResult>(candidates.len());

        let detector = self.detector;
        let hitbox = &self.config.hitbox;
        let half_angle = self.config.fov_half_angle_deg;

        self.pool.in_place_scope(|scope| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move |_| {
                    for tick_index in job_rx {
                        let sample = attacker[tick_index];
                        let has_los = victim.at(sample.tick).is_some_and(|target| {
                            detector.sees(
                                &Observer::from(sample),
                                &Observer::from(target),
                                hitbox,
                                half_angle,
                            )
                        });
                        let result = LosResult {
                            tick_index,
                            tick: sample.tick,
                            has_los,
                        };
                        if result_tx.send(result).is_err() {
                            break;
                        }
                    }
                });
            }
            // Workers hold the only remaining handles; the streams close when
            // the producer and every worker are done.
            drop(job_rx);
            drop(result_tx);

            for tick_index in candidates {
                if job_tx.send(tick_index).is_err() {
                    break;
                }
            }
            drop(job_tx);

            for result in result_rx {
                collect(result);
            }
        });
    }

    /// Measure the reaction time of one engagement-opening hit.
    pub fn measure(
        &self,
        attacker_id: PlayerId,
        victim_id: PlayerId,
        weapon: &str,
        damage_tick: Tick,
        attacker: Option<&PlayerTrack<'_>>,
        victim: Option<&PlayerTrack<'_>>,
    ) -> Engagement {
        let first_visible_tick = match (attacker, victim) {
            (Some(attacker), Some(victim)) => {
                let window = attacker.window(
                    damage_tick - self.config.reaction_window_ticks,
                    damage_tick,
                );
                self.earliest_visible(window, victim).map(|r| r.tick)
            }
            _ => None,
        };

        let reaction_time_ms = first_visible_tick
            .map_or(0.0, |tick| ticks_to_ms(damage_tick - tick, self.config.tick_rate));
        let accepted = first_visible_tick.is_some() && reaction_time_ms >= self.config.min_reaction_ms;

        if first_visible_tick.is_none() {
            trace!("No visible tick for {attacker_id} -> {victim_id} at tick {damage_tick}");
        }

        Engagement {
            attacker_id,
            victim_id,
            weapon: weapon.to_string(),
            damage_tick,
            first_visible_tick,
            reaction_time_ms,
            accepted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::grouping::RoundGroups;
    use crate::core_types::vec3::Vec3;
    use crate::geometry::Triangle;
    use crate::map::TriangleMesh;
    use std::sync::Arc;

    const ATTACKER: PlayerId = 1;
    const VICTIM: PlayerId = 2;

    fn pool() -> ThreadPool {
        rayon::ThreadPoolBuilder::new().num_threads(4).build().unwrap()
    }

    fn empty_detector() -> LosDetector {
        LosDetector::new(Arc::new(TriangleMesh::default()))
    }

    /// Attacker at the origin facing away (yaw 180) except at `facing` ticks;
    /// victim 500 units down +x, always present.
    fn samples(range: std::ops::Range<Tick>, facing: &[Tick]) -> Vec<PlayerTickData> {
        let mut out = Vec::new();
        for tick in range {
            let yaw = if facing.contains(&tick) { 0.0 } else { 180.0 };
            out.push(PlayerTickData::new(ATTACKER, 1, tick, Vec3::zeros(), 0.0, yaw));
            out.push(PlayerTickData::new(VICTIM, 1, tick, Vec3::new(500.0, 0.0, 0.0), 0.0, 180.0));
        }
        out
    }

    #[test]
    fn test_worker_count_bounds() {
        assert_eq!(worker_count(0, 9), 1);
        assert_eq!(worker_count(5, 9), 1);
        assert!(worker_count(129, 9) <= 9);
        assert!(worker_count(10_000, 3) <= 3);
        assert_eq!(worker_count(10_000, 1), 1);

        let available = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
        assert_eq!(worker_count(50, 9), 5.min(available));
        assert_eq!(worker_count(1000, 3), 3.min(available));
        assert_eq!(worker_count(10_000, 0), 1);
    }

    #[test]
    fn test_each_aligned_candidate_evaluated_once() {
        let ticks = samples(1000..1129, &[1010, 1064]);
        let groups = RoundGroups::build(1, &ticks, &[], &[]);
        let detector = empty_detector();
        let pool = pool();
        let config = AnalysisConfig::default();
        let search = ReactionSearch::new(&detector, &pool, &config);
        let attacker = groups.track(ATTACKER).unwrap().samples();

        let mut seen = vec![0_u32; attacker.len()];
        let mut visible = Vec::new();
        search.evaluate(attacker, groups.track(VICTIM).unwrap(), |result| {
            seen[result.tick_index] += 1;
            assert_eq!(result.tick, attacker[result.tick_index].tick);
            if result.has_los {
                visible.push(result.tick);
            }
        });

        for (index, count) in seen.iter().enumerate() {
            let expected = u32::from(index % config.tick_stride == 0);
            assert_eq!(*count, expected, "tick index {index}");
        }
        // 1010 is unaligned (index 10) and never evaluated
        assert_eq!(visible, vec![1064]);
    }

    #[test]
    fn test_earliest_visible_wins_over_later() {
        // Visible at 1040 and again from 1080 on; 1040 must win
        let facing: Vec<Tick> = std::iter::once(1040).chain(1080..1128).collect();
        let ticks = samples(1000..1128, &facing);
        let groups = RoundGroups::build(1, &ticks, &[], &[]);
        let detector = empty_detector();
        let pool = pool();
        let config = AnalysisConfig::default();
        let search = ReactionSearch::new(&detector, &pool, &config);

        let attacker = groups.track(ATTACKER).unwrap();
        let victim = groups.track(VICTIM).unwrap();

        for _ in 0..20 {
            let result = search.earliest_visible(attacker.samples(), victim).unwrap();
            assert_eq!(result.tick, 1040);
            assert_eq!(result.tick_index, 40);
            assert!(result.has_los);
        }
    }

    #[test]
    fn test_stride_skips_unaligned_ticks() {
        // Only visible at an index not divisible by 4
        let ticks = samples(1000..1064, &[1001]);
        let groups = RoundGroups::build(1, &ticks, &[], &[]);
        let detector = empty_detector();
        let pool = pool();
        let config = AnalysisConfig::default();
        let search = ReactionSearch::new(&detector, &pool, &config);

        let result = search.earliest_visible(
            groups.track(ATTACKER).unwrap().samples(),
            groups.track(VICTIM).unwrap(),
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_missing_victim_sample_is_not_visible() {
        let mut ticks = samples(1000..1010, &[1000, 1004, 1008]);
        ticks.retain(|t| !(t.player_id == VICTIM && t.tick == 1000));
        let groups = RoundGroups::build(1, &ticks, &[], &[]);
        let detector = empty_detector();
        let pool = pool();
        let config = AnalysisConfig::default();
        let search = ReactionSearch::new(&detector, &pool, &config);

        let result = search
            .earliest_visible(
                groups.track(ATTACKER).unwrap().samples(),
                groups.track(VICTIM).unwrap(),
            )
            .unwrap();
        assert_eq!(result.tick, 1004);
    }

    #[test]
    fn test_wall_hides_victim() {
        // Tall wall between attacker and victim across the whole window
        let wall = [
            Triangle::new(
                Vec3::new(250.0, -1000.0, -100.0),
                Vec3::new(250.0, 1000.0, -100.0),
                Vec3::new(250.0, 1000.0, 1000.0),
            ),
            Triangle::new(
                Vec3::new(250.0, -1000.0, -100.0),
                Vec3::new(250.0, 1000.0, 1000.0),
                Vec3::new(250.0, -1000.0, 1000.0),
            ),
        ];
        let detector = LosDetector::new(Arc::new(TriangleMesh::from_triangles(wall)));
        let facing: Vec<Tick> = (1000..1128).collect();
        let ticks = samples(1000..1128, &facing);
        let groups = RoundGroups::build(1, &ticks, &[], &[]);
        let pool = pool();
        let config = AnalysisConfig::default();
        let search = ReactionSearch::new(&detector, &pool, &config);

        let engagement = search.measure(
            ATTACKER,
            VICTIM,
            "ak47",
            1128,
            groups.track(ATTACKER),
            groups.track(VICTIM),
        );
        assert_eq!(engagement.first_visible_tick, None);
        assert_eq!(engagement.reaction_time_ms, 0.0);
        assert!(!engagement.accepted);
    }

    #[test]
    fn test_measure_reaction_time() {
        // Window is [1200 - 128, 1200]; first aligned visible tick is 1104
        let facing: Vec<Tick> = (1104..1200).collect();
        let ticks = samples(1072..1201, &facing);
        let groups = RoundGroups::build(1, &ticks, &[], &[]);
        let detector = empty_detector();
        let pool = pool();
        let config = AnalysisConfig::default();
        let search = ReactionSearch::new(&detector, &pool, &config);

        let engagement = search.measure(
            ATTACKER,
            VICTIM,
            "ak47",
            1200,
            groups.track(ATTACKER),
            groups.track(VICTIM),
        );
        assert_eq!(engagement.first_visible_tick, Some(1104));
        // 96 ticks at 64 tick = 1500 ms
        assert_eq!(engagement.reaction_time_ms, 1500.0);
        assert!(engagement.accepted);
    }

    #[test]
    fn test_short_reaction_rejected() {
        // First aligned visible tick is 1196, 2 ticks before the damage:
        // 31.25 ms is below the 50 ms floor
        let ticks = samples(1072..1201, &[1196, 1197, 1198, 1199, 1200]);
        let groups = RoundGroups::build(1, &ticks, &[], &[]);
        let detector = empty_detector();
        let pool = pool();
        let config = AnalysisConfig::default();
        let search = ReactionSearch::new(&detector, &pool, &config);

        let engagement = search.measure(
            ATTACKER,
            VICTIM,
            "ak47",
            1198,
            groups.track(ATTACKER),
            groups.track(VICTIM),
        );
        assert_eq!(engagement.first_visible_tick, Some(1196));
        assert_eq!(engagement.reaction_time_ms, 31.25);
        assert!(!engagement.accepted);
    }

    #[test]
    fn test_measure_without_tracks() {
        let detector = empty_detector();
        let pool = pool();
        let config = AnalysisConfig::default();
        let search = ReactionSearch::new(&detector, &pool, &config);

        let engagement = search.measure(ATTACKER, VICTIM, "ak47", 500, None, None);
        assert_eq!(engagement.first_visible_tick, None);
        assert!(!engagement.accepted);
    }
}
