//! Engagement start detection
//!
//! A gun damage event starts a fresh engagement unless the same
//! (attacker, victim, weapon) triple already produced damage within the
//! trailing engagement gap. This approximates "first shot of an engagement",
//! not the first bullet ever fired at that victim.

use rustc_hash::FxHashMap;

use crate::analysis::config::AnalysisConfig;
use crate::core_types::player::{DamageEvent, PlayerId};
use crate::core_types::tick::Tick;

/// Indices of the engagement-opening events in `damage`.
///
/// `damage` must be ordered by tick. Non-gun damage never opens an engagement
/// and does not extend one.
pub fn first_shot_indices(damage: &[&DamageEvent], config: &AnalysisConfig) -> Vec<usize> {
    let mut last_hit: FxHashMap<(PlayerId, PlayerId, &str), Tick> = FxHashMap::default();
    let mut first_shots = Vec::new();

    for (idx, event) in damage.iter().enumerate() {
        if !config.is_gun(&event.weapon) {
            continue;
        }

        let key = (event.attacker_id, event.victim_id, event.weapon.as_str());
        let continues = last_hit
            .get(&key)
            .is_some_and(|&prev| event.tick - prev <= config.engagement_gap_ticks);
        if !continues {
            first_shots.push(idx);
        }
        last_hit.insert(key, event.tick);
    }

    first_shots
}
