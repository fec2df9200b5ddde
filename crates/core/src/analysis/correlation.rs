//! Shot-to-damage correlation and crosshair placement

use serde::{Deserialize, Serialize};

use crate::core_types::player::{DamageEvent, HitGroup, PlayerShootingData, PlayerTickData};
use crate::core_types::tick::Tick;
use crate::core_types::vec3::{angle_between, flat_aim_direction, Vec3};

/// Angular distance between actual aim and the on-target direction, degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CrosshairDeviation {
    /// Horizontal component
    pub x: f32,
    /// Vertical component
    pub y: f32,
}

impl CrosshairDeviation {
    /// Combined deviation `hypot(x, y)`
    pub fn magnitude(&self) -> f32 {
        self.x.hypot(self.y)
    }
}

/// Per-shot analysis record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotAnalysisData {
    /// Tick the shot was fired
    pub shot_tick: Tick,
    /// Weapon fired
    pub weapon_name: String,
    /// A damage event from the shooter landed within the correlation window
    pub hit: bool,
    /// Hit group of the correlated damage event
    pub hit_group: Option<HitGroup>,
    /// Crosshair deviation at the shot, when both players had samples
    pub crosshair: Option<CrosshairDeviation>,
    /// Accepted reaction time of the engagement this hit opened
    pub reaction_time_ms: Option<f32>,
    /// Upstream spray flag, carried through unchanged
    pub is_spray_shot: bool,
}

impl ShotAnalysisData {
    /// Record for a shot that hit nothing
    pub fn miss(shot: &PlayerShootingData) -> Self {
        Self {
            shot_tick: shot.tick,
            weapon_name: shot.weapon_name.clone(),
            hit: false,
            hit_group: None,
            crosshair: None,
            reaction_time_ms: None,
            is_spray_shot: shot.is_spraying,
        }
    }
}

/// Index of the damage event closest in time to `shot_tick`.
///
/// `candidates` are indices into `damage`, which is ordered by tick. Only
/// events within ±`window` ticks qualify; on equal distance the earlier event
/// wins.
pub fn closest_damage(
    shot_tick: Tick,
    candidates: &[usize],
    damage: &[&DamageEvent],
    window: Tick,
) -> Option<usize> {
    candidates
        .iter()
        .copied()
        .map(|idx| (idx, (damage[idx].tick - shot_tick).abs()))
        .filter(|&(_, distance)| distance <= window)
        .min_by_key(|&(_, distance)| distance)
        .map(|(idx, _)| idx)
}

/// Crosshair deviation of `shooter` relative to a target at `target`.
///
/// The ideal direction is the normalized shooter-to-target vector; the actual
/// direction is the shooter's view projected to the horizontal plane. The
/// angle between them is split through the shooter's yaw and pitch and
/// reported as absolute values.
///
/// The split scales the whole angle by `cos(yaw)` and `sin(pitch)`, so it
/// is a view-angle weighting rather than a decomposition: at yaw ±90° the
/// horizontal component is 0 however far off target the shot was, and at
/// pitch 0 the vertical component is always 0. Use
/// [`CrosshairDeviation::magnitude`] only as a relative score.
pub fn crosshair_deviation(shooter: &PlayerTickData, target: &Vec3) -> CrosshairDeviation {
    let ideal = target - shooter.position;
    let actual = flat_aim_direction(shooter.aim_pitch, shooter.aim_yaw);
    let angle = angle_between(&ideal, &actual).to_degrees();

    CrosshairDeviation {
        x: (angle * shooter.aim_yaw.to_radians().cos()).abs(),
        y: (angle * shooter.aim_pitch.to_radians().sin()).abs(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn damage_at(tick: Tick, hit_group: HitGroup) -> DamageEvent {
        DamageEvent {
            attacker_id: 1,
            victim_id: 2,
            round_number: 1,
            tick,
            weapon: "ak47".to_string(),
            hit_group,
            damage: 30.0,
        }
    }

    fn closest_tick(shot_tick: Tick, events: &[DamageEvent]) -> Option<Tick> {
        let refs: Vec<&DamageEvent> = events.iter().collect();
        let candidates: Vec<usize> = (0..refs.len()).collect();
        closest_damage(shot_tick, &candidates, &refs, 10).map(|i| refs[i].tick)
    }

    #[test]
    fn test_damage_within_window_correlates() {
        let events = vec![damage_at(107, HitGroup::Head)];
        assert_eq!(closest_tick(100, &events), Some(107));
    }

    #[test]
    fn test_damage_outside_window_ignored() {
        let events = vec![damage_at(115, HitGroup::Head)];
        assert_eq!(closest_tick(100, &events), None);
    }

    #[test]
    fn test_window_is_symmetric() {
        let events = vec![damage_at(90, HitGroup::Chest)];
        assert_eq!(closest_tick(100, &events), Some(90));
        assert_eq!(closest_tick(101, &events), None);
    }

    #[test]
    fn test_closest_match_wins() {
        let events = vec![
            damage_at(92, HitGroup::Chest),
            damage_at(103, HitGroup::Head),
            damage_at(109, HitGroup::Stomach),
        ];
        assert_eq!(closest_tick(100, &events), Some(103));
    }

    #[test]
    fn test_tie_goes_to_earlier_event() {
        let events = vec![damage_at(97, HitGroup::Chest), damage_at(103, HitGroup::Head)];
        assert_eq!(closest_tick(100, &events), Some(97));
    }

    #[test]
    fn test_perfect_aim_has_no_deviation() {
        let shooter = PlayerTickData::new(1, 1, 100, Vec3::zeros(), 0.0, 0.0);
        let dev = crosshair_deviation(&shooter, &Vec3::new(1000.0, 0.0, 0.0));
        assert_relative_eq!(dev.x, 0.0, epsilon = 1e-3);
        assert_relative_eq!(dev.y, 0.0, epsilon = 1e-3);
        assert_relative_eq!(dev.magnitude(), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_horizontal_offset_deviation() {
        // Target 45° to the left of a shooter aiming along +x
        let shooter = PlayerTickData::new(1, 1, 100, Vec3::zeros(), 0.0, 0.0);
        let dev = crosshair_deviation(&shooter, &Vec3::new(100.0, 100.0, 0.0));
        assert_relative_eq!(dev.x, 45.0, epsilon = 1e-3);
        assert_relative_eq!(dev.y, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_horizontal_component_vanishes_at_right_angle_yaw() {
        // Facing +y with the target 45° off to the right
        let shooter = PlayerTickData::new(1, 1, 100, Vec3::zeros(), 0.0, 90.0);
        let dev = crosshair_deviation(&shooter, &Vec3::new(100.0, 100.0, 0.0));
        assert_relative_eq!(dev.x, 0.0, epsilon = 1e-3);
        assert_relative_eq!(dev.y, 0.0, epsilon = 1e-3);

        // Same offset seen from yaw 0 reports the full angle
        let shooter = PlayerTickData::new(1, 1, 100, Vec3::zeros(), 0.0, 0.0);
        let dev = crosshair_deviation(&shooter, &Vec3::new(100.0, -100.0, 0.0));
        assert_relative_eq!(dev.x, 45.0, epsilon = 1e-3);
    }

    #[test]
    fn test_deviation_is_absolute() {
        let shooter = PlayerTickData::new(1, 1, 100, Vec3::zeros(), -20.0, 180.0);
        let dev = crosshair_deviation(&shooter, &Vec3::new(100.0, 100.0, 0.0));
        assert!(dev.x >= 0.0);
        assert!(dev.y >= 0.0);
    }

    #[test]
    fn test_miss_record_carries_spray_flag() {
        let shot = PlayerShootingData {
            player_id: 1,
            round_number: 1,
            tick: 55,
            weapon_name: "m4a1".to_string(),
            is_spraying: true,
        };
        let record = ShotAnalysisData::miss(&shot);
        assert!(!record.hit);
        assert!(record.is_spray_shot);
        assert_eq!(record.shot_tick, 55);
        assert_eq!(record.weapon_name, "m4a1");
    }
}
