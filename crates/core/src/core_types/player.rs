//! Decoded per-round input records
//!
//! These are produced by the demo decoder and handed to the analysis core
//! already scoped to a single round. They are immutable inputs; nothing in
//! this crate mutates them.

use serde::{Deserialize, Serialize};

use crate::core_types::tick::Tick;
use crate::core_types::vec3::Vec3;

/// Steam64 identifier of a player.
pub type PlayerId = u64;

/// Position and view angles of one player at one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerTickData {
    /// Player this sample belongs to
    pub player_id: PlayerId,
    /// Round the sample was recorded in
    pub round_number: u32,
    /// Tick of the sample
    pub tick: Tick,
    /// Feet (center-bottom) position in world units
    pub position: Vec3,
    /// View pitch in degrees
    pub aim_pitch: f32,
    /// View yaw in degrees
    pub aim_yaw: f32,
}

impl PlayerTickData {
    /// Create a tick sample
    pub fn new(
        player_id: PlayerId,
        round_number: u32,
        tick: Tick,
        position: Vec3,
        aim_pitch: f32,
        aim_yaw: f32,
    ) -> Self {
        Self {
            player_id,
            round_number,
            tick,
            position,
            aim_pitch,
            aim_yaw,
        }
    }
}

/// One fired bullet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerShootingData {
    /// Shooter
    pub player_id: PlayerId,
    /// Round the shot was fired in
    pub round_number: u32,
    /// Tick the shot was fired
    pub tick: Tick,
    /// Weapon class name as reported by the decoder (e.g. `ak47`)
    pub weapon_name: String,
    /// Upstream flag: shot is part of continuous automatic fire
    pub is_spraying: bool,
}

/// One damage instance dealt by an attacker to a victim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageEvent {
    /// Player dealing the damage
    pub attacker_id: PlayerId,
    /// Player receiving the damage
    pub victim_id: PlayerId,
    /// Round the damage happened in
    pub round_number: u32,
    /// Tick the damage was registered
    pub tick: Tick,
    /// Weapon class name
    pub weapon: String,
    /// Anatomical region struck
    pub hit_group: HitGroup,
    /// Health removed
    pub damage: f32,
}

/// Engine hit group of a damage event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitGroup {
    /// Unspecified (world, fall damage, utility)
    Generic,
    /// Head
    Head,
    /// Upper torso
    Chest,
    /// Lower torso
    Stomach,
    /// Left arm
    LeftArm,
    /// Right arm
    RightArm,
    /// Left leg
    LeftLeg,
    /// Right leg
    RightLeg,
    /// Neck
    Neck,
    /// Equipment hit
    Gear,
}

impl HitGroup {
    /// Convert from the engine's numeric hit-group code
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(HitGroup::Generic),
            1 => Some(HitGroup::Head),
            2 => Some(HitGroup::Chest),
            3 => Some(HitGroup::Stomach),
            4 => Some(HitGroup::LeftArm),
            5 => Some(HitGroup::RightArm),
            6 => Some(HitGroup::LeftLeg),
            7 => Some(HitGroup::RightLeg),
            8 => Some(HitGroup::Neck),
            10 => Some(HitGroup::Gear),
            _ => None,
        }
    }

    /// Convert to the engine's numeric hit-group code
    pub fn as_u8(&self) -> u8 {
        match self {
            HitGroup::Generic => 0,
            HitGroup::Head => 1,
            HitGroup::Chest => 2,
            HitGroup::Stomach => 3,
            HitGroup::LeftArm => 4,
            HitGroup::RightArm => 5,
            HitGroup::LeftLeg => 6,
            HitGroup::RightLeg => 7,
            HitGroup::Neck => 8,
            HitGroup::Gear => 10,
        }
    }

    /// Accuracy bucket this hit group counts toward, if any
    pub fn region(&self) -> Option<HitRegion> {
        match self {
            HitGroup::Head => Some(HitRegion::Head),
            HitGroup::Chest | HitGroup::Neck => Some(HitRegion::Chest),
            HitGroup::Stomach => Some(HitRegion::Stomach),
            HitGroup::LeftArm | HitGroup::RightArm => Some(HitRegion::Arms),
            HitGroup::LeftLeg | HitGroup::RightLeg => Some(HitRegion::Legs),
            HitGroup::Generic | HitGroup::Gear => None,
        }
    }
}

/// Body region used for region-accuracy statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitRegion {
    /// Head
    Head,
    /// Chest and neck
    Chest,
    /// Stomach
    Stomach,
    /// Either arm
    Arms,
    /// Either leg
    Legs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_group_codes() {
        for code in [0_u8, 1, 2, 3, 4, 5, 6, 7, 8, 10] {
            let group = HitGroup::from_u8(code).unwrap();
            assert_eq!(group.as_u8(), code);
        }
        assert!(HitGroup::from_u8(9).is_none());
        assert!(HitGroup::from_u8(255).is_none());
    }

    #[test]
    fn test_hit_group_regions() {
        assert_eq!(HitGroup::Head.region(), Some(HitRegion::Head));
        assert_eq!(HitGroup::Neck.region(), Some(HitRegion::Chest));
        assert_eq!(HitGroup::LeftLeg.region(), Some(HitRegion::Legs));
        assert_eq!(HitGroup::RightArm.region(), Some(HitRegion::Arms));
        assert_eq!(HitGroup::Generic.region(), None);
        assert_eq!(HitGroup::Gear.region(), None);
    }
}
