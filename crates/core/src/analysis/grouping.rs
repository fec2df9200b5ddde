//! Partition a round's records by player
//!
//! The caller already scopes inputs to one round; records from any other round
//! are dropped here as well.

use rustc_hash::FxHashMap;

use crate::core_types::player::{DamageEvent, PlayerId, PlayerShootingData, PlayerTickData};
use crate::core_types::tick::Tick;

/// One player's tick samples ordered by tick.
#[derive(Debug, Clone, Default)]
pub struct PlayerTrack<'a> {
    samples: Vec<&'a PlayerTickData>,
}

impl<'a> PlayerTrack<'a> {
    fn push(&mut self, sample: &'a PlayerTickData) {
        self.samples.push(sample);
    }

    fn sort(&mut self) {
        self.samples.sort_by_key(|s| s.tick);
    }

    /// All samples in tick order
    pub fn samples(&self) -> &[&'a PlayerTickData] {
        &self.samples
    }

    /// Sample recorded exactly at `tick`
    pub fn at(&self, tick: Tick) -> Option<&'a PlayerTickData> {
        let idx = self.samples.partition_point(|s| s.tick < tick);
        self.samples.get(idx).filter(|s| s.tick == tick).copied()
    }

    /// Sample at `tick`, or the latest one before it
    pub fn at_or_before(&self, tick: Tick) -> Option<&'a PlayerTickData> {
        let end = self.samples.partition_point(|s| s.tick <= tick);
        end.checked_sub(1).map(|i| self.samples[i])
    }

    /// Samples with `from <= tick <= to`, in tick order
    pub fn window(&self, from: Tick, to: Tick) -> &[&'a PlayerTickData] {
        let start = self.samples.partition_point(|s| s.tick < from);
        let end = self.samples.partition_point(|s| s.tick <= to);
        &self.samples[start..end.max(start)]
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// `true` when the player has no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Round records grouped by player.
#[derive(Debug, Default)]
pub struct RoundGroups<'a> {
    /// Every damage event of the round, ordered by tick
    pub damage: Vec<&'a DamageEvent>,
    /// Indices into [`Self::damage`] per attacker, in tick order
    pub damage_by_attacker: FxHashMap<PlayerId, Vec<usize>>,
    /// Shots per shooter, in tick order
    pub shots_by_player: FxHashMap<PlayerId, Vec<&'a PlayerShootingData>>,
    /// Tick samples per player
    pub tracks: FxHashMap<PlayerId, PlayerTrack<'a>>,
}

impl<'a> RoundGroups<'a> {
    /// Group the records of `round_number`.
    pub fn build(
        round_number: u32,
        ticks: &'a [PlayerTickData],
        shots: &'a [PlayerShootingData],
        damage: &'a [DamageEvent],
    ) -> Self {
        let mut groups = Self::default();

        for sample in ticks.iter().filter(|t| t.round_number == round_number) {
            groups
                .tracks
                .entry(sample.player_id)
                .or_default()
                .push(sample);
        }
        for track in groups.tracks.values_mut() {
            track.sort();
        }

        for shot in shots.iter().filter(|s| s.round_number == round_number) {
            groups
                .shots_by_player
                .entry(shot.player_id)
                .or_default()
                .push(shot);
        }
        for player_shots in groups.shots_by_player.values_mut() {
            player_shots.sort_by_key(|s| s.tick);
        }

        groups.damage = damage
            .iter()
            .filter(|d| d.round_number == round_number)
            .collect();
        groups.damage.sort_by_key(|d| d.tick);
        for (idx, event) in groups.damage.iter().enumerate() {
            groups
                .damage_by_attacker
                .entry(event.attacker_id)
                .or_default()
                .push(idx);
        }

        groups
    }

    /// Players that fired or dealt damage, ordered by id
    pub fn players(&self) -> Vec<PlayerId> {
        let mut players: Vec<PlayerId> = self
            .shots_by_player
            .keys()
            .chain(self.damage_by_attacker.keys())
            .copied()
            .collect();
        players.sort_unstable();
        players.dedup();
        players
    }

    /// Tick samples of `player`, if any were recorded
    pub fn track(&self, player: PlayerId) -> Option<&PlayerTrack<'a>> {
        self.tracks.get(&player)
    }

    /// Shots fired by `player`
    pub fn shots(&self, player: PlayerId) -> &[&'a PlayerShootingData] {
        self.shots_by_player.get(&player).map(Vec::as_slice).unwrap_or_default()
    }

    /// Damage dealt by `player`, as indices into [`Self::damage`]
    pub fn damage_dealt(&self, player: PlayerId) -> &[usize] {
        self.damage_by_attacker.get(&player).map(Vec::as_slice).unwrap_or_default()
    }
}
