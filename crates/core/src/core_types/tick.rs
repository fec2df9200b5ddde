//! Tick arithmetic helpers.

/// Discrete simulation step index as recorded in the demo.
pub type Tick = i32;

/// Server tick rate of CS2 demos.
pub const DEFAULT_TICK_RATE: u32 = 64;

/// Convert a tick span to milliseconds at the given tick rate.
#[inline]
pub fn ticks_to_ms(ticks: Tick, tick_rate: u32) -> f32 {
    ticks as f32 / tick_rate as f32 * 1000.0
}

/// Convert seconds to a whole number of ticks at the given tick rate.
#[inline]
pub fn seconds_to_ticks(seconds: f32, tick_rate: u32) -> Tick {
    (seconds * tick_rate as f32).round() as Tick
}
