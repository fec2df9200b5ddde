//! Computational geometry used by the visibility layer

pub mod hitbox;
pub mod triangle;

pub use hitbox::{Hitbox, HITBOX_SAMPLE_COUNT};
pub use triangle::{Ray, Triangle, PARALLEL_EPSILON};
