//! Core types and utilities

pub mod player;
pub mod pool;
pub mod tick;
pub mod vec3;

pub use player::*;
pub use pool::{Reset, Scratch, ScratchPool};
pub use tick::*;
pub use vec3::*;
