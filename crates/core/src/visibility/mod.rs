//! Line-of-sight and field-of-view evaluation

pub mod fov;
pub mod los;

pub use fov::{is_in_fov, Observer};
pub use los::{FovVisibility, LosConfig, LosDetector, LosOutcome};
