//! Approximate player hitbox and its representative sample points.

use serde::{Deserialize, Serialize};

use crate::core_types::vec3::Vec3;

/// Number of representative points sampled per hitbox.
pub const HITBOX_SAMPLE_COUNT: usize = 11;

/// Axis-aligned player box anchored at its center-bottom (feet) position.
///
/// `width` spans x, `depth` spans y and `height` spans z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    /// Extent along x in world units
    pub width: f32,
    /// Extent along z in world units
    pub height: f32,
    /// Extent along y in world units
    pub depth: f32,
}

impl Default for Hitbox {
    /// Standing CS2 player hull
    fn default() -> Self {
        Self {
            width: 32.0,
            height: 72.0,
            depth: 32.0,
        }
    }
}

impl Hitbox {
    /// Create a hitbox with the given dimensions
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Append the 11 representative points of a box anchored at `anchor`.
    ///
    /// Order: 4 bottom corners, 4 top corners, then the vertical centerline at
    /// ¼, ½ and ¾ height.
    pub fn sample_points(&self, anchor: &Vec3, out: &mut Vec<Vec3>) {
        let hw = self.width * 0.5;
        let hd = self.depth * 0.5;
        let h = self.height;

        out.reserve(HITBOX_SAMPLE_COUNT);
        for z in [0.0, h] {
            for (dx, dy) in [(-hw, -hd), (hw, -hd), (hw, hd), (-hw, hd)] {
                out.push(anchor + Vec3::new(dx, dy, z));
            }
        }
        for fraction in [0.25, 0.5, 0.75] {
            out.push(anchor + Vec3::new(0.0, 0.0, h * fraction));
        }
    }
}
