//! `.tri` level-geometry loader
//!
//! A `.tri` file is a flat sequence of 36-byte records, each nine
//! little-endian IEEE-754 `f32` values ordered
//! `(v0.x, v0.y, v0.z, v1.x, v1.y, v1.z, v2.x, v2.y, v2.z)`. There is no
//! header. A trailing record shorter than 36 bytes is skipped.
//!
//! Triangles with any NaN or infinite coordinate are dropped while loading, so
//! every triangle in a [`TriangleMesh`] is finite.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::MeshError;
use crate::geometry::Triangle;

/// Size of one triangle record in bytes.
pub const TRIANGLE_RECORD_SIZE: usize = 36;

/// File extension of mesh files.
pub const MESH_FILE_EXTENSION: &str = "tri";

/// Immutable triangle list for one map.
///
/// Read-only after construction; share it across threads behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    triangles: Vec<Triangle>,
    dropped: usize,
}

/// Path of the mesh file for `map_name` inside `dir`.
///
/// # Errors
/// Returns [`MeshError::InvalidMapName`] if the name is empty or contains a
/// path separator.
pub fn mesh_path(dir: &Path, map_name: &str) -> Result<PathBuf, MeshError> {
    if map_name.is_empty() || map_name.contains(['/', '\\']) || map_name == ".." {
        return Err(MeshError::InvalidMapName(map_name.to_string()));
    }
    Ok(dir.join(format!("{map_name}.{MESH_FILE_EXTENSION}")))
}

impl TriangleMesh {
    /// Load `<dir>/<map_name>.tri`.
    ///
    /// # Errors
    /// Returns error if the map name is invalid or the file cannot be read
    pub fn load(dir: impl AsRef<Path>, map_name: &str) -> Result<Self, MeshError> {
        let path = mesh_path(dir.as_ref(), map_name)?;
        Self::load_file(&path)
    }

    /// Load a mesh from an explicit file path.
    ///
    /// # Errors
    /// Returns error if the file cannot be read
    pub fn load_file(path: &Path) -> Result<Self, MeshError> {
        let data = std::fs::read(path).map_err(|source| MeshError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mesh = Self::from_bytes(&data);
        info!(
            "Loaded mesh {}: {} triangles ({} bytes)",
            path.display(),
            mesh.len(),
            data.len()
        );
        Ok(mesh)
    }

    /// Parse a mesh from an in-memory `.tri` buffer.
    pub fn from_bytes(data: &[u8]) -> Self {
        let records = data.chunks_exact(TRIANGLE_RECORD_SIZE);
        let trailing = records.remainder().len();
        if trailing > 0 {
            debug!("Skipping {trailing}-byte partial triangle record at end of mesh");
        }

        Self::from_triangles(records.map(parse_record))
    }

    /// Build a mesh from already-decoded triangles, dropping non-finite ones.
    pub fn from_triangles(triangles: impl IntoIterator<Item = Triangle>) -> Self {
        let mut dropped = 0;
        let triangles: Vec<Triangle> = triangles
            .into_iter()
            .filter(|tri| {
                let keep = tri.is_finite();
                if !keep {
                    dropped += 1;
                }
                keep
            })
            .collect();

        if dropped > 0 {
            warn!("Dropped {dropped} triangles with non-finite vertices");
        }

        Self { triangles, dropped }
    }

    /// All triangles of the mesh
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Number of triangles kept
    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// `true` when the mesh has no triangles
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Number of triangles discarded for non-finite coordinates
    pub fn dropped_count(&self) -> usize {
        self.dropped
    }
}

/// Decode one 36-byte record.
fn parse_record(record: &[u8]) -> Triangle {
    let mut coords = [0.0_f32; 9];
    for (i, c) in coords.iter_mut().enumerate() {
        let o = i * 4;
        *c = f32::from_le_bytes([record[o], record[o + 1], record[o + 2], record[o + 3]]);
    }
    Triangle::from_coords(coords)
}
