//! Level geometry loading and per-map detector sharing

pub mod cache;
pub mod mesh;

pub use cache::DetectorCache;
pub use mesh::{mesh_path, TriangleMesh, MESH_FILE_EXTENSION, TRIANGLE_RECORD_SIZE};
