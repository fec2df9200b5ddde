//! One shared detector per map
//!
//! Rounds of the same map reuse a single immutable mesh. The first request for
//! a map loads `<mesh_dir>/<map>.tri`; a load failure is returned to the caller
//! and nothing is cached, so a later request retries the file.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::MeshError;
use crate::map::mesh::TriangleMesh;
use crate::visibility::{LosConfig, LosDetector};

/// Lazily populated map name → detector table.
#[derive(Debug)]
pub struct DetectorCache {
    mesh_dir: PathBuf,
    los_config: LosConfig,
    detectors: RwLock<FxHashMap<String, Arc<LosDetector>>>,
}

impl DetectorCache {
    /// Create an empty cache reading meshes from `mesh_dir`
    pub fn new(mesh_dir: impl Into<PathBuf>) -> Self {
        Self::with_config(mesh_dir, LosConfig::default())
    }

    /// Create an empty cache whose detectors use `los_config`
    pub fn with_config(mesh_dir: impl Into<PathBuf>, los_config: LosConfig) -> Self {
        Self {
            mesh_dir: mesh_dir.into(),
            los_config,
            detectors: RwLock::new(FxHashMap::default()),
        }
    }

    /// Detector for `map_name`, loading its mesh on first use.
    ///
    /// The mesh is read with no lock held, so lookups of other maps never
    /// wait on disk I/O. Two callers missing on the same map may both load
    /// it; the first insert wins and both get that detector.
    ///
    /// # Errors
    /// Returns error if the mesh file is missing or unreadable
    pub fn get_or_load(&self, map_name: &str) -> Result<Arc<LosDetector>, MeshError> {
        if let Some(detector) = self.get(map_name) {
            debug!("Detector cache hit for {map_name}");
            return Ok(detector);
        }

        debug!("Detector cache miss for {map_name}, loading mesh");
        let mesh = TriangleMesh::load(&self.mesh_dir, map_name)?;
        let loaded = Arc::new(LosDetector::with_config(Arc::new(mesh), self.los_config));

        let mut detectors = self
            .detectors
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let detector = detectors
            .entry(map_name.to_string())
            .or_insert_with(|| Arc::clone(&loaded));
        if !Arc::ptr_eq(detector, &loaded) {
            debug!("Concurrent load of {map_name} finished first, discarding ours");
        }
        Ok(Arc::clone(detector))
    }

    /// Cached detector for `map_name`, without loading
    pub fn get(&self, map_name: &str) -> Option<Arc<LosDetector>> {
        self.detectors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(map_name)
            .cloned()
    }

    /// Insert a detector built elsewhere (synthetic or preloaded meshes)
    pub fn insert(&self, map_name: impl Into<String>, detector: Arc<LosDetector>) {
        self.detectors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(map_name.into(), detector);
    }

    /// Drop the cached detector for `map_name`; returns whether one existed
    pub fn evict(&self, map_name: &str) -> bool {
        self.detectors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(map_name)
            .is_some()
    }

    /// Number of cached maps
    pub fn len(&self) -> usize {
        self.detectors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// `true` when no map is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
