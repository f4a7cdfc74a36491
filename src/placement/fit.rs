use std::collections::HashMap;

use crate::math::aabb_3d::Aabb;
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::operations::query::PlacementRegion;
use crate::scene::{ArtworkKey, TargetMesh};

use super::pose::DecalSize;

/// Bounds and step of the legal-scale scan.
#[derive(Debug, Clone, Copy)]
pub struct FitParams {
    /// Smallest scale considered, also the fallback result.
    pub floor: f64,
    /// Largest scale considered.
    pub ceiling: f64,
    /// Increment between tested scales.
    pub step: f64,
    /// Per-axis slack added to the placement region before testing.
    pub tolerance: Vector3,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            floor: 1.0,
            ceiling: 1.7,
            step: 0.05,
            tolerance: Vector3::new(0.3, 0.3, 4.0),
        }
    }
}

/// Per-artwork cache of fit-search results.
///
/// Owned by the placement session and passed by reference; the scan counter
/// makes cache hits observable from tests.
#[derive(Debug, Default)]
pub struct ScaleCache {
    entries: HashMap<ArtworkKey, f64>,
    scans: usize,
}

impl ScaleCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached scale for an artwork, if any.
    #[must_use]
    pub fn get(&self, key: &ArtworkKey) -> Option<f64> {
        self.entries.get(key).copied()
    }

    /// Drops all cached results.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of full scans performed; cache hits leave it unchanged.
    #[must_use]
    pub fn scan_count(&self) -> usize {
        self.scans
    }

    fn record(&mut self, key: ArtworkKey, scale: f64) {
        self.scans += 1;
        self.entries.insert(key, scale);
    }
}

/// Finds the largest decal scale that stays inside the placement region.
///
/// The scan is a fixed-step sweep from the floor: the legal range is narrow
/// and a linear scan keeps every tested scale reproducible. The first scale
/// beyond tolerance halts the sweep and the previous one wins; a floor that
/// is already out of bounds is returned unchanged.
pub struct FindMaxScale {
    point: Point3,
    aspect: f64,
    params: FitParams,
}

impl FindMaxScale {
    /// Creates the search for a placement point and artwork aspect ratio.
    #[must_use]
    pub fn new(point: Point3, aspect: f64) -> Self {
        Self {
            point,
            aspect,
            params: FitParams::default(),
        }
    }

    /// Overrides the scan bounds and tolerances.
    #[must_use]
    pub fn with_params(mut self, params: FitParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the search, consulting and filling the cache.
    #[must_use]
    pub fn execute(&self, target: &TargetMesh, cache: &mut ScaleCache, key: &ArtworkKey) -> f64 {
        if let Some(cached) = cache.get(key) {
            tracing::debug!("fit scan cache hit for {}: {cached}", key.as_str());
            return cached;
        }

        let region = PlacementRegion::new().execute(target);
        let fits = |scale: f64| {
            let half = DecalSize::derive(&target.aabb(), self.aspect, scale).half_extents();
            let test = Aabb::new(self.point - half, self.point + half);
            region.contains_with_margin(&test, self.params.tolerance)
        };

        let mut best = self.params.floor;
        if fits(self.params.floor) {
            let mut scale = self.params.floor + self.params.step;
            while scale <= self.params.ceiling + TOLERANCE && fits(scale) {
                best = scale;
                scale += self.params.step;
            }
        }

        tracing::debug!("fit scan for {} settled on {best}", key.as_str());
        cache.record(key.clone(), best);
        best
    }
}
