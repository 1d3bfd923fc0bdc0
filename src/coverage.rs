//! Pairwise distances and per-site coverage sets.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;
use lru::LruCache;
use parking_lot::Mutex;

use crate::error::{MclpError, Result};
use crate::models::Site;

/// A dense n×n Euclidean distance matrix stored in row-major order.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Computes all pairwise distances between sites.
    pub fn from_sites(sites: &[Site]) -> Self {
        let n = sites.len();
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = sites[i].distance_to(&sites[j]);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }
        DistanceMatrix { data, size: n }
    }

    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

/// For every site `i` (0-based), the sorted indices `j` with `d(i, j) <= radius`.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageSets {
    sets: Vec<Vec<usize>>,
    radius: f64,
}

impl CoverageSets {
    /// Derives coverage sets with an inclusive threshold and no tolerance slack.
    pub fn build(distances: &DistanceMatrix, radius: f64) -> Result<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(MclpError::InvalidConfig(format!(
                "service radius must be finite and non-negative, got {}",
                radius
            )));
        }

        let n = distances.size();
        let sets: Vec<Vec<usize>> = (0..n)
            .map(|i| (0..n).filter(|&j| distances.get(i, j) <= radius).collect())
            .collect();

        debug!(
            "Built {} coverage sets for S = {} ({} pairs in range)",
            n,
            radius,
            sets.iter().map(Vec::len).sum::<usize>()
        );
        Ok(CoverageSets { sets, radius })
    }

    /// Sites covering (and covered by) site `i`.
    pub fn covering(&self, i: usize) -> &[usize] {
        &self.sets[i]
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.sets.iter().map(Vec::as_slice)
    }
}

/// Bounded cache of raw distance matrices keyed by coordinates file.
///
/// Raw distances do not depend on the radius, so a sweep over several
/// `(S, p)` pairs of one instance computes them once.
pub struct DistanceCache {
    entries: Mutex<LruCache<PathBuf, Arc<DistanceMatrix>>>,
}

impl DistanceCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        DistanceCache {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Returns the cached matrix for `key`, recomputing it when absent or
    /// when its size no longer matches `sites`.
    pub fn get_or_compute(&self, key: &Path, sites: &[Site]) -> Arc<DistanceMatrix> {
        let mut entries = self.entries.lock();
        if let Some(matrix) = entries.get(key) {
            if matrix.size() == sites.len() {
                return Arc::clone(matrix);
            }
        }

        let matrix = Arc::new(DistanceMatrix::from_sites(sites));
        entries.put(key.to_path_buf(), Arc::clone(&matrix));
        matrix
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DistanceCache {
    fn default() -> Self {
        DistanceCache::new(NonZeroUsize::MIN.saturating_add(3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scenario_sites() -> Vec<Site> {
        vec![
            Site::new(1, 0, 0, 5),
            Site::new(2, 1, 0, 3),
            Site::new(3, 0, 1, 2),
            Site::new(4, 5, 5, 10),
        ]
    }

    #[test]
    fn test_distance_matrix_from_sites() {
        let dm = DistanceMatrix::from_sites(&scenario_sites());
        assert_eq!(dm.size(), 4);
        assert_eq!(dm.get(0, 1), 1.0);
        assert!((dm.get(1, 2) - 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(dm.get(3, 3), 0.0);
    }

    #[test]
    fn test_coverage_sets_scenario() {
        let dm = DistanceMatrix::from_sites(&scenario_sites());
        let sets = CoverageSets::build(&dm, 1.5).unwrap();
        assert_eq!(sets.covering(0), &[0, 1, 2]);
        assert_eq!(sets.covering(1), &[0, 1, 2]);
        assert_eq!(sets.covering(2), &[0, 1, 2]);
        assert_eq!(sets.covering(3), &[3]);
    }

    #[test]
    fn test_coverage_boundary_is_inclusive() {
        let sites = vec![Site::new(1, 0, 0, 1), Site::new(2, 3, 4, 1)];
        let dm = DistanceMatrix::from_sites(&sites);
        let sets = CoverageSets::build(&dm, 5.0).unwrap();
        assert_eq!(sets.covering(0), &[0, 1]);
        let sets = CoverageSets::build(&dm, 4.999_999).unwrap();
        assert_eq!(sets.covering(0), &[0]);
    }

    #[test]
    fn test_zero_radius_covers_only_self() {
        let dm = DistanceMatrix::from_sites(&scenario_sites());
        let sets = CoverageSets::build(&dm, 0.0).unwrap();
        for (i, set) in sets.iter().enumerate() {
            assert_eq!(set, &[i]);
        }
    }

    #[test]
    fn test_coverage_given_extreme_coordinates_keeps_far_sites_apart() {
        let sites = vec![
            Site::new(1, i64::MIN, 0, 1),
            Site::new(2, i64::MAX, 0, 1),
            Site::new(3, i64::MAX, i64::MIN, 1),
        ];
        let dm = DistanceMatrix::from_sites(&sites);
        assert_eq!(dm.get(0, 1), 2f64.powi(64));
        let sets = CoverageSets::build(&dm, 1e18).unwrap();
        for (i, set) in sets.iter().enumerate() {
            assert_eq!(set, &[i]);
        }
    }

    #[test]
    fn test_invalid_radius_rejected() {
        let dm = DistanceMatrix::from_sites(&scenario_sites());
        assert!(CoverageSets::build(&dm, -1.0).is_err());
        assert!(CoverageSets::build(&dm, f64::NAN).is_err());
        assert!(CoverageSets::build(&dm, f64::INFINITY).is_err());
    }

    #[test]
    fn test_distance_cache_reuses_and_refreshes() {
        let cache = DistanceCache::default();
        let sites = scenario_sites();
        let key = Path::new("input/a.dat");

        let first = cache.get_or_compute(key, &sites);
        let second = cache.get_or_compute(key, &sites);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        let fewer = &sites[..2];
        let third = cache.get_or_compute(key, fewer);
        assert_eq!(third.size(), 2);
        assert!(!Arc::ptr_eq(&first, &third));
    }

    proptest! {
        #[test]
        fn prop_coverage_is_symmetric_and_reflexive(
            coords in prop::collection::vec((-50i64..50, -50i64..50), 1..25),
            radius in 0.0f64..40.0,
        ) {
            let sites: Vec<Site> = coords
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| Site::new(i + 1, x, y, 1))
                .collect();
            let dm = DistanceMatrix::from_sites(&sites);
            let sets = CoverageSets::build(&dm, radius).unwrap();

            for i in 0..sets.len() {
                prop_assert!(sets.covering(i).contains(&i));
                for &j in sets.covering(i) {
                    prop_assert!(sets.covering(j).contains(&i));
                }
            }
        }
    }
}
