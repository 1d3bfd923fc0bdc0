use serde::{Deserialize, Serialize};

use crate::domain::extract::SelectedSite;

/// A candidate location with its demand weight.
///
/// `index` is 1-based and follows the order of the input records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub index: usize,
    pub x: i64,
    pub y: i64,
    pub demand: u64,
}

impl Site {
    pub fn new(index: usize, x: i64, y: i64, demand: u64) -> Self {
        Site { index, x, y, demand }
    }

    /// Euclidean distance to another site.
    ///
    /// Differences are taken in `f64` so coordinates anywhere in the `i64`
    /// range cannot overflow.
    pub fn distance_to(&self, other: &Site) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Sum of all demands, or `None` when it does not fit in a `u64`.
pub fn total_demand(sites: &[Site]) -> Option<u64> {
    sites.iter().try_fold(0u64, |acc, s| acc.checked_add(s.demand))
}

// ---------- API (wire) types: owned & serde-friendly ----------

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiSite {
    pub x: i64,
    pub y: i64,
    pub demand: u64,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct SolveRequest {
    pub sites: Vec<ApiSite>,
    pub radius: f64,
    pub facilities: usize,
}

impl SolveRequest {
    /// Number the request's sites 1..=n in the order given.
    pub fn to_sites(&self) -> Vec<Site> {
        self.sites
            .iter()
            .enumerate()
            .map(|(i, s)| Site::new(i + 1, s.x, s.y, s.demand))
            .collect()
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiSolution {
    pub status: String,
    pub objective: f64,
    pub facilities_placed: usize,
    pub clients_covered: usize,
    pub covered_demand: u64,
    pub total_demand: u64,
    pub relative_gap: Option<f64>,
    pub selected: Vec<SelectedSite>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiError {
    pub error: String,
}
