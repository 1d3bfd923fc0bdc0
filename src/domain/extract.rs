//! Interpretation of raw solver assignments.

use serde::{Deserialize, Serialize};

use crate::domain::model::Model;
use crate::domain::solver::Solution;
use crate::error::{MclpError, Result};
use crate::models::{total_demand, Site};

/// A solved value above this counts as 1 for a binary variable.
pub const BINARY_THRESHOLD: f64 = 0.5;

/// A site chosen to host a facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedSite {
    pub index: usize,
    pub x: i64,
    pub y: i64,
    pub demand: u64,
}

impl From<&Site> for SelectedSite {
    fn from(site: &Site) -> Self {
        SelectedSite {
            index: site.index,
            x: site.x,
            y: site.y,
            demand: site.demand,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub facilities_placed: usize,
    pub clients_covered: usize,
    pub covered_demand: u64,
    pub total_demand: u64,
    /// Selected sites in ascending index order.
    pub placement: Vec<SelectedSite>,
}

impl Extraction {
    /// Checks `Σ x = p` and that the objective equals the covered demand.
    pub fn verify(&self, solution: &Solution, facilities: usize) -> Result<()> {
        if self.facilities_placed != facilities {
            return Err(MclpError::InconsistentSolution(format!(
                "{} facilities placed, {} required",
                self.facilities_placed, facilities
            )));
        }

        let covered = self.covered_demand as f64;
        let scale = solution.objective.abs().max(1.0);
        let matches = (solution.objective - covered).abs() <= 1e-6 * scale;
        if !matches {
            return Err(MclpError::InconsistentSolution(format!(
                "objective {} differs from covered demand {}",
                solution.objective, self.covered_demand
            )));
        }

        Ok(())
    }
}

/// Pure reading of a solution against its model and sites.
///
/// Demand sums saturate at `u64::MAX`; callers reject overflowing inputs first.
pub fn extract(model: &Model, solution: &Solution, sites: &[Site]) -> Extraction {
    let is_set = |index: usize| {
        solution
            .values
            .get(index)
            .is_some_and(|&v| v > BINARY_THRESHOLD)
    };

    let placement: Vec<SelectedSite> = sites
        .iter()
        .enumerate()
        .filter(|(j, _)| is_set(model.x(*j)))
        .map(|(_, site)| SelectedSite::from(site))
        .collect();

    let mut clients_covered = 0;
    let mut covered_demand = 0;
    for (i, site) in sites.iter().enumerate() {
        if is_set(model.y(i)) {
            clients_covered += 1;
            covered_demand = site.demand.saturating_add(covered_demand);
        }
    }

    Extraction {
        facilities_placed: placement.len(),
        clients_covered,
        covered_demand,
        total_demand: total_demand(sites).unwrap_or(u64::MAX),
        placement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::{CoverageSets, DistanceMatrix};
    use crate::domain::model::build_model;
    use crate::domain::solver::SolveStatus;

    fn scenario() -> (Vec<Site>, Model) {
        let sites = vec![
            Site::new(1, 0, 0, 5),
            Site::new(2, 1, 0, 3),
            Site::new(3, 0, 1, 2),
            Site::new(4, 5, 5, 10),
        ];
        let coverage = CoverageSets::build(&DistanceMatrix::from_sites(&sites), 1.5).unwrap();
        let model = build_model(&sites, &coverage, 1).unwrap();
        (sites, model)
    }

    fn solution(values: Vec<f64>, objective: f64) -> Solution {
        Solution {
            status: SolveStatus::Optimal,
            objective,
            values,
            relative_gap: Some(0.0),
        }
    }

    #[test]
    fn test_extract_reads_facilities_and_coverage() {
        let (sites, model) = scenario();
        let s = solution(vec![1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0], 10.0);
        let extraction = extract(&model, &s, &sites);

        assert_eq!(extraction.facilities_placed, 1);
        assert_eq!(extraction.clients_covered, 3);
        assert_eq!(extraction.covered_demand, 10);
        assert_eq!(extraction.total_demand, 20);
        assert_eq!(
            extraction.placement,
            vec![SelectedSite { index: 1, x: 0, y: 0, demand: 5 }]
        );
        assert!(extraction.verify(&s, 1).is_ok());
    }

    #[test]
    fn test_extract_applies_half_threshold() {
        let (sites, model) = scenario();
        let s = solution(vec![0.5, 0.0, 0.0, 0.999_999_9, 0.0, 0.0, 0.0, 0.6], 10.0);
        let extraction = extract(&model, &s, &sites);
        assert_eq!(extraction.placement.len(), 1);
        assert_eq!(extraction.placement[0].index, 4);
        assert_eq!(extraction.covered_demand, 10);
    }

    #[test]
    fn test_extract_orders_placement_by_index() {
        let (sites, model) = scenario();
        let s = solution(vec![0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0], 0.0);
        let indices: Vec<usize> = extract(&model, &s, &sites)
            .placement
            .iter()
            .map(|p| p.index)
            .collect();
        assert_eq!(indices, vec![2, 4]);
    }

    #[test]
    fn test_verify_rejects_wrong_facility_count() {
        let (sites, model) = scenario();
        let s = solution(vec![1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0], 10.0);
        let extraction = extract(&model, &s, &sites);
        assert!(matches!(
            extraction.verify(&s, 1),
            Err(MclpError::InconsistentSolution(_))
        ));
    }

    #[test]
    fn test_verify_rejects_objective_mismatch() {
        let (sites, model) = scenario();
        let s = solution(vec![1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0], 10.0);
        let extraction = extract(&model, &s, &sites);
        assert!(extraction.verify(&s, 1).is_err());

        let nan = solution(vec![1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0], f64::NAN);
        assert!(extract(&model, &nan, &sites).verify(&nan, 1).is_err());
    }
}
