//! Binary integer program for the maximal covering location problem.
//!
//! Two families of binary variables are laid out back to back: `x_j`
//! (a facility is placed at site j) at indices `0..n` and `y_i` (the demand
//! of site i is covered) at indices `n..2n`.

use crate::coverage::CoverageSets;
use crate::error::{MclpError, Result};
use crate::models::Site;

/// Variable bounds (lower, upper)
pub type Bound = (i32, i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintSense {
    LessEqual,
    GreaterEqual,
    Equal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub id: String,
    pub bound: Bound,
}

/// `Σ coefficient · variable (sense) rhs`, with terms as `(variable index, coefficient)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub name: String,
    pub terms: Vec<(usize, i32)>,
    pub sense: ConstraintSense,
    pub rhs: i32,
}

#[derive(Debug, Clone)]
pub struct Model {
    pub name: String,
    pub variables: Vec<Variable>,
    /// Objective coefficient per variable, same order as `variables`.
    /// Always maximized.
    pub objective: Vec<f64>,
    pub constraints: Vec<LinearConstraint>,
    pub(crate) n_sites: usize,
}

impl Model {
    /// Index of the facility variable for 0-based site `j`.
    pub fn x(&self, j: usize) -> usize {
        j
    }

    /// Index of the coverage variable for 0-based site `i`.
    pub fn y(&self, i: usize) -> usize {
        self.n_sites + i
    }

    pub fn n_sites(&self) -> usize {
        self.n_sites
    }

    pub fn n_variables(&self) -> usize {
        self.variables.len()
    }
}

/// Formulates the MCLP for exactly `facilities` sites.
///
/// maximize Σ demand_i · y_i
/// s.t.     Σ_j x_j = p
///          Σ_{j ∈ N(i)} x_j − y_i ≥ 0   for every site i
///
/// A second constraint `y_i ≤ Σ_{j ∈ N(i)} x_j` would be the same inequality
/// and is not added.
pub fn build_model(sites: &[Site], coverage: &CoverageSets, facilities: usize) -> Result<Model> {
    let n = sites.len();
    if coverage.len() != n {
        return Err(MclpError::InvalidModel(format!(
            "{} coverage sets for {} sites",
            coverage.len(),
            n
        )));
    }
    if facilities > n {
        return Err(MclpError::InfeasibleModel {
            facilities,
            radius: coverage.radius(),
        });
    }
    let p = i32::try_from(facilities).map_err(|_| {
        MclpError::InvalidModel(format!("facility count {} exceeds i32 range", facilities))
    })?;

    let mut variables = Vec::with_capacity(2 * n);
    variables.extend(sites.iter().map(|s| Variable {
        id: format!("x_{}", s.index),
        bound: (0, 1),
    }));
    variables.extend(sites.iter().map(|s| Variable {
        id: format!("y_{}", s.index),
        bound: (0, 1),
    }));

    let mut objective = vec![0.0; 2 * n];
    for (i, site) in sites.iter().enumerate() {
        objective[n + i] = site.demand as f64;
    }

    let mut constraints = Vec::with_capacity(n + 1);
    constraints.push(LinearConstraint {
        name: "facility_count".to_string(),
        terms: (0..n).map(|j| (j, 1)).collect(),
        sense: ConstraintSense::Equal,
        rhs: p,
    });
    for (i, site) in sites.iter().enumerate() {
        let mut terms: Vec<(usize, i32)> = coverage.covering(i).iter().map(|&j| (j, 1)).collect();
        terms.push((n + i, -1));
        constraints.push(LinearConstraint {
            name: format!("cover_{}", site.index),
            terms,
            sense: ConstraintSense::GreaterEqual,
            rhs: 0,
        });
    }

    Ok(Model {
        name: format!("mclp-p{}-S{}", facilities, coverage.radius()),
        variables,
        objective,
        constraints,
        n_sites: n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::DistanceMatrix;

    fn scenario() -> (Vec<Site>, CoverageSets) {
        let sites = vec![
            Site::new(1, 0, 0, 5),
            Site::new(2, 1, 0, 3),
            Site::new(3, 0, 1, 2),
            Site::new(4, 5, 5, 10),
        ];
        let coverage = CoverageSets::build(&DistanceMatrix::from_sites(&sites), 1.5).unwrap();
        (sites, coverage)
    }

    #[test]
    fn test_build_model_counts() {
        let (sites, coverage) = scenario();
        let model = build_model(&sites, &coverage, 1).unwrap();
        assert_eq!(model.n_variables(), 8);
        assert_eq!(model.constraints.len(), 5);
        assert!(model.variables.iter().all(|v| v.bound == (0, 1)));
        assert_eq!(model.variables[model.x(0)].id, "x_1");
        assert_eq!(model.variables[model.y(3)].id, "y_4");
    }

    #[test]
    fn test_build_model_objective_weights_only_coverage_variables() {
        let (sites, coverage) = scenario();
        let model = build_model(&sites, &coverage, 1).unwrap();
        assert_eq!(model.objective, vec![0.0, 0.0, 0.0, 0.0, 5.0, 3.0, 2.0, 10.0]);
    }

    #[test]
    fn test_build_model_facility_count_constraint() {
        let (sites, coverage) = scenario();
        let model = build_model(&sites, &coverage, 2).unwrap();
        let count = &model.constraints[0];
        assert_eq!(count.sense, ConstraintSense::Equal);
        assert_eq!(count.rhs, 2);
        assert_eq!(count.terms, vec![(0, 1), (1, 1), (2, 1), (3, 1)]);
    }

    #[test]
    fn test_build_model_one_coverage_constraint_per_site() {
        let (sites, coverage) = scenario();
        let model = build_model(&sites, &coverage, 1).unwrap();

        let cover_1 = &model.constraints[1];
        assert_eq!(cover_1.name, "cover_1");
        assert_eq!(cover_1.sense, ConstraintSense::GreaterEqual);
        assert_eq!(cover_1.rhs, 0);
        assert_eq!(cover_1.terms, vec![(0, 1), (1, 1), (2, 1), (4, -1)]);

        let cover_4 = &model.constraints[4];
        assert_eq!(cover_4.terms, vec![(3, 1), (7, -1)]);

        let cover_constraints = model
            .constraints
            .iter()
            .filter(|c| c.name.starts_with("cover_"))
            .count();
        assert_eq!(cover_constraints, sites.len());
    }

    #[test]
    fn test_build_model_rejects_too_many_facilities() {
        let (sites, coverage) = scenario();
        let err = build_model(&sites, &coverage, 5).unwrap_err();
        assert!(matches!(err, MclpError::InfeasibleModel { facilities: 5, .. }));
    }

    #[test]
    fn test_build_model_accepts_zero_and_all_facilities() {
        let (sites, coverage) = scenario();
        assert_eq!(build_model(&sites, &coverage, 0).unwrap().constraints[0].rhs, 0);
        assert_eq!(build_model(&sites, &coverage, 4).unwrap().constraints[0].rhs, 4);
    }

    #[test]
    fn test_build_model_rejects_mismatched_coverage() {
        let (sites, coverage) = scenario();
        assert!(matches!(
            build_model(&sites[..3], &coverage, 1),
            Err(MclpError::InvalidModel(_))
        ));
    }
}
