use log::{debug, warn};

use crate::domain::model::{ConstraintSense, Model};
use crate::domain::solver::{Solution, SolveStatus, Solver, Tolerances};
use crate::error::Result;

use ::highs::{Col, HighsModelStatus, RowProblem, Sense};

/// HiGHS solver implementation
pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        HighsSolver
    }

    /// Convert HiGHS status to our status
    fn convert_status(model_status: HighsModelStatus) -> SolveStatus {
        match model_status {
            HighsModelStatus::Optimal | HighsModelStatus::ModelEmpty => SolveStatus::Optimal,
            HighsModelStatus::Infeasible => SolveStatus::Infeasible,
            HighsModelStatus::UnboundedOrInfeasible | HighsModelStatus::Unbounded => {
                SolveStatus::Unbounded
            }
            _ => SolveStatus::NoSolution,
        }
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        HighsSolver::new()
    }
}

impl Solver for HighsSolver {
    fn solve(&self, model: &Model, tolerances: &Tolerances) -> Result<Solution> {
        let mut problem = RowProblem::new();

        let cols: Vec<Col> = model
            .variables
            .iter()
            .zip(&model.objective)
            .map(|(var, &coef)| {
                let (lower, upper) = var.bound;
                problem.add_integer_column(coef, lower as f64..=upper as f64)
            })
            .collect();

        for constraint in &model.constraints {
            let terms: Vec<(Col, f64)> = constraint
                .terms
                .iter()
                .map(|&(col, coef)| (cols[col], coef as f64))
                .collect();
            let rhs = constraint.rhs as f64;
            match constraint.sense {
                ConstraintSense::LessEqual => {
                    problem.add_row(..=rhs, terms);
                }
                ConstraintSense::GreaterEqual => {
                    problem.add_row(rhs.., terms);
                }
                ConstraintSense::Equal => {
                    problem.add_row(rhs..=rhs, terms);
                }
            }
        }

        let mut highs = problem.optimise(Sense::Maximise);
        highs.set_option("output_flag", false);
        highs.set_option("primal_feasibility_tolerance", tolerances.feasibility);
        highs.set_option("mip_feasibility_tolerance", tolerances.integrality);
        highs.set_option("mip_abs_gap", tolerances.absolute_gap);
        highs.set_option("mip_rel_gap", tolerances.relative_gap);
        if tolerances.has_cutoff() {
            warn!("HiGHS backend does not support objective cutoffs; cutoffs ignored");
        }

        let solved = highs.solve();
        let status = Self::convert_status(solved.status());
        debug!("HiGHS finished model {} with status {}", model.name, status);
        if !status.has_assignment() {
            return Ok(Solution::without_assignment(status, model.n_variables()));
        }

        let values: Vec<f64> = solved.get_solution().columns().to_vec();

        // Calculate objective value
        let objective: f64 = values
            .iter()
            .zip(&model.objective)
            .map(|(value, coef)| value.round() * coef)
            .sum();

        Ok(Solution {
            status,
            objective,
            values,
            // The bindings do not expose the achieved MIP gap; an optimal
            // status guarantees it is within the configured target.
            relative_gap: (status == SolveStatus::Optimal).then_some(tolerances.relative_gap),
        })
    }

    fn name(&self) -> &str {
        "HiGHS"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::{CoverageSets, DistanceMatrix};
    use crate::domain::model::build_model;
    use crate::models::Site;

    #[test]
    fn test_highs_solves_scenario() {
        let sites = vec![
            Site::new(1, 0, 0, 5),
            Site::new(2, 1, 0, 3),
            Site::new(3, 0, 1, 2),
            Site::new(4, 5, 5, 10),
        ];
        let coverage = CoverageSets::build(&DistanceMatrix::from_sites(&sites), 1.5).unwrap();
        let model = build_model(&sites, &coverage, 2).unwrap();
        let solution = HighsSolver::new()
            .solve(&model, &Tolerances::default())
            .unwrap();
        assert_eq!(solution.status, SolveStatus::Optimal);
        assert_eq!(solution.objective, 20.0);
    }

    #[test]
    fn test_highs_reports_gap_target_as_bound() {
        let sites = vec![Site::new(1, 0, 0, 5), Site::new(2, 9, 9, 7)];
        let coverage = CoverageSets::build(&DistanceMatrix::from_sites(&sites), 1.0).unwrap();
        let model = build_model(&sites, &coverage, 1).unwrap();
        let tolerances = Tolerances {
            relative_gap: 0.05,
            ..Tolerances::default()
        };
        let solution = HighsSolver::new().solve(&model, &tolerances).unwrap();
        assert_eq!(solution.status, SolveStatus::Optimal);
        assert_eq!(solution.relative_gap, Some(0.05));
    }

    #[test]
    fn test_highs_name() {
        assert_eq!(HighsSolver::new().name(), "HiGHS");
    }
}
