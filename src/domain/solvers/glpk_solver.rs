use log::{debug, warn};

use crate::convert::{to_glpk_objective, to_glpk_polyhedron};
use crate::domain::model::Model;
use crate::domain::solver::{Solution, SolveStatus, Solver, Tolerances};
use crate::error::Result;

use glpk_rust::{solve_ilps as glpk_solve_ilps, Solution as GlpkSolution};

const MAXIMIZE: bool = true;
const NO_PRESOLVE: bool = false;
const NO_TERMINAL_OUTPUT: bool = false;

/// GLPK solver implementation
///
/// GLPK runs branch-and-cut with its built-in tolerances and a zero relative
/// MIP gap, so every optimal status it returns is proven.
pub struct GlpkSolver;

impl GlpkSolver {
    pub fn new() -> Self {
        GlpkSolver
    }

    fn report_ignored_tolerances(tolerances: &Tolerances) {
        let defaults = Tolerances::default();
        if tolerances.feasibility != defaults.feasibility
            || tolerances.integrality != defaults.integrality
        {
            warn!(
                "GLPK backend uses its built-in feasibility/integrality tolerances; \
                 requested {:e}/{:e} ignored",
                tolerances.feasibility, tolerances.integrality
            );
        }
        if tolerances.absolute_gap > 0.0 || tolerances.relative_gap > 0.0 {
            warn!("GLPK backend always searches to a zero gap; gap targets ignored");
        }
        if tolerances.has_cutoff() {
            warn!("GLPK backend does not support objective cutoffs; cutoffs ignored");
        }
    }
}

impl Default for GlpkSolver {
    fn default() -> Self {
        GlpkSolver::new()
    }
}

impl Solver for GlpkSolver {
    fn solve(&self, model: &Model, tolerances: &Tolerances) -> Result<Solution> {
        Self::report_ignored_tolerances(tolerances);

        let n_vars = model.n_variables();
        let objective = to_glpk_objective(model);

        // Solver expects &mut
        let mut polyhedron = to_glpk_polyhedron(model);

        let lib_solutions: Vec<GlpkSolution> =
            glpk_solve_ilps(
            &mut polyhedron,
            vec![objective],
            MAXIMIZE,
            NO_PRESOLVE,
            NO_TERMINAL_OUTPUT,
        );

        let Some(lib_solution) = lib_solutions.into_iter().next() else {
            warn!("GLPK returned no result for model {}", model.name);
            return Ok(Solution::without_assignment(SolveStatus::NoSolution, n_vars));
        };

        if let Some(error) = &lib_solution.error {
            warn!("GLPK reported for model {}: {}", model.name, error);
        }

        let status = SolveStatus::from(lib_solution.status);
        debug!("GLPK finished model {} with status {}", model.name, status);
        if !status.has_assignment() {
            return Ok(Solution::without_assignment(status, n_vars));
        }

        let values: Vec<f64> = model
            .variables
            .iter()
            .map(|v| {
                lib_solution
                    .solution
                    .get(v.id.as_str())
                    .map(|&value| f64::from(value))
                    .unwrap_or(0.0)
            })
            .collect();

        Ok(Solution {
            status,
            objective: lib_solution.objective,
            values,
            relative_gap: (status == SolveStatus::Optimal).then_some(0.0),
        })
    }

    fn name(&self) -> &str {
        "GLPK"
    }
}
