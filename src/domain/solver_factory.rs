use std::str::FromStr;

use crate::domain::solver::Solver;
use crate::domain::solvers::GlpkSolver;
use crate::error::MclpError;

#[cfg(feature = "highs-solver")]
use crate::domain::solvers::HighsSolver;

/// Available solver backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverType {
    Glpk,
    #[cfg(feature = "highs-solver")]
    Highs,
}

impl FromStr for SolverType {
    type Err = MclpError;

    /// Parse solver type from string (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "glpk" => Ok(SolverType::Glpk),
            #[cfg(feature = "highs-solver")]
            "highs" => Ok(SolverType::Highs),
            _ => Err(MclpError::SolverUnavailable(format!(
                "unknown or disabled solver backend '{}'",
                s
            ))),
        }
    }
}

/// Create a solver instance based on the specified type
pub fn create_solver(solver_type: SolverType) -> Box<dyn Solver> {
    match solver_type {
        SolverType::Glpk => Box::new(GlpkSolver::new()),
        #[cfg(feature = "highs-solver")]
        SolverType::Highs => Box::new(HighsSolver::new()),
    }
}
