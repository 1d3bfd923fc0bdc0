use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::model::Model;
use crate::error::Result;

/// Numerical tolerance policy handed to the solver with every model.
///
/// Zero gap targets make the search run until optimality is proven, which
/// has no runtime bound on hard instances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub feasibility: f64,
    pub integrality: f64,
    pub absolute_gap: f64,
    pub relative_gap: f64,
    pub lower_cutoff: f64,
    pub upper_cutoff: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Tolerances {
            feasibility: 1e-9,
            integrality: 1e-9,
            absolute_gap: 0.0,
            relative_gap: 0.0,
            lower_cutoff: f64::NEG_INFINITY,
            upper_cutoff: f64::INFINITY,
        }
    }
}

impl Tolerances {
    pub fn has_cutoff(&self) -> bool {
        self.lower_cutoff.is_finite() || self.upper_cutoff.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveStatus {
    Optimal,
    Feasible,
    Infeasible,
    Unbounded,
    NoSolution,
}

impl SolveStatus {
    /// Whether the solver returned an assignment that satisfies the model.
    pub fn has_assignment(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Feasible => "feasible",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::NoSolution => "no solution",
        };
        f.write_str(s)
    }
}

/// Raw result of one solver invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub status: SolveStatus,
    pub objective: f64,
    /// One value per model variable, in model order.
    pub values: Vec<f64>,
    /// Upper bound on the achieved relative gap, when the backend proves one.
    ///
    /// GLPK always searches to a zero gap, so its optimal results carry `0`.
    /// HiGHS results carry the configured `mip_rel_gap` target, which the
    /// achieved gap never exceeds once the status is optimal.
    pub relative_gap: Option<f64>,
}

impl Solution {
    /// A result carrying no assignment.
    pub fn without_assignment(status: SolveStatus, n_variables: usize) -> Self {
        Solution {
            status,
            objective: f64::NAN,
            values: vec![0.0; n_variables],
            relative_gap: None,
        }
    }
}

/// Common interface for MILP backends
pub trait Solver: Send + Sync {
    /// Solve a binary integer program under the given tolerance policy.
    ///
    /// Returns `Err` only when the backend itself fails; infeasibility and
    /// missing solutions are reported through [`Solution::status`].
    fn solve(&self, model: &Model, tolerances: &Tolerances) -> Result<Solution>;

    /// Get the solver name for logging/debugging
    fn name(&self) -> &str;
}
