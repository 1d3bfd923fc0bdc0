use mclp_planner::domain::model::{ConstraintSense, Model};
use mclp_planner::{Result, Solution, SolveStatus, Solver, Tolerances};

/// Reference backend that tries every 0/1 assignment of a small model.
///
/// Ties keep the first optimum in ascending bitmask order.
pub struct EnumerationSolver;

impl Solver for EnumerationSolver {
    fn solve(&self, model: &Model, _tolerances: &Tolerances) -> Result<Solution> {
        let n_vars = model.n_variables();
        assert!(n_vars <= 20, "enumeration is limited to 20 variables");

        let mut best: Option<(f64, Vec<f64>)> = None;
        for mask in 0u32..(1 << n_vars) {
            let values: Vec<f64> = (0..n_vars)
                .map(|k| if mask & (1 << k) != 0 { 1.0 } else { 0.0 })
                .collect();
            if !satisfies(model, &values) {
                continue;
            }
            let objective: f64 = values.iter().zip(&model.objective).map(|(v, c)| v * c).sum();
            if best.as_ref().map_or(true, |(b, _)| objective > *b) {
                best = Some((objective, values));
            }
        }

        Ok(match best {
            Some((objective, values)) => Solution {
                status: SolveStatus::Optimal,
                objective,
                values,
                relative_gap: Some(0.0),
            },
            None => Solution::without_assignment(SolveStatus::Infeasible, n_vars),
        })
    }

    fn name(&self) -> &str {
        "enumeration"
    }
}

fn satisfies(model: &Model, values: &[f64]) -> bool {
    model.constraints.iter().all(|c| {
        let lhs: f64 = c.terms.iter().map(|&(k, coef)| coef as f64 * values[k]).sum();
        let rhs = c.rhs as f64;
        match c.sense {
            ConstraintSense::LessEqual => lhs <= rhs,
            ConstraintSense::GreaterEqual => lhs >= rhs,
            ConstraintSense::Equal => lhs == rhs,
        }
    })
}
