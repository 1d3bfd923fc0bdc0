use std::collections::HashMap;

use glpk_rust::{
    Bound, IntegerSparseMatrix as GlpkMatrix, SparseLEIntegerPolyhedron as GlpkPoly,
    Status as GlpkStatus, Variable as GlpkVar,
};

use crate::domain::model::{ConstraintSense, LinearConstraint, Model};
use crate::domain::solver::SolveStatus;

/// Convert a model to a GLPK LE polyhedron (A x <= b) borrowing the model's variable ids.
///
/// `>=` rows are negated and `=` rows become a `<=` and a negated `<=` row.
pub fn to_glpk_polyhedron(model: &Model) -> GlpkPoly<'_> {
    let mut a = GlpkMatrix {
        rows: Vec::new(),
        cols: Vec::new(),
        vals: Vec::new(),
    };
    let mut b: Vec<Bound> = Vec::new();

    for constraint in &model.constraints {
        match constraint.sense {
            ConstraintSense::LessEqual => push_le_row(&mut a, &mut b, constraint, 1),
            ConstraintSense::GreaterEqual => push_le_row(&mut a, &mut b, constraint, -1),
            ConstraintSense::Equal => {
                push_le_row(&mut a, &mut b, constraint, 1);
                push_le_row(&mut a, &mut b, constraint, -1);
            }
        }
    }

    let variables: Vec<GlpkVar<'_>> = model
        .variables
        .iter()
        .map(|v| GlpkVar {
            id: v.id.as_str(),
            bound: v.bound,
        })
        .collect();

    GlpkPoly {
        a,
        b,
        variables,
        double_bound: false,
    }
}

fn push_le_row(a: &mut GlpkMatrix, b: &mut Vec<Bound>, constraint: &LinearConstraint, sign: i32) {
    let row = b.len() as i32;
    for &(col, coef) in &constraint.terms {
        a.rows.push(row);
        a.cols.push(col as i32);
        a.vals.push(sign * coef);
    }
    b.push((0, sign * constraint.rhs));
}

/// Objective keyed by variable id, skipping zero coefficients.
pub fn to_glpk_objective(model: &Model) -> HashMap<&str, f64> {
    model
        .variables
        .iter()
        .zip(&model.objective)
        .filter(|(_, &coef)| coef != 0.0)
        .map(|(v, &coef)| (v.id.as_str(), coef))
        .collect()
}

impl From<GlpkStatus> for SolveStatus {
    fn from(s: GlpkStatus) -> Self {
        match s {
            GlpkStatus::Optimal => SolveStatus::Optimal,
            GlpkStatus::Feasible => SolveStatus::Feasible,
            GlpkStatus::Infeasible | GlpkStatus::NoFeasible => SolveStatus::Infeasible,
            GlpkStatus::Unbounded => SolveStatus::Unbounded,
            GlpkStatus::Undefined
            | GlpkStatus::SimplexFailed
            | GlpkStatus::MIPFailed
            | GlpkStatus::EmptySpace => SolveStatus::NoSolution,
        }
    }
}
