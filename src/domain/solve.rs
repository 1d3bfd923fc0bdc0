use log::info;

use crate::coverage::{CoverageSets, DistanceMatrix};
use crate::domain::extract::{extract, Extraction};
use crate::domain::model::build_model;
use crate::domain::solver::{Solution, SolveStatus, Solver, Tolerances};
use crate::domain::validate::{validate_model, validate_tolerances};
use crate::error::{MclpError, Result};
use crate::models::{total_demand, Site};

#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub solution: Solution,
    pub extraction: Extraction,
}

/// Formulate, solve and interpret one `(S, p)` configuration.
pub fn solve_mclp(
    sites: &[Site],
    distances: &DistanceMatrix,
    radius: f64,
    facilities: usize,
    solver: &dyn Solver,
    tolerances: &Tolerances,
) -> Result<SolveOutcome> {
    validate_tolerances(tolerances)?;
    if total_demand(sites).is_none() {
        return Err(MclpError::format("sites", "total demand exceeds the u64 range"));
    }

    let coverage = CoverageSets::build(distances, radius)?;
    let model = build_model(sites, &coverage, facilities)?;
    validate_model(&model)?;

    info!(
        "Solving {} with {}: {} variables, {} constraints, feasibility {:e}, integrality {:e}, \
         abs gap {}, rel gap {}",
        model.name,
        solver.name(),
        model.n_variables(),
        model.constraints.len(),
        tolerances.feasibility,
        tolerances.integrality,
        tolerances.absolute_gap,
        tolerances.relative_gap
    );

    let solution = solver.solve(&model, tolerances)?;
    match solution.status {
        SolveStatus::Infeasible => {
            return Err(MclpError::InfeasibleModel { facilities, radius });
        }
        status if !status.has_assignment() => {
            return Err(MclpError::NoSolutionFound { status });
        }
        _ => {}
    }

    let extraction = extract(&model, &solution, sites);
    extraction.verify(&solution, facilities)?;

    if let Some(gap) = solution.relative_gap {
        info!("Relative gap: {:.16}", gap);
    }

    Ok(SolveOutcome {
        solution,
        extraction,
    })
}
