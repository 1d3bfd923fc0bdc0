use crate::domain::model::Model;
use crate::domain::solver::Tolerances;
use crate::error::{MclpError, Result};

pub fn validate_model(model: &Model) -> Result<()> {
    let n_vars = model.variables.len();

    if model.objective.len() != n_vars {
        return Err(MclpError::InvalidModel(format!(
            "objective has {} coefficients for {} variables",
            model.objective.len(),
            n_vars
        )));
    }

    for variable in &model.variables {
        let (lower, upper) = variable.bound;
        if lower > upper {
            return Err(MclpError::InvalidModel(format!(
                "variable {} has bound ({}, {})",
                variable.id, lower, upper
            )));
        }
    }

    for constraint in &model.constraints {
        if let Some(&(index, _)) = constraint.terms.iter().find(|(index, _)| *index >= n_vars) {
            return Err(MclpError::InvalidModel(format!(
                "constraint {} references missing variable {}",
                constraint.name, index
            )));
        }
    }

    Ok(())
}

pub fn validate_tolerances(tolerances: &Tolerances) -> Result<()> {
    let non_negative = [
        ("feasibility tolerance", tolerances.feasibility),
        ("integrality tolerance", tolerances.integrality),
        ("absolute gap", tolerances.absolute_gap),
        ("relative gap", tolerances.relative_gap),
    ];
    for (name, value) in non_negative {
        if !value.is_finite() || value < 0.0 {
            return Err(MclpError::InvalidConfig(format!(
                "{} must be finite and non-negative, got {}",
                name, value
            )));
        }
    }

    if tolerances.lower_cutoff.is_nan()
        || tolerances.upper_cutoff.is_nan()
        || tolerances.lower_cutoff > tolerances.upper_cutoff
    {
        return Err(MclpError::InvalidConfig(format!(
            "objective cutoffs [{}, {}] are not an interval",
            tolerances.lower_cutoff, tolerances.upper_cutoff
        )));
    }

    Ok(())
}
