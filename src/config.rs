//! Run configuration: sweep tables, file layout and solver tolerances.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use serde::{Deserialize, Serialize};

use crate::domain::solver::Tolerances;
use crate::domain::validate::validate_tolerances;
use crate::error::{MclpError, Result};

/// Facility counts to evaluate for one service radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadiusSweep {
    pub radius: f64,
    pub facilities: Vec<usize>,
}

/// All `(S, p)` pairs of one named instance, in declared order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceSweep {
    pub name: String,
    pub sweeps: Vec<RadiusSweep>,
}

impl InstanceSweep {
    /// `(radius, facilities)` pairs in declared order.
    pub fn pairs(&self) -> impl Iterator<Item = (f64, usize)> + '_ {
        self.sweeps
            .iter()
            .flat_map(|s| s.facilities.iter().map(move |&p| (s.radius, p)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub instances: Vec<InstanceSweep>,
}

impl SweepConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| MclpError::io(path, e))?;
        let config: SweepConfig = serde_json::from_str(&text).map_err(|e| {
            MclpError::InvalidConfig(format!("{}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.instances.is_empty() {
            return Err(MclpError::InvalidConfig("no instances configured".into()));
        }

        let mut names = HashSet::new();
        for instance in &self.instances {
            let name = instance.name.as_str();
            if name.is_empty() || name.contains(['/', '\\']) {
                return Err(MclpError::InvalidConfig(format!(
                    "invalid instance name '{}'",
                    name
                )));
            }
            if !names.insert(name) {
                return Err(MclpError::InvalidConfig(format!(
                    "instance '{}' configured twice",
                    name
                )));
            }
            if instance.sweeps.is_empty() {
                return Err(MclpError::InvalidConfig(format!(
                    "instance '{}' has no radius entries",
                    name
                )));
            }
            for sweep in &instance.sweeps {
                if !sweep.radius.is_finite() || sweep.radius < 0.0 {
                    return Err(MclpError::InvalidConfig(format!(
                        "instance '{}' has invalid radius {}",
                        name, sweep.radius
                    )));
                }
                if sweep.facilities.is_empty() {
                    return Err(MclpError::InvalidConfig(format!(
                        "instance '{}' radius {} has no facility counts",
                        name, sweep.radius
                    )));
                }
            }
        }

        Ok(())
    }

    /// Restrict the sweep to a single named instance.
    pub fn select(&self, name: &str) -> Result<SweepConfig> {
        self.instances
            .iter()
            .find(|i| i.name == name)
            .map(|i| SweepConfig {
                instances: vec![i.clone()],
            })
            .ok_or_else(|| MclpError::InvalidConfig(format!("instance '{}' not configured", name)))
    }
}

/// Input and output locations of a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepPaths {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl SweepPaths {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        SweepPaths {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn coordinates(&self, instance: &str) -> PathBuf {
        self.input_dir.join(format!("{}.dat", instance))
    }

    pub fn demands(&self, instance: &str) -> PathBuf {
        self.input_dir.join(format!("demand-{}.dat", instance))
    }

    pub fn selection_dir(&self) -> PathBuf {
        self.output_dir.join("mclp-selected-points")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.output_dir.join("mclp-log-files")
    }

    pub fn selection(&self, instance: &str, radius: f64, facilities: usize) -> PathBuf {
        self.selection_dir()
            .join(run_stem(instance, radius, facilities))
    }

    pub fn log(&self, instance: &str, radius: f64, facilities: usize) -> PathBuf {
        self.log_dir().join(run_stem(instance, radius, facilities))
    }
}

fn run_stem(instance: &str, radius: f64, facilities: usize) -> String {
    format!("mclp-{}-p{}-S{}", instance, facilities, radius)
}

/// Solver tolerance flags, each overridable through the environment.
#[derive(Debug, Clone, Args)]
pub struct ToleranceArgs {
    /// Primal feasibility tolerance
    #[arg(long, env = "MCLP_FEASIBILITY_TOL", default_value_t = 1e-9)]
    pub feasibility_tol: f64,

    /// Integrality tolerance
    #[arg(long, env = "MCLP_INTEGRALITY_TOL", default_value_t = 1e-9)]
    pub integrality_tol: f64,

    /// Absolute optimality-gap target; 0 demands a proven optimum
    #[arg(long, env = "MCLP_ABS_GAP", default_value_t = 0.0)]
    pub abs_gap: f64,

    /// Relative optimality-gap target; 0 demands a proven optimum
    #[arg(long, env = "MCLP_REL_GAP", default_value_t = 0.0)]
    pub rel_gap: f64,

    #[arg(long, env = "MCLP_LOWER_CUTOFF", default_value_t = f64::NEG_INFINITY, allow_hyphen_values = true)]
    pub lower_cutoff: f64,

    #[arg(long, env = "MCLP_UPPER_CUTOFF", default_value_t = f64::INFINITY, allow_hyphen_values = true)]
    pub upper_cutoff: f64,
}

impl ToleranceArgs {
    pub fn to_tolerances(&self) -> Result<Tolerances> {
        let tolerances = Tolerances {
            feasibility: self.feasibility_tol,
            integrality: self.integrality_tol,
            absolute_gap: self.abs_gap,
            relative_gap: self.rel_gap,
            lower_cutoff: self.lower_cutoff,
            upper_cutoff: self.upper_cutoff,
        };
        validate_tolerances(&tolerances)?;
        Ok(tolerances)
    }
}
