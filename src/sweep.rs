//! Drives the full pipeline for every `(S, p)` pair of a sweep configuration.

use std::fs;
use std::io::ErrorKind;

use log::{error, info, warn};

use crate::config::{InstanceSweep, SweepConfig, SweepPaths};
use crate::coverage::DistanceCache;
use crate::domain::solve::{solve_mclp, SolveOutcome};
use crate::domain::solver::{SolveStatus, Solver, Tolerances};
use crate::error::{MclpError, Result};
use crate::input::load_sites;
use crate::output::write_selected_sites_file;
use crate::run_log::RunLogger;

/// Summary of a successful iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationSummary {
    pub status: SolveStatus,
    pub objective: f64,
    pub facilities_placed: usize,
    pub clients_covered: usize,
    pub covered_demand: u64,
    pub total_demand: u64,
}

impl From<&SolveOutcome> for IterationSummary {
    fn from(outcome: &SolveOutcome) -> Self {
        IterationSummary {
            status: outcome.solution.status,
            objective: outcome.solution.objective,
            facilities_placed: outcome.extraction.facilities_placed,
            clients_covered: outcome.extraction.clients_covered,
            covered_demand: outcome.extraction.covered_demand,
            total_demand: outcome.extraction.total_demand,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IterationReport {
    pub instance: String,
    pub radius: f64,
    pub facilities: usize,
    /// The summary, or the text of the error that skipped this iteration.
    pub outcome: std::result::Result<IterationSummary, String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepReport {
    pub iterations: Vec<IterationReport>,
}

impl SweepReport {
    pub fn successes(&self) -> impl Iterator<Item = &IterationReport> {
        self.iterations.iter().filter(|r| r.outcome.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &IterationReport> {
        self.iterations.iter().filter(|r| r.outcome.is_err())
    }
}

pub struct SweepOrchestrator<'a> {
    solver: &'a dyn Solver,
    tolerances: Tolerances,
    paths: SweepPaths,
    distances: DistanceCache,
}

impl<'a> SweepOrchestrator<'a> {
    pub fn new(solver: &'a dyn Solver, tolerances: Tolerances, paths: SweepPaths) -> Self {
        SweepOrchestrator {
            solver,
            tolerances,
            paths,
            distances: DistanceCache::default(),
        }
    }

    pub fn paths(&self) -> &SweepPaths {
        &self.paths
    }

    /// Run every instance of the configuration.
    ///
    /// Only fatal errors are returned; iteration-local failures are logged
    /// and listed in the report.
    pub fn run(&self, config: &SweepConfig) -> Result<SweepReport> {
        config.validate()?;
        let mut report = SweepReport::default();
        for instance in &config.instances {
            report.iterations.extend(self.run_instance(instance)?.iterations);
        }
        Ok(report)
    }

    pub fn run_instance(&self, instance: &InstanceSweep) -> Result<SweepReport> {
        self.prepare_output_dirs()?;

        let mut report = SweepReport::default();
        for (radius, facilities) in instance.pairs() {
            info!(
                "Instance {}: S = {}, p = {} (solver {})",
                instance.name,
                radius,
                facilities,
                self.solver.name()
            );

            let outcome = match self.run_iteration(&instance.name, radius, facilities) {
                Ok(outcome) => Ok(IterationSummary::from(&outcome)),
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    error!(
                        "Instance {} S = {} p = {} failed: {}",
                        instance.name, radius, facilities, err
                    );
                    self.discard_selection(&instance.name, radius, facilities);
                    Err(err.to_string())
                }
            };

            report.iterations.push(IterationReport {
                instance: instance.name.clone(),
                radius,
                facilities,
                outcome,
            });
        }
        Ok(report)
    }

    fn run_iteration(&self, instance: &str, radius: f64, facilities: usize) -> Result<SolveOutcome> {
        let logger = RunLogger::new(self.paths.log(instance, radius, facilities));
        let coordinates_path = self.paths.coordinates(instance);

        let loaded = load_sites(&coordinates_path, &self.paths.demands(instance));
        let sites = match loaded {
            Ok(sites) => sites,
            Err(err) => {
                self.log_failure(&logger, &err, true);
                return Err(err);
            }
        };
        logger.begin(&sites)?;

        let distances = self.distances.get_or_compute(&coordinates_path, &sites);
        let solved = solve_mclp(
            &sites,
            &distances,
            radius,
            facilities,
            self.solver,
            &self.tolerances,
        );

        let outcome = match solved {
            Ok(outcome) => outcome,
            Err(err) => {
                self.log_failure(&logger, &err, false);
                return Err(err);
            }
        };

        logger.record_solution(&outcome, sites.len())?;
        write_selected_sites_file(
            &self.paths.selection(instance, radius, facilities),
            &outcome.extraction.placement,
        )?;
        logger.finish()?;

        info!(
            "Placed {} facilities covering {}/{} demand",
            outcome.extraction.facilities_placed,
            outcome.extraction.covered_demand,
            outcome.extraction.total_demand
        );
        Ok(outcome)
    }

    /// `fresh` replaces whatever an earlier run left in the log.
    fn log_failure(&self, logger: &RunLogger, err: &MclpError, fresh: bool) {
        let recorded = if fresh {
            logger.begin_failure(err)
        } else {
            logger.record_failure(err)
        };
        let written = recorded.and_then(|_| logger.finish());
        if let Err(log_err) = written {
            warn!("Could not record failure in run log: {}", log_err);
        }
    }

    /// A failed configuration must not leave a selection file behind.
    fn discard_selection(&self, instance: &str, radius: f64, facilities: usize) {
        let path = self.paths.selection(instance, radius, facilities);
        match fs::remove_file(&path) {
            Ok(()) => warn!("Removed stale selection file {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Could not remove {}: {}", path.display(), e),
        }
    }

    fn prepare_output_dirs(&self) -> Result<()> {
        for dir in [self.paths.selection_dir(), self.paths.log_dir()] {
            fs::create_dir_all(&dir).map_err(|e| MclpError::io(&dir, e))?;
        }
        Ok(())
    }
}
