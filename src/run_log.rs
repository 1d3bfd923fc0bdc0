//! Human-readable per-run log files.
//!
//! Every write opens the file, appends and closes it again, so a run that
//! fails halfway still leaves everything recorded up to that point.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::solve::SolveOutcome;
use crate::error::{MclpError, Result};
use crate::models::Site;

pub const SEPARATOR: &str = "=====================================";
pub const TRAILER: &str = "Finished running the MCLP model.";

pub struct RunLogger {
    path: PathBuf,
}

impl RunLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RunLogger { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start a fresh log with the input summary.
    pub fn begin(&self, sites: &[Site]) -> Result<()> {
        let coordinates: Vec<String> = sites
            .iter()
            .map(|s| format!("({}, {})", s.x, s.y))
            .collect();
        let demands: Vec<String> = sites.iter().map(|s| s.demand.to_string()).collect();

        let mut file = File::create(&self.path).map_err(|e| MclpError::io(&self.path, e))?;
        let text = format!(
            "Number of clients: {}\nClients coordinates: [{}]\nDemands: [{}]\n",
            sites.len(),
            coordinates.join(", "),
            demands.join(", ")
        );
        file.write_all(text.as_bytes())
            .map_err(|e| MclpError::io(&self.path, e))
    }

    pub fn record_solution(&self, outcome: &SolveOutcome, n_clients: usize) -> Result<()> {
        let solution = &outcome.solution;
        let extraction = &outcome.extraction;

        let mut text = String::new();
        text.push_str(&format!("Solution status: {}\n", solution.status));
        text.push_str(&format!("Objective value: {}\n", solution.objective));
        text.push_str(&format!(
            "Total facilities placed: {}\n",
            extraction.facilities_placed
        ));
        text.push_str(&format!(
            "Total clients covered: {}/{}\n",
            extraction.clients_covered, n_clients
        ));
        text.push_str(&format!(
            "Total demand covered: {}/{}\n",
            solution.objective, extraction.total_demand
        ));
        if let Some(gap) = solution.relative_gap {
            text.push_str(&format!("Relative gap: {:.16}\n", gap));
        }
        text.push_str(&format!("Solution status: {}\n", solution.status));
        text.push_str(SEPARATOR);
        text.push('\n');
        self.append(&text)
    }

    /// Start a fresh log for a run whose input could not be loaded.
    pub fn begin_failure(&self, error: &MclpError) -> Result<()> {
        File::create(&self.path).map_err(|e| MclpError::io(&self.path, e))?;
        self.record_failure(error)
    }

    pub fn record_failure(&self, error: &MclpError) -> Result<()> {
        self.append(&format!("Run failed: {}\n{}\n", error, SEPARATOR))
    }

    pub fn finish(&self) -> Result<()> {
        self.append(&format!("{}\n", TRAILER))
    }

    fn append(&self, text: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| MclpError::io(&self.path, e))?;
        file.write_all(text.as_bytes())
            .map_err(|e| MclpError::io(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::extract::{Extraction, SelectedSite};
    use crate::domain::solver::{Solution, SolveStatus};
    use std::fs;

    fn sites() -> Vec<Site> {
        vec![Site::new(1, 0, 0, 5), Site::new(2, 5, 5, 10)]
    }

    #[test]
    fn test_run_log_records_input_and_solution() {
        let dir = tempfile::tempdir().unwrap();
        let logger = RunLogger::new(dir.path().join("run.log"));

        let outcome = SolveOutcome {
            solution: Solution {
                status: SolveStatus::Optimal,
                objective: 10.0,
                values: vec![0.0, 1.0, 0.0, 1.0],
                relative_gap: Some(0.0),
            },
            extraction: Extraction {
                facilities_placed: 1,
                clients_covered: 1,
                covered_demand: 10,
                total_demand: 15,
                placement: vec![SelectedSite { index: 2, x: 5, y: 5, demand: 10 }],
            },
        };

        logger.begin(&sites()).unwrap();
        logger.record_solution(&outcome, 2).unwrap();
        logger.finish().unwrap();

        let text = fs::read_to_string(logger.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Number of clients: 2",
                "Clients coordinates: [(0, 0), (5, 5)]",
                "Demands: [5, 10]",
                "Solution status: optimal",
                "Objective value: 10",
                "Total facilities placed: 1",
                "Total clients covered: 1/2",
                "Total demand covered: 10/15",
                "Relative gap: 0.0000000000000000",
                "Solution status: optimal",
                SEPARATOR,
                TRAILER,
            ]
        );
    }

    #[test]
    fn test_begin_truncates_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let logger = RunLogger::new(dir.path().join("run.log"));
        logger.begin(&sites()).unwrap();
        logger
            .record_failure(&MclpError::InfeasibleModel {
                facilities: 3,
                radius: 1.0,
            })
            .unwrap();
        logger.begin(&sites()).unwrap();

        let text = fs::read_to_string(logger.path()).unwrap();
        assert!(!text.contains("Run failed"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_begin_failure_replaces_previous_solution() {
        let dir = tempfile::tempdir().unwrap();
        let logger = RunLogger::new(dir.path().join("run.log"));
        logger.begin(&sites()).unwrap();
        logger.finish().unwrap();

        logger
            .begin_failure(&MclpError::format("demand-a.dat", "line 2"))
            .unwrap();
        let text = fs::read_to_string(logger.path()).unwrap();
        assert!(text.starts_with("Run failed: format error in demand-a.dat"));
        assert!(!text.contains("Number of clients"));
        assert!(!text.contains(TRAILER));
    }

    #[test]
    fn test_record_failure_names_error() {
        let dir = tempfile::tempdir().unwrap();
        let logger = RunLogger::new(dir.path().join("run.log"));
        logger
            .record_failure(&MclpError::NoSolutionFound {
                status: SolveStatus::NoSolution,
            })
            .unwrap();
        let text = fs::read_to_string(logger.path()).unwrap();
        assert!(text.starts_with("Run failed: no solution was found"));
    }
}
