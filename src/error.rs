use std::path::PathBuf;

use thiserror::Error;

use crate::domain::solver::SolveStatus;

/// Result type for MCLP planning operations
pub type Result<T> = std::result::Result<T, MclpError>;

/// Errors that can occur while loading, formulating or solving an instance
#[derive(Error, Debug)]
pub enum MclpError {
    /// Input records are malformed or their counts disagree
    #[error("format error in {origin}: {message}")]
    Format { origin: String, message: String },

    /// A file could not be read or written
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No assignment satisfies the facility count together with coverage
    #[error("model is infeasible for p = {facilities}, S = {radius}")]
    InfeasibleModel { facilities: usize, radius: f64 },

    /// The solver stopped without a feasible assignment
    #[error("no solution was found (solver status: {status})")]
    NoSolutionFound { status: SolveStatus },

    /// The solver backend cannot be created or reached
    #[error("solver unavailable: {0}")]
    SolverUnavailable(String),

    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The returned assignment contradicts the formulation
    #[error("inconsistent solution: {0}")]
    InconsistentSolution(String),
}

impl MclpError {
    pub fn format(origin: impl Into<String>, message: impl Into<String>) -> Self {
        MclpError::Format {
            origin: origin.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MclpError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error must abort a whole sweep rather than a single iteration.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MclpError::SolverUnavailable(_) | MclpError::InvalidConfig(_)
        )
    }
}
