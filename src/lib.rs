//! # MCLP planner
//!
//! Maximal covering location: choose exactly `p` of the candidate sites to
//! host facilities so that the demand lying within service radius `S` of a
//! facility is as large as possible.
//!
//! The pipeline runs forward, one `(S, p)` configuration at a time:
//!
//! * [`input`] parses coordinates and demands into [`models::Site`]s.
//! * [`coverage`] derives the sites within `S` of every site.
//! * [`domain::model`] formulates the binary integer program.
//! * [`domain::solver`] is the seam to the MILP backends in [`domain::solvers`].
//! * [`domain::extract`] reads placements and coverage back out of a solution.
//! * [`output`] and [`run_log`] write the selection file and the run log.
//! * [`sweep`] iterates a [`config::SweepConfig`] through all of the above.
//! * [`service`] exposes single solves over HTTP.

pub mod config;
pub mod convert;
pub mod coverage;
pub mod domain;
pub mod error;
pub mod input;
pub mod models;
pub mod output;
pub mod run_log;
pub mod service;
pub mod sweep;

pub use domain::solve::{solve_mclp, SolveOutcome};
pub use domain::solver::{Solution, SolveStatus, Solver, Tolerances};
pub use error::{MclpError, Result};
pub use models::Site;
