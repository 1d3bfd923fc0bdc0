use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use log::{error, info};

use mclp_planner::config::{SweepConfig, SweepPaths, ToleranceArgs};
use mclp_planner::domain::solver_factory::{create_solver, SolverType};
use mclp_planner::service::{serve, AppState};
use mclp_planner::sweep::SweepOrchestrator;
use mclp_planner::{MclpError, Tolerances};

#[derive(Parser)]
#[command(author, version, about = "Maximal covering location planner", long_about = None)]
struct Cli {
    /// MILP backend (glpk, or highs when built with the highs-solver feature)
    #[arg(long, env = "MCLP_SOLVER", default_value = "glpk", global = true)]
    solver: String,

    #[command(flatten)]
    tolerances: ToleranceArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every (radius, facility count) pair of a sweep configuration
    Sweep {
        /// JSON sweep configuration
        #[arg(short, long)]
        config: PathBuf,

        #[arg(long, default_value = "input")]
        input_dir: PathBuf,

        #[arg(long, default_value = "output")]
        output_dir: PathBuf,

        /// Only run this instance of the configuration
        #[arg(long)]
        instance: Option<String>,
    },
    /// Serve single solves over HTTP
    Serve {
        #[arg(long, env = "PORT", default_value_t = 9000)]
        port: u16,

        #[arg(long, env = "JSON_PAYLOAD_LIMIT", default_value_t = 2 * 1024 * 1024)]
        json_limit: usize,
    },
}

fn main() -> ExitCode {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), MclpError> {
    let solver_type: SolverType = cli.solver.parse()?;
    let tolerances = cli.tolerances.to_tolerances()?;

    match cli.command {
        Command::Sweep {
            config,
            input_dir,
            output_dir,
            instance,
        } => run_sweep(solver_type, tolerances, &config, input_dir, output_dir, instance),
        Command::Serve { port, json_limit } => {
            let state = AppState {
                solver: Arc::from(create_solver(solver_type)),
                tolerances,
            };
            actix_web::rt::System::new()
                .block_on(serve(state, port, json_limit))
                .map_err(|e| MclpError::io(format!("0.0.0.0:{}", port), e))
        }
    }
}

fn run_sweep(
    solver_type: SolverType,
    tolerances: Tolerances,
    config_path: &Path,
    input_dir: PathBuf,
    output_dir: PathBuf,
    instance: Option<String>,
) -> Result<(), MclpError> {
    let mut config = SweepConfig::from_path(config_path)?;
    if let Some(name) = instance {
        config = config.select(&name)?;
    }

    let solver = create_solver(solver_type);
    let orchestrator = SweepOrchestrator::new(
        solver.as_ref(),
        tolerances,
        SweepPaths::new(input_dir, output_dir),
    );
    let report = orchestrator.run(&config)?;

    for iteration in &report.iterations {
        match &iteration.outcome {
            Ok(summary) => println!(
                "{} S={} p={}: {} objective {} ({} facilities, {} clients covered, demand {}/{})",
                iteration.instance,
                iteration.radius,
                iteration.facilities,
                summary.status,
                summary.objective,
                summary.facilities_placed,
                summary.clients_covered,
                summary.covered_demand,
                summary.total_demand
            ),
            Err(reason) => println!(
                "{} S={} p={}: FAILED {}",
                iteration.instance, iteration.radius, iteration.facilities, reason
            ),
        }
    }
    info!(
        "Sweep finished: {} succeeded, {} failed",
        report.successes().count(),
        report.failures().count()
    );
    Ok(())
}
