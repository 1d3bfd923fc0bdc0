//! HTTP surface for ad hoc MCLP solves.

use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use log::{error, info};

use crate::coverage::DistanceMatrix;
use crate::domain::solve::solve_mclp;
use crate::domain::solver::{Solver, Tolerances};
use crate::error::MclpError;
use crate::models::{ApiError, ApiSolution, SolveRequest};

pub struct AppState {
    pub solver: Arc<dyn Solver>,
    pub tolerances: Tolerances,
}

// ---------- Route handlers ----------

/// POST /solve
pub async fn solve(state: web::Data<AppState>, req: web::Json<SolveRequest>) -> impl Responder {
    let req = req.into_inner();
    if req.sites.is_empty() {
        return error_response(&MclpError::InvalidModel("no sites given".into()));
    }

    let solver = Arc::clone(&state.solver);
    let tolerances = state.tolerances;
    let solved = web::block(move || {
        let sites = req.to_sites();
        let distances = DistanceMatrix::from_sites(&sites);
        solve_mclp(
            &sites,
            &distances,
            req.radius,
            req.facilities,
            solver.as_ref(),
            &tolerances,
        )
    })
    .await;

    match solved {
        Ok(Ok(outcome)) => HttpResponse::Ok().json(ApiSolution {
            status: outcome.solution.status.to_string(),
            objective: outcome.solution.objective,
            facilities_placed: outcome.extraction.facilities_placed,
            clients_covered: outcome.extraction.clients_covered,
            covered_demand: outcome.extraction.covered_demand,
            total_demand: outcome.extraction.total_demand,
            relative_gap: outcome.solution.relative_gap,
            selected: outcome.extraction.placement,
        }),
        Ok(Err(err)) => error_response(&err),
        Err(err) => {
            error!("Blocking solve task failed: {}", err);
            HttpResponse::InternalServerError().json(ApiError {
                error: "Something went wrong".into(),
            })
        }
    }
}

fn error_response(err: &MclpError) -> HttpResponse {
    let body = ApiError {
        error: err.to_string(),
    };
    match err {
        MclpError::Format { .. } | MclpError::InvalidModel(_) | MclpError::InvalidConfig(_) => {
            HttpResponse::BadRequest().json(body)
        }
        MclpError::InfeasibleModel { .. } | MclpError::NoSolutionFound { .. } => {
            HttpResponse::UnprocessableEntity().json(body)
        }
        MclpError::SolverUnavailable(_)
        | MclpError::InconsistentSolution(_)
        | MclpError::Io { .. } => {
            error!("Solve failed: {}", err);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

/// GET /health
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

/// Route table shared by the server and the tests.
pub fn configure(json_limit: usize) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(
            web::JsonConfig::default()
                .limit(json_limit)
                .error_handler(|err, _| {
                    let err_string = err.to_string();
                    actix_web::error::InternalError::from_response(
                        err,
                        HttpResponse::BadRequest().json(ApiError { error: err_string }),
                    )
                    .into()
                }),
        )
        .route("/solve", web::post().to(solve))
        .route("/health", web::get().to(health_check));
    }
}

// ---------- Server bootstrap ----------
pub async fn serve(state: AppState, port: u16, json_limit: usize) -> std::io::Result<()> {
    let state = web::Data::new(state);
    info!("Starting server on http://127.0.0.1:{}", port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(configure(json_limit))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
