use axum::http::StatusCode;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info};
use serde_json::json;
use std::sync::Arc;

use crate::backend::HighsBackend;
use crate::config::{Config, SolverConfig};
use crate::data::{ScheduleResult, SchedulingInput};
use crate::error::SolveError;
use crate::solver;

type ApiError = (StatusCode, Json<serde_json::Value>);

async fn solve_handler(
    State(config): State<Arc<SolverConfig>>,
    Json(input): Json<SchedulingInput>,
) -> Result<Json<ScheduleResult>, ApiError> {
    // one backend and one model per request
    let backend = HighsBackend::new(config.as_ref().clone());
    let solved = tokio::task::spawn_blocking(move || solver::solve_input(&input, &backend))
        .await
        .map_err(|e| {
            error!("Solve task panicked: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "solve task failed".to_string())
        })?;

    match solved {
        Ok(result) => Ok(Json(result)),
        Err(e @ SolveError::Input(_)) => Err(api_error(StatusCode::BAD_REQUEST, e.to_string())),
        Err(e) => {
            error!("{}", e);
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

fn api_error(status: StatusCode, message: String) -> ApiError {
    (status, Json(json!({ "error": message })))
}

pub fn router(solver_config: SolverConfig) -> Router {
    Router::new()
        .route("/api/solve", post(solve_handler))
        .route("/health", get(|| async { "ok" }))
        .with_state(Arc::new(solver_config))
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let app = router(config.solver);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}
