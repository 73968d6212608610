use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use snippet_exec::{BlockResult, CodeExecutionService, ExecutionResult, ExecutorConfig, Language};
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Execution error: {0}")]
    ExecutionError(#[from] snippet_exec::Error),
    #[error("Server error: {0}")]
    ServerError(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ServerError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ServerError::ExecutionError(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ServerError::ServerError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ExecuteRequest {
    pub language: String,
    pub code: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct BlocksRequest {
    pub markdown: String,
}

#[derive(Clone)]
pub struct AppState {
    service: CodeExecutionService,
}

/// Load the executor config: defaults, then the TOML file, then overrides.
pub fn load_config(
    path: Option<&Path>,
    work_dir: Option<PathBuf>,
    timeout_secs: Option<u64>,
) -> Result<ExecutorConfig, ServerError> {
    let mut config = match path {
        Some(path) => ExecutorConfig::from_file(path)?,
        None => ExecutorConfig::default(),
    };
    if let Some(work_dir) = work_dir {
        config = config.with_work_dir(work_dir);
    }
    if let Some(timeout_secs) = timeout_secs {
        config = config.with_timeout_secs(timeout_secs);
    }
    config.validate()?;
    Ok(config)
}

pub fn create_app(
    max_concurrent_executions: usize,
    config: ExecutorConfig,
) -> Result<Router, ServerError> {
    let service = CodeExecutionService::new(max_concurrent_executions, config)?;
    let state = AppState { service };

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/languages", get(languages))
        .route("/execute", post(execute))
        .route("/blocks", post(execute_blocks))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    Ok(app)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), ServerError> {
    info!("Starting snippet execution server on {}", addr);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::ServerError(e.to_string()))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::ServerError(e.to_string()))?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

async fn languages(State(state): State<AppState>) -> Json<Vec<Language>> {
    Json(state.service.supported_languages())
}

/// Failed executions are still `200 OK`; the outcome is in the body.
async fn execute(
    State(state): State<AppState>,
    payload: Result<Json<ExecuteRequest>, JsonRejection>,
) -> Result<Json<ExecutionResult>, ServerError> {
    let Json(payload) = payload.map_err(|e| ServerError::InvalidRequest(e.body_text()))?;
    debug!("Execute request for language {:?}", payload.language);

    let result = state
        .service
        .execute(&payload.code, &payload.language)
        .await;
    Ok(Json(result))
}

async fn execute_blocks(
    State(state): State<AppState>,
    payload: Result<Json<BlocksRequest>, JsonRejection>,
) -> Result<Json<Vec<BlockResult>>, ServerError> {
    let Json(payload) = payload.map_err(|e| ServerError::InvalidRequest(e.body_text()))?;
    Ok(Json(state.service.execute_blocks(&payload.markdown).await))
}
