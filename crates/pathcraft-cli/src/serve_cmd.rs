use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use pathcraft_core::generate::{GenerateError, GenerateRequest};
use pathcraft_core::pipeline::PlanPipeline;
use pathcraft_core::plan::EnrichedPlan;
use pathcraft_core::validate::ValidationReport;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }
}

impl From<GenerateError> for AppError {
    fn from(err: GenerateError) -> Self {
        let status = match &err {
            GenerateError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            GenerateError::PaymentRequired => StatusCode::PAYMENT_REQUIRED,
            GenerateError::Upstream { .. }
            | GenerateError::Transport(_)
            | GenerateError::Malformed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// State and response types
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<PlanPipeline>,
    /// Cancelled on server shutdown; each request validates under a child
    /// token so in-flight probes stop promptly.
    shutdown: CancellationToken,
}

impl AppState {
    pub fn new(pipeline: Arc<PlanPipeline>, shutdown: CancellationToken) -> Self {
        Self { pipeline, shutdown }
    }
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub plan: EnrichedPlan,
    pub validation: ValidationReport,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/plans", post(generate_plan))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(pipeline: Arc<PlanPipeline>, bind: &str, port: u16) -> Result<()> {
    let shutdown = CancellationToken::new();
    let app = build_router(AppState::new(pipeline, shutdown.clone()));

    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("pathcraft serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;
    tracing::info!("pathcraft serve shut down");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    shutdown.cancel();
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn generate_plan(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<PlanResponse>, AppError> {
    if request.topic.trim().is_empty() {
        return Err(AppError::bad_request("topic must not be empty"));
    }
    if request.weeks == 0 || request.hours_per_week == 0 {
        return Err(AppError::bad_request(
            "weeks and hoursPerWeek must be at least 1",
        ));
    }

    let cancel = state.shutdown.child_token();
    let (plan, validation) = state.pipeline.run(&request, &cancel).await?;

    Ok(Json(PlanResponse { plan, validation }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
