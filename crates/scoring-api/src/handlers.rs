//! HTTP request handlers for the scoring service.
//!
//! Exposes the method pipeline and a health check using axum.

use crate::context::RequestContext;
use crate::error::ApiError;
use crate::pipeline::Pipeline;
use crate::response::Outcome;
use axum::{
    body::Bytes,
    extract::State,
    http::{header::HeaderName, HeaderMap, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use chrono::NaiveDateTime;
use scoring_domain::ScoreStore;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Header carrying the request id in both directions
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Source of the current local time
pub type Clock = fn() -> NaiveDateTime;

/// Wall clock in local time
pub fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Shared application state
pub struct AppState<S: ScoreStore> {
    /// Request pipeline shared by every connection
    pub pipeline: Arc<Pipeline<S>>,
    /// Time source for token hours and date rules
    pub clock: Clock,
}

impl<S: ScoreStore> AppState<S> {
    /// State reading the wall clock
    pub fn new(pipeline: Arc<Pipeline<S>>) -> Self {
        Self {
            pipeline,
            clock: local_now,
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

impl<S: ScoreStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            clock: self.clock,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
}

/// Request id supplied by the caller, or a fresh one
fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::now_v7().simple().to_string())
}

/// Render an outcome as the JSON envelope with a matching HTTP status
fn render(outcome: &Outcome, request_id: &str) -> Response {
    let status =
        StatusCode::from_u16(outcome.code.as_u16()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, Json(outcome.to_json())).into_response();
    if let Ok(value) = HeaderValue::from_str(request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    response
}

/// POST /method - Run a method call through the pipeline
///
/// The pipeline blocks on the store, so it runs on the blocking pool.
async fn handle_method<S>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    S: ScoreStore + Send + Sync + 'static,
    S::Error: Display,
{
    let request_id = request_id(&headers);
    info!(
        request_id = %request_id,
        path = "/method",
        body = %String::from_utf8_lossy(&body),
        "request received"
    );

    let pipeline = Arc::clone(&state.pipeline);
    let clock = state.clock;
    let mut ctx = RequestContext::new(request_id.clone());
    let joined = tokio::task::spawn_blocking(move || {
        let now = clock();
        let outcome = pipeline.handle(&body, &mut ctx, now);
        (outcome, ctx)
    })
    .await;

    let outcome = match joined {
        Ok((outcome, ctx)) => {
            if outcome.code.is_error() {
                warn!(
                    request_id = %ctx.request_id,
                    code = outcome.code.as_u16(),
                    reason = outcome.code.reason(),
                    "request failed"
                );
            } else {
                info!(
                    request_id = %ctx.request_id,
                    code = outcome.code.as_u16(),
                    has = ?ctx.has,
                    nclients = ?ctx.nclients,
                    "request handled"
                );
            }
            outcome
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "request task failed");
            Outcome::from(ApiError::Internal("request processing failed".to_string()))
        }
    };

    render(&outcome, &request_id)
}

/// GET /health - Liveness check
async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "ok".to_string(),
    })
}

/// Any other route - 404 envelope
async fn not_found(headers: HeaderMap, uri: Uri) -> Response {
    let request_id = request_id(&headers);
    info!(request_id = %request_id, path = %uri.path(), "no route");
    let outcome = Outcome::from(ApiError::NotFound(format!("no route for {}", uri.path())));
    render(&outcome, &request_id)
}

/// Create the axum router with all routes
pub fn create_router<S>(state: AppState<S>) -> AxumRouter
where
    S: ScoreStore + Send + Sync + 'static,
    S::Error: Display,
{
    AxumRouter::new()
        .route("/method", post(handle_method::<S>))
        .route("/health", get(health_check))
        .fallback(not_found)
        .with_state(state)
}
