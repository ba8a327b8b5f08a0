use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::RequestId;
use super::metrics::MetricsAggregator;
use super::repository::{RepositoryError, RequestRepository};
use super::service::{ScreeningService, ScreeningServiceError};
use crate::audit::AuditRecorder;

/// Shared state for the screening endpoints.
pub struct ScreeningContext<R, A> {
    pub service: Arc<ScreeningService<R, A>>,
    pub metrics: Arc<MetricsAggregator<R, A>>,
}

impl<R, A> Clone for ScreeningContext<R, A> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

/// Router builder exposing the screening HTTP API.
pub fn screening_router<R, A>(context: ScreeningContext<R, A>) -> Router
where
    R: RequestRepository + 'static,
    A: AuditRecorder + 'static,
{
    Router::new()
        .route("/api/v1/screening/verify", post(verify_handler::<R, A>))
        .route(
            "/api/v1/screening/requests",
            get(list_by_applicant_handler::<R, A>),
        )
        .route(
            "/api/v1/screening/requests/approved",
            get(approved_handler::<R, A>),
        )
        .route(
            "/api/v1/screening/requests/rejected",
            get(rejected_handler::<R, A>),
        )
        .route(
            "/api/v1/screening/requests/:request_id",
            get(request_handler::<R, A>),
        )
        .route(
            "/api/v1/screening/requests/:request_id/audit",
            get(audit_handler::<R, A>),
        )
        .route(
            "/api/v1/screening/metrics/summary",
            get(metrics_handler::<R, A>),
        )
        .with_state(context)
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerifyRequest {
    pub(crate) applicant_id: String,
    pub(crate) enrollment_id: String,
    pub(crate) age: i64,
}

/// Input-shape validation, distinct from business rejection: a malformed
/// payload never reaches the pipeline.
pub(crate) fn validate_payload(payload: &VerifyRequest) -> Result<u32, String> {
    let digits = payload.applicant_id.trim();
    if digits.len() < 7 || digits.len() > 10 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err("applicant_id must be 7 to 10 digits".to_string());
    }
    if payload.enrollment_id.trim().is_empty() {
        return Err("enrollment_id must not be empty".to_string());
    }
    if !(10..=35).contains(&payload.age) {
        return Err("age must be between 10 and 35".to_string());
    }
    Ok(payload.age as u32)
}

pub(crate) async fn verify_handler<R, A>(
    State(context): State<ScreeningContext<R, A>>,
    axum::Json(payload): axum::Json<VerifyRequest>,
) -> Response
where
    R: RequestRepository + 'static,
    A: AuditRecorder + 'static,
{
    let age = match validate_payload(&payload) {
        Ok(age) => age,
        Err(message) => {
            let body = json!({ "error": message });
            return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
        }
    };

    // Registry lookups block for their simulated latency, so the pipeline
    // runs on the blocking pool rather than a runtime worker.
    let service = context.service.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        service.submit(payload.applicant_id.trim(), payload.enrollment_id.trim(), age)
    })
    .await;

    match outcome {
        Ok(Ok(decision)) => (StatusCode::OK, axum::Json(decision)).into_response(),
        Ok(Err(err)) => failure_decision(err.to_string()),
        Err(join_err) => failure_decision(format!("screening task failed: {join_err}")),
    }
}

/// Error-shaped decision payload for orchestration failures.
fn failure_decision(message: String) -> Response {
    let body = json!({
        "approved": false,
        "message": format!("failed to process request: {message}"),
        "reasons": [],
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
}

pub(crate) async fn request_handler<R, A>(
    State(context): State<ScreeningContext<R, A>>,
    Path(request_id): Path<String>,
) -> Response
where
    R: RequestRepository + 'static,
    A: AuditRecorder + 'static,
{
    let id = RequestId(request_id);
    match context.service.get(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(ScreeningServiceError::Repository(RepositoryError::NotFound)) => not_found(&id),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn audit_handler<R, A>(
    State(context): State<ScreeningContext<R, A>>,
    Path(request_id): Path<String>,
) -> Response
where
    R: RequestRepository + 'static,
    A: AuditRecorder + 'static,
{
    let id = RequestId(request_id);
    match context.service.audit_trail(&id) {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(ScreeningServiceError::Repository(RepositoryError::NotFound)) => not_found(&id),
        Err(other) => internal_error(other),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    pub(crate) applicant_id: Option<String>,
}

pub(crate) async fn list_by_applicant_handler<R, A>(
    State(context): State<ScreeningContext<R, A>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    R: RequestRepository + 'static,
    A: AuditRecorder + 'static,
{
    let Some(applicant_id) = query.applicant_id else {
        let body = json!({ "error": "applicant_id query parameter is required" });
        return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
    };

    match context.service.by_applicant(&applicant_id) {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn approved_handler<R, A>(
    State(context): State<ScreeningContext<R, A>>,
) -> Response
where
    R: RequestRepository + 'static,
    A: AuditRecorder + 'static,
{
    match context.service.approved() {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn rejected_handler<R, A>(
    State(context): State<ScreeningContext<R, A>>,
) -> Response
where
    R: RequestRepository + 'static,
    A: AuditRecorder + 'static,
{
    match context.service.rejected() {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn metrics_handler<R, A>(
    State(context): State<ScreeningContext<R, A>>,
) -> Response
where
    R: RequestRepository + 'static,
    A: AuditRecorder + 'static,
{
    match context.metrics.summarize() {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(err) => {
            let body = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
        }
    }
}

fn not_found(id: &RequestId) -> Response {
    let body = json!({
        "error": "request not found",
        "request_id": id.0,
    });
    (StatusCode::NOT_FOUND, axum::Json(body)).into_response()
}

fn internal_error(err: ScreeningServiceError) -> Response {
    let body = json!({ "error": err.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
}
