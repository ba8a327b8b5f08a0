use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use subsidy_screening::audit::AuditRecorder;
use subsidy_screening::screening::{screening_router, RequestRepository, ScreeningContext};

pub(crate) fn with_screening_routes<R, A>(context: ScreeningContext<R, A>) -> axum::Router
where
    R: RequestRepository + 'static,
    A: AuditRecorder + 'static,
{
    screening_router(context)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "subsidy-screening",
        "version": env!("CARGO_PKG_VERSION"),
        "active_checks": 5,
    }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn healthcheck_reports_the_active_check_count() {
        let Json(body) = healthcheck().await;

        assert_eq!(body["status"], "ok");
        assert_eq!(body["active_checks"], 5);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
