//! The screening pipeline: decision engine, request orchestration, and the
//! read-side metrics aggregator, plus the HTTP router exposing them.

pub mod checks;
pub mod config;
pub mod domain;
pub mod engine;
pub mod metrics;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use config::{EngineConfig, IdBand};
pub use domain::{
    Applicant, ApplicationRequest, CheckOutcome, Decision, DecisionChecks, RejectionReason,
    RequestId, RequestState,
};
pub use engine::DecisionEngine;
pub use metrics::{CheckLatency, MetricsAggregator, MetricsConfig, MetricsSummary};
pub use repository::{RepositoryError, RequestRepository};
pub use router::{screening_router, ScreeningContext};
pub use service::{ScreeningService, ScreeningServiceError};
