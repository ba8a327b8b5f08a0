//! Read-side reporting over the persisted requests and audit rows.
//!
//! Nothing here participates in the decision path; the aggregator recomputes
//! its summary from the stores on every call and degrades to a zero-valued
//! summary when no requests have been processed yet.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use super::domain::RequestState;
use super::repository::{RepositoryError, RequestRepository};
use crate::audit::{AuditEntry, AuditRecorder, CheckKind};

const SECONDS_PER_DAY: f64 = 24.0 * 60.0 * 60.0;

/// Baseline the automated pipeline is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsConfig {
    /// How long the manual process takes end to end, in days.
    pub manual_processing_days: u32,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            manual_processing_days: 45,
        }
    }
}

/// Average per-check wall-clock latency in milliseconds, by check kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CheckLatency {
    pub tier: f64,
    pub credential: f64,
    pub enrollment: f64,
}

/// Failed-check counts by check kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RejectionBreakdown {
    pub tier: u64,
    pub credential: u64,
    pub enrollment: u64,
}

/// Aggregated system statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub total_requests: u64,
    pub approved: u64,
    pub rejected: u64,
    pub approval_rate: f64,
    pub rejection_rate: f64,
    pub avg_elapsed_ms: f64,
    pub min_elapsed_ms: u64,
    pub max_elapsed_ms: u64,
    pub avg_elapsed_seconds: f64,
    pub avg_check_ms: CheckLatency,
    pub rejections: RejectionBreakdown,
    /// Share of rejections attributable to each check kind, in percent.
    pub rejection_distribution: BTreeMap<String, f64>,
    pub manual_baseline_days: u32,
    pub improvement_percent: f64,
    pub days_saved_per_request: f64,
}

/// Computes [`MetricsSummary`] from the request store and the audit trail.
pub struct MetricsAggregator<R, A> {
    repository: Arc<R>,
    audit: Arc<A>,
    config: MetricsConfig,
}

impl<R, A> MetricsAggregator<R, A>
where
    R: RequestRepository + 'static,
    A: AuditRecorder + 'static,
{
    pub fn new(repository: Arc<R>, audit: Arc<A>, config: MetricsConfig) -> Self {
        Self {
            repository,
            audit,
            config,
        }
    }

    pub fn summarize(&self) -> Result<MetricsSummary, RepositoryError> {
        let requests = self.repository.all()?;
        if requests.is_empty() {
            return Ok(self.empty_summary());
        }

        let total = requests.len() as u64;
        let approved = requests
            .iter()
            .filter(|request| request.state == RequestState::Approved)
            .count() as u64;
        let rejected = requests
            .iter()
            .filter(|request| request.state == RequestState::Rejected)
            .count() as u64;

        let elapsed: Vec<u64> = requests
            .iter()
            .filter_map(|request| request.elapsed_ms)
            .collect();
        let avg_elapsed_ms = if elapsed.is_empty() {
            0.0
        } else {
            elapsed.iter().sum::<u64>() as f64 / elapsed.len() as f64
        };
        let min_elapsed_ms = elapsed.iter().copied().min().unwrap_or(0);
        let max_elapsed_ms = elapsed.iter().copied().max().unwrap_or(0);

        let avg_check_ms = CheckLatency {
            tier: average_elapsed(&self.audit.entries_of_kind(CheckKind::Tier)),
            credential: average_elapsed(&self.audit.entries_of_kind(CheckKind::Credential)),
            enrollment: average_elapsed(&self.audit.entries_of_kind(CheckKind::Enrollment)),
        };

        let rejections = RejectionBreakdown {
            tier: failed_count(&self.audit.entries_of_kind(CheckKind::Tier)),
            credential: failed_count(&self.audit.entries_of_kind(CheckKind::Credential)),
            enrollment: failed_count(&self.audit.entries_of_kind(CheckKind::Enrollment)),
        };
        let rejection_distribution = distribution(&rejections, rejected);

        let avg_elapsed_seconds = avg_elapsed_ms / 1000.0;
        let baseline_seconds = f64::from(self.config.manual_processing_days) * SECONDS_PER_DAY;
        let improvement_percent =
            (baseline_seconds - avg_elapsed_seconds) / baseline_seconds * 100.0;
        let days_saved_per_request =
            f64::from(self.config.manual_processing_days) - avg_elapsed_seconds / SECONDS_PER_DAY;

        Ok(MetricsSummary {
            total_requests: total,
            approved,
            rejected,
            approval_rate: approved as f64 / total as f64,
            rejection_rate: rejected as f64 / total as f64,
            avg_elapsed_ms,
            min_elapsed_ms,
            max_elapsed_ms,
            avg_elapsed_seconds,
            avg_check_ms,
            rejections,
            rejection_distribution,
            manual_baseline_days: self.config.manual_processing_days,
            improvement_percent,
            days_saved_per_request,
        })
    }

    fn empty_summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_requests: 0,
            approved: 0,
            rejected: 0,
            approval_rate: 0.0,
            rejection_rate: 0.0,
            avg_elapsed_ms: 0.0,
            min_elapsed_ms: 0,
            max_elapsed_ms: 0,
            avg_elapsed_seconds: 0.0,
            avg_check_ms: CheckLatency::default(),
            rejections: RejectionBreakdown::default(),
            rejection_distribution: distribution(&RejectionBreakdown::default(), 0),
            manual_baseline_days: self.config.manual_processing_days,
            improvement_percent: 0.0,
            days_saved_per_request: 0.0,
        }
    }
}

fn average_elapsed(entries: &[AuditEntry]) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    entries.iter().map(|entry| entry.elapsed_ms).sum::<u64>() as f64 / entries.len() as f64
}

fn failed_count(entries: &[AuditEntry]) -> u64 {
    entries.iter().filter(|entry| !entry.passed).count() as u64
}

fn distribution(rejections: &RejectionBreakdown, rejected_requests: u64) -> BTreeMap<String, f64> {
    let mut shares = BTreeMap::new();
    let percent = |count: u64| {
        if rejected_requests == 0 {
            0.0
        } else {
            count as f64 / rejected_requests as f64 * 100.0
        }
    };
    shares.insert("TIER".to_string(), percent(rejections.tier));
    shares.insert("CREDENTIAL".to_string(), percent(rejections.credential));
    shares.insert("ENROLLMENT".to_string(), percent(rejections.enrollment));
    shares
}
