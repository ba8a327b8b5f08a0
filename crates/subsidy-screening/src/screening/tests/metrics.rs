use std::sync::Arc;

use super::common::*;
use crate::screening::metrics::{MetricsAggregator, MetricsConfig};

#[test]
fn empty_store_yields_a_zero_valued_summary() {
    let repository = Arc::new(MemoryRepository::default());
    let audit = Arc::new(MemoryAuditLog::default());
    let aggregator = MetricsAggregator::new(repository, audit, MetricsConfig::default());

    let summary = aggregator.summarize().expect("summary computes");

    assert_eq!(summary.total_requests, 0);
    assert_eq!(summary.approval_rate, 0.0);
    assert_eq!(summary.min_elapsed_ms, 0);
    assert_eq!(summary.manual_baseline_days, 45);
    assert_eq!(summary.improvement_percent, 0.0);
    assert_eq!(summary.rejection_distribution["TIER"], 0.0);
}

#[test]
fn summary_reflects_processed_requests() {
    let (service, repository, audit) = build_service();
    service
        .submit(ELIGIBLE_ID, ACTIVE_ENROLLMENT, 20)
        .expect("approved submission");
    service
        .submit(TIER_D_ID, ACTIVE_ENROLLMENT, 20)
        .expect("tier rejection");
    service
        .submit(CREDENTIALED_ID, ACTIVE_ENROLLMENT, 20)
        .expect("credential rejection");

    let aggregator = MetricsAggregator::new(repository, audit, MetricsConfig::default());
    let summary = aggregator.summarize().expect("summary computes");

    assert_eq!(summary.total_requests, 3);
    assert_eq!(summary.approved, 1);
    assert_eq!(summary.rejected, 2);
    assert!((summary.approval_rate - 1.0 / 3.0).abs() < 1e-9);
    assert!((summary.rejection_rate - 2.0 / 3.0).abs() < 1e-9);

    assert!(summary.min_elapsed_ms <= summary.max_elapsed_ms);
    assert!(summary.avg_elapsed_ms <= summary.max_elapsed_ms as f64);

    // One failed tier entry and one failed credential entry across the runs.
    assert_eq!(summary.rejections.tier, 1);
    assert_eq!(summary.rejections.credential, 1);
    assert_eq!(summary.rejections.enrollment, 0);
    assert!((summary.rejection_distribution["TIER"] - 50.0).abs() < 1e-9);
    assert!((summary.rejection_distribution["ENROLLMENT"]).abs() < 1e-9);
}

#[test]
fn baseline_comparison_reports_near_total_improvement() {
    let (service, repository, audit) = build_service();
    service
        .submit(ELIGIBLE_ID, ACTIVE_ENROLLMENT, 20)
        .expect("submission succeeds");

    let aggregator = MetricsAggregator::new(repository, audit, MetricsConfig::default());
    let summary = aggregator.summarize().expect("summary computes");

    // Sub-second automated runs against a 45-day manual baseline.
    assert!(summary.improvement_percent > 99.0);
    assert!(summary.days_saved_per_request > 44.9);
}

#[test]
fn baseline_days_are_configurable() {
    let repository = Arc::new(MemoryRepository::default());
    let audit = Arc::new(MemoryAuditLog::default());
    let aggregator = MetricsAggregator::new(
        repository,
        audit,
        MetricsConfig {
            manual_processing_days: 10,
        },
    );

    let summary = aggregator.summarize().expect("summary computes");
    assert_eq!(summary.manual_baseline_days, 10);
}
