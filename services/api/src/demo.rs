use crate::infra::{demo_registries, InMemoryAuditLog, InMemoryRequestRepository};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use subsidy_screening::audit::AuditRecorder;
use subsidy_screening::error::AppError;
use subsidy_screening::registry::{
    CredentialSnapshot, EnrollmentSnapshot, SeedData, TierSnapshot,
};
use subsidy_screening::screening::{
    EngineConfig, MetricsAggregator, MetricsConfig, ScreeningService,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Load registry snapshots from CSV seed files instead of the built-in dataset
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Manual processing baseline in days for the closing metrics comparison
    #[arg(long)]
    pub(crate) baseline_days: Option<u32>,
}

struct Scenario {
    label: &'static str,
    applicant_id: &'static str,
    enrollment_id: &'static str,
    age: u32,
}

const SCENARIOS: [Scenario; 5] = [
    Scenario {
        label: "eligible applicant, active enrollment",
        applicant_id: "52804731",
        enrollment_id: "ENR-1001",
        age: 20,
    },
    Scenario {
        label: "applicant past the age ceiling",
        applicant_id: "52804731",
        enrollment_id: "ENR-1001",
        age: 30,
    },
    Scenario {
        label: "ineligible socioeconomic tier",
        applicant_id: "41230077",
        enrollment_id: "ENR-1001",
        age: 22,
    },
    Scenario {
        label: "credential already held",
        applicant_id: "60111222",
        enrollment_id: "ENR-1001",
        age: 24,
    },
    Scenario {
        label: "unregistered applicant, flagged institution",
        applicant_id: "99887766",
        enrollment_id: "ENR-1004",
        age: 20,
    },
];

/// Screen a batch of sample applicants without latency simulation and print
/// the decisions, one full audit trail, and the aggregate metrics summary.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        data_dir,
        baseline_days,
    } = args;

    let (tiers, credentials, enrollments) = match data_dir {
        Some(dir) => {
            let seed = SeedData::load_dir(&dir)?;
            println!(
                "Registry snapshots loaded from {} ({} tiers, {} credentials, {} enrollments)",
                dir.display(),
                seed.tiers.len(),
                seed.credentials.len(),
                seed.enrollments.len()
            );
            (seed.tiers, seed.credentials, seed.enrollments)
        }
        None => demo_registries(),
    };

    let repository = Arc::new(InMemoryRequestRepository::default());
    let audit = Arc::new(InMemoryAuditLog::default());
    let service = Arc::new(ScreeningService::new(
        repository.clone(),
        audit.clone(),
        Arc::new(TierSnapshot::without_latency(tiers)),
        Arc::new(CredentialSnapshot::without_latency(credentials)),
        Arc::new(EnrollmentSnapshot::without_latency(enrollments)),
        EngineConfig::default(),
    ));

    println!("Subsidy screening demo ({} applicants)\n", SCENARIOS.len());

    let mut sample_trail_request = None;
    for scenario in &SCENARIOS {
        let decision = match service.submit(
            scenario.applicant_id,
            scenario.enrollment_id,
            scenario.age,
        ) {
            Ok(decision) => decision,
            Err(err) => {
                println!("- {}: submission failed ({err})", scenario.label);
                continue;
            }
        };

        let verdict = if decision.approved {
            "APPROVED"
        } else {
            "REJECTED"
        };
        println!(
            "- {} -> {} [{} in {} ms]",
            scenario.label, verdict, decision.request_id.0, decision.total_elapsed_ms
        );
        for reason in &decision.reasons {
            println!("    - {reason}");
        }
        if sample_trail_request.is_none() && !decision.approved {
            sample_trail_request = Some(decision.request_id.clone());
        }
    }

    if let Some(request_id) = sample_trail_request {
        println!("\nAudit trail for {}", request_id.0);
        for entry in audit.entries_for(&request_id) {
            let outcome = if entry.passed { "pass" } else { "fail" };
            println!(
                "  #{} {} [{}] {} ({} ms)",
                entry.id,
                entry.kind.label(),
                outcome,
                entry.message,
                entry.elapsed_ms
            );
        }
    }

    let metrics_config = match baseline_days {
        Some(days) => MetricsConfig {
            manual_processing_days: days,
        },
        None => MetricsConfig::default(),
    };
    let aggregator = MetricsAggregator::new(repository, audit, metrics_config);

    println!("\nMetrics summary");
    match aggregator.summarize() {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("  summary unavailable: {err}"),
        },
        Err(err) => println!("  metrics unavailable: {err}"),
    }

    Ok(())
}
