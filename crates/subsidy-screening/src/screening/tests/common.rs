use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use chrono::Utc;

use crate::audit::{AuditEntry, AuditRecorder, CheckKind, NewAuditEntry};
use crate::registry::{
    CredentialRecord, CredentialSnapshot, EnrollmentRecord, EnrollmentSnapshot, EnrollmentStatus,
    Tier, TierRecord, TierSnapshot,
};
use crate::screening::config::EngineConfig;
use crate::screening::domain::{ApplicationRequest, RequestId, RequestState};
use crate::screening::engine::DecisionEngine;
use crate::screening::metrics::{MetricsAggregator, MetricsConfig};
use crate::screening::repository::{RepositoryError, RequestRepository};
use crate::screening::router::{screening_router, ScreeningContext};
use crate::screening::service::ScreeningService;

// Eligible baseline applicant: identifier in no issuance band, tier B, no
// credential, active 25h enrollment at a recognized institution.
pub(super) const ELIGIBLE_ID: &str = "52804731";
pub(super) const YOUNG_BAND_ID: &str = "1130000010"; // band estimate: 17 years
pub(super) const TIER_D_ID: &str = "41230000";
pub(super) const CREDENTIALED_ID: &str = "60111222";
pub(super) const UNREGISTERED_ID: &str = "70555666";

pub(super) const ACTIVE_ENROLLMENT: &str = "ENR-ACTIVE";
pub(super) const INACTIVE_ENROLLMENT: &str = "ENR-INACTIVE";
pub(super) const LOW_HOURS_ENROLLMENT: &str = "ENR-LOWHOURS";
pub(super) const DENYLISTED_ENROLLMENT: &str = "ENR-DENYLISTED";

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<HashMap<RequestId, ApplicationRequest>>,
}

impl RequestRepository for MemoryRepository {
    fn insert(&self, record: ApplicationRequest) -> Result<ApplicationRequest, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ApplicationRequest) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &RequestId) -> Result<Option<ApplicationRequest>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_by_applicant(
        &self,
        applicant_id: &str,
    ) -> Result<Vec<ApplicationRequest>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.applicant_id == applicant_id)
            .cloned()
            .collect())
    }

    fn with_outcome(&self, approved: bool) -> Result<Vec<ApplicationRequest>, RepositoryError> {
        let wanted = if approved {
            RequestState::Approved
        } else {
            RequestState::Rejected
        };
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.state == wanted)
            .cloned()
            .collect())
    }

    fn all(&self) -> Result<Vec<ApplicationRequest>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

/// Repository that fails every operation, for orchestration-failure paths.
pub(super) struct UnavailableRepository;

impl RequestRepository for UnavailableRepository {
    fn insert(&self, _record: ApplicationRequest) -> Result<ApplicationRequest, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn update(&self, _record: ApplicationRequest) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn fetch(&self, _id: &RequestId) -> Result<Option<ApplicationRequest>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn find_by_applicant(
        &self,
        _applicant_id: &str,
    ) -> Result<Vec<ApplicationRequest>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn with_outcome(&self, _approved: bool) -> Result<Vec<ApplicationRequest>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn all(&self) -> Result<Vec<ApplicationRequest>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
    sequence: AtomicU64,
}

impl AuditRecorder for MemoryAuditLog {
    fn record(&self, entry: NewAuditEntry) {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let mut guard = self.entries.lock().expect("audit mutex poisoned");
        guard.push(AuditEntry {
            id,
            request_id: entry.request_id,
            kind: entry.kind,
            passed: entry.passed,
            message: entry.message,
            detail: entry.detail,
            elapsed_ms: entry.elapsed_ms,
            timestamp: Utc::now(),
        });
    }

    fn entries_for(&self, request_id: &RequestId) -> Vec<AuditEntry> {
        let guard = self.entries.lock().expect("audit mutex poisoned");
        guard
            .iter()
            .filter(|entry| &entry.request_id == request_id)
            .cloned()
            .collect()
    }

    fn entries_of_kind(&self, kind: CheckKind) -> Vec<AuditEntry> {
        let guard = self.entries.lock().expect("audit mutex poisoned");
        guard
            .iter()
            .filter(|entry| entry.kind == kind)
            .cloned()
            .collect()
    }
}

pub(super) fn engine_config() -> EngineConfig {
    EngineConfig::default()
}

pub(super) fn tier_registry() -> Arc<TierSnapshot> {
    let mut records = HashMap::new();
    records.insert(ELIGIBLE_ID.to_string(), TierRecord::new(Tier::B, 48.2));
    records.insert(YOUNG_BAND_ID.to_string(), TierRecord::new(Tier::A, 31.0));
    records.insert(TIER_D_ID.to_string(), TierRecord::new(Tier::D, 70.5));
    records.insert(CREDENTIALED_ID.to_string(), TierRecord::new(Tier::A, 25.8));
    Arc::new(TierSnapshot::without_latency(records))
}

pub(super) fn credential_registry() -> Arc<CredentialSnapshot> {
    let mut records = HashMap::new();
    records.insert(
        CREDENTIALED_ID.to_string(),
        CredentialRecord::held("Systems Engineering", "National University", "undergraduate"),
    );
    Arc::new(CredentialSnapshot::without_latency(records))
}

pub(super) fn enrollment_registry() -> Arc<EnrollmentSnapshot> {
    let mut records = HashMap::new();
    records.insert(
        ACTIVE_ENROLLMENT.to_string(),
        EnrollmentRecord::new(
            "Centro Tecnico Nacional",
            "Industrial Maintenance",
            EnrollmentStatus::Active,
            25,
        ),
    );
    records.insert(
        INACTIVE_ENROLLMENT.to_string(),
        EnrollmentRecord::new(
            "Centro Tecnico Nacional",
            "Industrial Maintenance",
            EnrollmentStatus::Inactive,
            25,
        ),
    );
    records.insert(
        LOW_HOURS_ENROLLMENT.to_string(),
        EnrollmentRecord::new(
            "Centro Tecnico Nacional",
            "Industrial Maintenance",
            EnrollmentStatus::Active,
            12,
        ),
    );
    records.insert(
        DENYLISTED_ENROLLMENT.to_string(),
        EnrollmentRecord::new(
            "Instituto Digital Global",
            "Digital Marketing",
            EnrollmentStatus::Active,
            30,
        ),
    );
    Arc::new(EnrollmentSnapshot::without_latency(records))
}

pub(super) fn build_engine(audit: Arc<MemoryAuditLog>) -> DecisionEngine<MemoryAuditLog> {
    DecisionEngine::new(
        tier_registry(),
        credential_registry(),
        enrollment_registry(),
        audit,
        engine_config(),
    )
}

pub(super) fn build_service() -> (
    Arc<ScreeningService<MemoryRepository, MemoryAuditLog>>,
    Arc<MemoryRepository>,
    Arc<MemoryAuditLog>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let audit = Arc::new(MemoryAuditLog::default());
    let service = Arc::new(ScreeningService::new(
        repository.clone(),
        audit.clone(),
        tier_registry(),
        credential_registry(),
        enrollment_registry(),
        engine_config(),
    ));
    (service, repository, audit)
}

pub(super) fn build_router() -> Router {
    let (service, repository, audit) = build_service();
    let metrics = Arc::new(MetricsAggregator::new(
        repository,
        audit,
        MetricsConfig::default(),
    ));
    screening_router(ScreeningContext { service, metrics })
}

/// Router wired to a permanently failing repository.
pub(super) fn build_failing_router() -> Router {
    let repository = Arc::new(UnavailableRepository);
    let audit = Arc::new(MemoryAuditLog::default());
    let service = Arc::new(ScreeningService::new(
        repository.clone(),
        audit.clone(),
        tier_registry(),
        credential_registry(),
        enrollment_registry(),
        engine_config(),
    ));
    let metrics = Arc::new(MetricsAggregator::new(
        repository,
        audit,
        MetricsConfig::default(),
    ));
    screening_router(ScreeningContext { service, metrics })
}

pub(super) fn verify_body(applicant_id: &str, enrollment_id: &str, age: i64) -> serde_json::Value {
    serde_json::json!({
        "applicant_id": applicant_id,
        "enrollment_id": enrollment_id,
        "age": age,
    })
}
