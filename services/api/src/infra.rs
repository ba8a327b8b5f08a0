use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use subsidy_screening::audit::{AuditEntry, AuditRecorder, CheckKind, NewAuditEntry};
use subsidy_screening::registry::{
    CredentialRecord, EnrollmentRecord, EnrollmentStatus, Tier, TierRecord,
};
use subsidy_screening::screening::{
    ApplicationRequest, RepositoryError, RequestId, RequestRepository, RequestState,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryRequestRepository {
    records: Arc<Mutex<HashMap<RequestId, ApplicationRequest>>>,
}

impl RequestRepository for InMemoryRequestRepository {
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

#[derive(Default, Clone)]
pub(crate) struct InMemoryAuditLog {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
    sequence: Arc<AtomicU64>,
}

impl AuditRecorder for InMemoryAuditLog {
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

/// Built-in registry dataset used when no seed directory is configured.
///
/// Covers every decision path: eligible and ineligible tiers, an issuance
/// band identifier, a held credential, and enrollments that trip each of the
/// activity, workload, and institution conditions.
pub(crate) fn demo_registries() -> (
    HashMap<String, TierRecord>,
    HashMap<String, CredentialRecord>,
    HashMap<String, EnrollmentRecord>,
) {
    let mut tiers = HashMap::new();
    tiers.insert("52804731".to_string(), TierRecord::new(Tier::A, 32.5));
    tiers.insert("1130000015".to_string(), TierRecord::new(Tier::B, 45.0));
    tiers.insert("41230077".to_string(), TierRecord::new(Tier::D, 72.4));
    tiers.insert("60111222".to_string(), TierRecord::new(Tier::B, 51.0));

    let mut credentials = HashMap::new();
    credentials.insert(
        "60111222".to_string(),
        CredentialRecord::held(
            "Software Development Technology",
            "Centro Tecnico Nacional",
            "TECHNICAL",
        ),
    );

    let mut enrollments = HashMap::new();
    enrollments.insert(
        "ENR-1001".to_string(),
        EnrollmentRecord::new(
            "Centro Tecnico Nacional",
            "Industrial Maintenance",
            EnrollmentStatus::Active,
            25,
        ),
    );
    enrollments.insert(
        "ENR-1002".to_string(),
        EnrollmentRecord::new(
            "Fundacion Educativa del Norte",
            "Logistics Operations",
            EnrollmentStatus::Inactive,
            20,
        ),
    );
    enrollments.insert(
        "ENR-1003".to_string(),
        EnrollmentRecord::new(
            "Escuela de Oficios del Sur",
            "Culinary Arts",
            EnrollmentStatus::Active,
            12,
        ),
    );
    enrollments.insert(
        "ENR-1004".to_string(),
        EnrollmentRecord::new(
            "Instituto Digital Global",
            "Digital Marketing",
            EnrollmentStatus::Active,
            30,
        ),
    );

    (tiers, credentials, enrollments)
}
