use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use super::config::EngineConfig;
use super::domain::{Applicant, ApplicationRequest, Decision, RequestId, RequestState};
use super::engine::DecisionEngine;
use super::repository::{RepositoryError, RequestRepository};
use crate::audit::{AuditEntry, AuditRecorder};
use crate::registry::{CredentialLookup, EnrollmentLookup, TierLookup};

static REQUEST_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_request_id() -> RequestId {
    let id = REQUEST_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RequestId(format!("req-{id:06}"))
}

/// Orchestrator for the screening lifecycle: persist a pending request, run
/// the decision engine, transition the request to its terminal state exactly
/// once, and expose the read-side queries.
pub struct ScreeningService<R, A> {
    repository: Arc<R>,
    audit: Arc<A>,
    engine: DecisionEngine<A>,
}

impl<R, A> ScreeningService<R, A>
where
    R: RequestRepository + 'static,
    A: AuditRecorder + 'static,
{
    pub fn new(
        repository: Arc<R>,
        audit: Arc<A>,
        tier: Arc<dyn TierLookup>,
        credential: Arc<dyn CredentialLookup>,
        enrollment: Arc<dyn EnrollmentLookup>,
        config: EngineConfig,
    ) -> Self {
        let engine = DecisionEngine::new(tier, credential, enrollment, audit.clone(), config);
        Self {
            repository,
            audit,
            engine,
        }
    }

    /// Process a new screening request end to end. Every call creates a new
    /// request with a fresh identifier, even for identical inputs; there is
    /// no retry or resubmission path.
    pub fn submit(
        &self,
        applicant_id: &str,
        enrollment_id: &str,
        age: u32,
    ) -> Result<Decision, ScreeningServiceError> {
        let request_id = next_request_id();
        let pending = ApplicationRequest::pending(request_id.clone(), applicant_id, enrollment_id);
        let mut record = self.repository.insert(pending)?;

        let applicant = Applicant {
            id: applicant_id.to_string(),
            age,
            enrollment_id: enrollment_id.to_string(),
        };
        let decision = self.engine.evaluate(&applicant, &request_id);

        record.state = if decision.approved {
            RequestState::Approved
        } else {
            RequestState::Rejected
        };
        record.rejection_reasons = if decision.approved {
            None
        } else {
            Some(decision.reasons.join("; "))
        };
        record.completed_at = Some(Utc::now());
        record.elapsed_ms = Some(decision.total_elapsed_ms);

        if let Err(err) = self.repository.update(record.clone()) {
            warn!(request_id = %request_id.0, error = %err, "failed to persist decision outcome");
            record.state = RequestState::Error;
            // Best effort; the original update already failed.
            let _ = self.repository.update(record);
            return Err(err.into());
        }

        Ok(decision)
    }

    pub fn get(&self, id: &RequestId) -> Result<ApplicationRequest, ScreeningServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Chronological audit trail for one request; errors when the request
    /// itself does not exist.
    pub fn audit_trail(&self, id: &RequestId) -> Result<Vec<AuditEntry>, ScreeningServiceError> {
        self.repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(self.audit.entries_for(id))
    }

    pub fn by_applicant(
        &self,
        applicant_id: &str,
    ) -> Result<Vec<ApplicationRequest>, ScreeningServiceError> {
        Ok(self.repository.find_by_applicant(applicant_id)?)
    }

    pub fn approved(&self) -> Result<Vec<ApplicationRequest>, ScreeningServiceError> {
        Ok(self.repository.with_outcome(true)?)
    }

    pub fn rejected(&self) -> Result<Vec<ApplicationRequest>, ScreeningServiceError> {
        Ok(self.repository.with_outcome(false)?)
    }
}

/// Error raised by the screening service.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
