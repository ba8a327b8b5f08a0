use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use super::checks;
use super::config::EngineConfig;
use super::domain::{Applicant, CheckOutcome, Decision, DecisionChecks, RejectionReason, RequestId};
use crate::audit::{AuditRecorder, CheckKind, NewAuditEntry};
use crate::registry::{CredentialLookup, EnrollmentLookup, TierLookup};

/// Stateless decision engine running the five eligibility checks.
///
/// Every check runs unconditionally so the audit trail stays complete even
/// when an early check has already failed; approval requires all five to
/// pass. The engine owns no mutable state and is safe to invoke concurrently
/// for different requests.
pub struct DecisionEngine<A> {
    tier: Arc<dyn TierLookup>,
    credential: Arc<dyn CredentialLookup>,
    enrollment: Arc<dyn EnrollmentLookup>,
    audit: Arc<A>,
    config: EngineConfig,
}

impl<A> DecisionEngine<A>
where
    A: AuditRecorder + 'static,
{
    pub fn new(
        tier: Arc<dyn TierLookup>,
        credential: Arc<dyn CredentialLookup>,
        enrollment: Arc<dyn EnrollmentLookup>,
        audit: Arc<A>,
        config: EngineConfig,
    ) -> Self {
        Self {
            tier,
            credential,
            enrollment,
            audit,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full pipeline for one applicant, emitting six audit entries
    /// and returning the aggregate decision.
    pub fn evaluate(&self, applicant: &Applicant, request_id: &RequestId) -> Decision {
        let started = Instant::now();

        let age = self.timed(request_id, CheckKind::Tier, || {
            checks::check_age(applicant.age, &self.config)
        });
        let coherence = self.timed(request_id, CheckKind::Tier, || {
            checks::check_coherence(applicant, &self.config)
        });
        let tier = self.timed(request_id, CheckKind::Tier, || {
            checks::check_tier(&applicant.id, self.tier.as_ref())
        });
        let credential = self.timed(request_id, CheckKind::Credential, || {
            checks::check_credential(&applicant.id, self.credential.as_ref())
        });
        let enrollment = self.timed(request_id, CheckKind::Enrollment, || {
            checks::check_enrollment(&applicant.enrollment_id, self.enrollment.as_ref(), &self.config)
        });

        let outcomes = [&age, &coherence, &tier, &credential, &enrollment];
        let approved = outcomes.iter().all(|outcome| outcome.passed);
        let failed: Vec<RejectionReason> = outcomes
            .iter()
            .filter_map(|outcome| outcome.rejection_reason)
            .collect();
        let reasons: Vec<String> = outcomes
            .iter()
            .map(|outcome| outcome.message.clone())
            .collect();

        let total_elapsed_ms = started.elapsed().as_millis() as u64;
        let message = if approved {
            "application approved - meets all program requirements".to_string()
        } else {
            format!(
                "application rejected - {} requirement(s) not met",
                failed.len()
            )
        };

        let final_detail = if approved {
            reasons.join("; ")
        } else {
            let codes: Vec<&str> = failed.iter().map(|reason| reason.code()).collect();
            format!("rejection reasons: {}", codes.join(", "))
        };
        self.audit.record(NewAuditEntry {
            request_id: request_id.clone(),
            kind: CheckKind::Final,
            passed: approved,
            message: if approved {
                "APPLICATION APPROVED".to_string()
            } else {
                "APPLICATION REJECTED".to_string()
            },
            detail: final_detail,
            elapsed_ms: total_elapsed_ms,
        });

        info!(
            request_id = %request_id.0,
            approved,
            elapsed_ms = total_elapsed_ms,
            "screening decision reached"
        );

        Decision {
            request_id: request_id.clone(),
            approved,
            message,
            reasons,
            total_elapsed_ms,
            checks: DecisionChecks {
                tier,
                credential,
                enrollment,
            },
        }
    }

    /// Run one check, stamp its wall-clock elapsed time, and append its audit
    /// entry before handing the outcome back.
    fn timed<F>(&self, request_id: &RequestId, kind: CheckKind, check: F) -> CheckOutcome
    where
        F: FnOnce() -> CheckOutcome,
    {
        let started = Instant::now();
        let mut outcome = check();
        outcome.elapsed_ms = started.elapsed().as_millis() as u64;

        self.audit.record(NewAuditEntry {
            request_id: request_id.clone(),
            kind,
            passed: outcome.passed,
            message: outcome.message.clone(),
            detail: outcome.detail.clone(),
            elapsed_ms: outcome.elapsed_ms,
        });

        outcome
    }
}
