use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of one screening request. A new one is minted per submission;
/// identical inputs never reuse a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

/// Transient screening input; never persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub id: String,
    pub age: u32,
    pub enrollment_id: String,
}

/// Why a check failed. `SystemError` marks a fault confined to one check,
/// not a business rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionReason {
    AgeOutOfRange,
    IdAgeIncoherent,
    TierNotFound,
    TierNotEligible,
    HasCredential,
    EnrollmentNotFound,
    EnrollmentInactive,
    InsufficientHours,
    InstitutionNotRecognized,
    SystemError,
}

impl RejectionReason {
    pub fn description(&self) -> &'static str {
        match self {
            RejectionReason::AgeOutOfRange => "age outside the permitted range (14-28)",
            RejectionReason::IdAgeIncoherent => {
                "identifier inconsistent with declared age (possible fraud)"
            }
            RejectionReason::TierNotFound => "no record in the tier registry",
            RejectionReason::TierNotEligible => "tier not eligible (only A, B, C qualify)",
            RejectionReason::HasCredential => "already holds a recognized credential",
            RejectionReason::EnrollmentNotFound => "enrollment not found in the registry",
            RejectionReason::EnrollmentInactive => "enrollment is not active",
            RejectionReason::InsufficientHours => "weekly load below the 20-hour minimum",
            RejectionReason::InstitutionNotRecognized => "institution not recognized",
            RejectionReason::SystemError => "system error during validation",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            RejectionReason::AgeOutOfRange => "AGE_OUT_OF_RANGE",
            RejectionReason::IdAgeIncoherent => "ID_AGE_INCOHERENT",
            RejectionReason::TierNotFound => "TIER_NOT_FOUND",
            RejectionReason::TierNotEligible => "TIER_NOT_ELIGIBLE",
            RejectionReason::HasCredential => "HAS_CREDENTIAL",
            RejectionReason::EnrollmentNotFound => "ENROLLMENT_NOT_FOUND",
            RejectionReason::EnrollmentInactive => "ENROLLMENT_INACTIVE",
            RejectionReason::InsufficientHours => "INSUFFICIENT_HOURS",
            RejectionReason::InstitutionNotRecognized => "INSTITUTION_NOT_RECOGNIZED",
            RejectionReason::SystemError => "SYSTEM_ERROR",
        }
    }
}

/// Result of one eligibility check. Immutable once the pipeline hands it out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub passed: bool,
    pub message: String,
    pub detail: String,
    pub rejection_reason: Option<RejectionReason>,
    pub elapsed_ms: u64,
}

impl CheckOutcome {
    pub fn passed(message: String, detail: String) -> Self {
        Self {
            passed: true,
            message,
            detail,
            rejection_reason: None,
            elapsed_ms: 0,
        }
    }

    pub fn failed(message: String, detail: String, reason: RejectionReason) -> Self {
        Self {
            passed: false,
            message,
            detail,
            rejection_reason: Some(reason),
            elapsed_ms: 0,
        }
    }
}

/// Per-registry check outcomes carried on the decision for explainability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionChecks {
    pub tier: CheckOutcome,
    pub credential: CheckOutcome,
    pub enrollment: CheckOutcome,
}

/// Aggregate outcome of one evaluation. Produced exactly once per invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub request_id: RequestId,
    pub approved: bool,
    pub message: String,
    /// Messages of all five checks, passing and failing, in check order.
    pub reasons: Vec<String>,
    pub total_elapsed_ms: u64,
    pub checks: DecisionChecks,
}

/// Lifecycle state of a persisted screening request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestState {
    Pending,
    Approved,
    Rejected,
    Error,
}

impl RequestState {
    pub fn label(&self) -> &'static str {
        match self {
            RequestState::Pending => "PENDING",
            RequestState::Approved => "APPROVED",
            RequestState::Rejected => "REJECTED",
            RequestState::Error => "ERROR",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestState::Pending)
    }
}

/// Persisted record of one screening request. Created `Pending` and moved to
/// a terminal state exactly once by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRequest {
    pub id: RequestId,
    pub applicant_id: String,
    pub enrollment_id: String,
    pub state: RequestState,
    /// Semicolon-joined messages of all five checks; populated on rejection.
    pub rejection_reasons: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub elapsed_ms: Option<u64>,
}

impl ApplicationRequest {
    pub fn pending(id: RequestId, applicant_id: &str, enrollment_id: &str) -> Self {
        Self {
            id,
            applicant_id: applicant_id.to_string(),
            enrollment_id: enrollment_id.to_string(),
            state: RequestState::Pending,
            rejection_reasons: None,
            submitted_at: Utc::now(),
            completed_at: None,
            elapsed_ms: None,
        }
    }
}
