//! Append-only audit trail for the screening pipeline.
//!
//! Every validation step emits one entry and the final decision a sixth; a
//! completed request always has exactly five per-check entries plus one
//! `FINAL`. Entries are immutable once recorded and retrievable per request in
//! insertion (chronological) order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::screening::domain::RequestId;

/// Which step of the pipeline an audit entry belongs to.
///
/// The age and identifier-coherence checks are filed under `Tier`: they run
/// against the applicant identity rather than a dedicated registry, and the
/// trail keeps the four-kind taxonomy of the reporting layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckKind {
    Tier,
    Credential,
    Enrollment,
    Final,
}

impl CheckKind {
    pub fn label(&self) -> &'static str {
        match self {
            CheckKind::Tier => "TIER",
            CheckKind::Credential => "CREDENTIAL",
            CheckKind::Enrollment => "ENROLLMENT",
            CheckKind::Final => "FINAL",
        }
    }
}

/// One immutable audit row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: u64,
    pub request_id: RequestId,
    pub kind: CheckKind,
    pub passed: bool,
    pub message: String,
    pub detail: String,
    pub elapsed_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// Entry payload as produced by the pipeline; the recorder assigns the entry
/// id and timestamp on append.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditEntry {
    pub request_id: RequestId,
    pub kind: CheckKind,
    pub passed: bool,
    pub message: String,
    pub detail: String,
    pub elapsed_ms: u64,
}

/// Recorder contract: fire-and-forget append, ordered retrieval.
///
/// Implementations must keep one request's entries in insertion order under
/// concurrent appends from other requests.
pub trait AuditRecorder: Send + Sync {
    fn record(&self, entry: NewAuditEntry);

    /// All entries for one request, sorted by timestamp ascending.
    fn entries_for(&self, request_id: &RequestId) -> Vec<AuditEntry>;

    /// All entries of one kind across every request, for read-side reporting.
    fn entries_of_kind(&self, kind: CheckKind) -> Vec<AuditEntry>;
}
