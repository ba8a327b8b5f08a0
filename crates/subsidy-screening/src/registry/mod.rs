//! Lookup ports for the three reference registries.
//!
//! Each port is a synchronous key-to-record lookup; absence is a normal
//! outcome signalled by the record's `found`/`has_credential` flag, never an
//! error. Runtime implementations are immutable snapshots preloaded before the
//! first request (see [`snapshot`]), optionally delayed by an injectable
//! latency strategy (see [`latency`]) to emulate the real network dependency.

pub mod latency;
pub mod seed;
pub mod snapshot;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use latency::{LatencyProvider, NoLatency, UniformLatency};
pub use seed::{SeedData, SeedError};
pub use snapshot::{CredentialSnapshot, EnrollmentSnapshot, TierSnapshot};

/// Eligibility tier assigned by the identity-tier registry.
/// Tiers A through C qualify for the program; D does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    A,
    B,
    C,
    D,
}

impl Tier {
    pub fn eligible(&self) -> bool {
        !matches!(self, Tier::D)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Tier::A => "extreme need",
            Tier::B => "moderate need",
            Tier::C => "vulnerable",
            Tier::D => "not vulnerable",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
        };
        f.write_str(letter)
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Tier::A),
            "B" => Ok(Tier::B),
            "C" => Ok(Tier::C),
            "D" => Ok(Tier::D),
            other => Err(format!("unknown tier '{other}'")),
        }
    }
}

/// Identity-tier registry record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierRecord {
    pub found: bool,
    pub tier: Option<Tier>,
    pub score: Option<f64>,
}

impl TierRecord {
    pub fn new(tier: Tier, score: f64) -> Self {
        Self {
            found: true,
            tier: Some(tier),
            score: Some(score),
        }
    }

    pub fn not_found() -> Self {
        Self {
            found: false,
            tier: None,
            score: None,
        }
    }
}

/// Credential registry record. Absence of a credential is the eligible case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub has_credential: bool,
    pub program: Option<String>,
    pub institution: Option<String>,
    pub credential_type: Option<String>,
}

impl CredentialRecord {
    pub fn held(program: &str, institution: &str, credential_type: &str) -> Self {
        Self {
            has_credential: true,
            program: Some(program.to_string()),
            institution: Some(institution.to_string()),
            credential_type: Some(credential_type.to_string()),
        }
    }

    pub fn none() -> Self {
        Self {
            has_credential: false,
            program: None,
            institution: None,
            credential_type: None,
        }
    }
}

/// Whether an enrollment is currently in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    Active,
    Inactive,
}

impl EnrollmentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EnrollmentStatus::Active => "ACTIVE",
            EnrollmentStatus::Inactive => "INACTIVE",
        }
    }
}

impl FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(EnrollmentStatus::Active),
            "INACTIVE" => Ok(EnrollmentStatus::Inactive),
            other => Err(format!("unknown enrollment status '{other}'")),
        }
    }
}

/// Enrollment registry record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub found: bool,
    pub institution: String,
    pub program: String,
    pub status: EnrollmentStatus,
    pub weekly_hours: u32,
}

impl EnrollmentRecord {
    pub fn new(
        institution: &str,
        program: &str,
        status: EnrollmentStatus,
        weekly_hours: u32,
    ) -> Self {
        Self {
            found: true,
            institution: institution.to_string(),
            program: program.to_string(),
            status,
            weekly_hours,
        }
    }

    pub fn not_found() -> Self {
        Self {
            found: false,
            institution: String::new(),
            program: String::new(),
            status: EnrollmentStatus::Inactive,
            weekly_hours: 0,
        }
    }
}

/// Identity-tier registry port, keyed by applicant identifier.
pub trait TierLookup: Send + Sync {
    fn lookup(&self, applicant_id: &str) -> TierRecord;
}

/// Credential registry port, keyed by applicant identifier.
pub trait CredentialLookup: Send + Sync {
    fn lookup(&self, applicant_id: &str) -> CredentialRecord;
}

/// Enrollment registry port, keyed by enrollment identifier.
pub trait EnrollmentLookup: Send + Sync {
    fn lookup(&self, enrollment_id: &str) -> EnrollmentRecord;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_a_through_c_are_eligible() {
        assert!(Tier::A.eligible());
        assert!(Tier::B.eligible());
        assert!(Tier::C.eligible());
        assert!(!Tier::D.eligible());
    }

    #[test]
    fn tier_parsing_is_case_insensitive() {
        assert_eq!("b".parse::<Tier>(), Ok(Tier::B));
        assert!("E".parse::<Tier>().is_err());
    }

    #[test]
    fn enrollment_status_parses_either_case() {
        assert_eq!(
            "active".parse::<EnrollmentStatus>(),
            Ok(EnrollmentStatus::Active)
        );
        assert_eq!(
            "INACTIVE".parse::<EnrollmentStatus>(),
            Ok(EnrollmentStatus::Inactive)
        );
        assert!("suspended".parse::<EnrollmentStatus>().is_err());
    }
}
