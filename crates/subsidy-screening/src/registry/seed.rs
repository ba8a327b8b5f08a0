//! CSV seed loaders for the registry snapshots.
//!
//! One file per registry, header row required:
//!
//! - `tiers.csv`: `applicant_id,tier,score`
//! - `credentials.csv`: `applicant_id,program,institution,credential_type`
//! - `enrollments.csv`: `enrollment_id,institution,program,status,weekly_hours`
//!
//! The loaders only establish the key/record contract the pipeline depends
//! on; richer ingestion formats are out of scope.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::{CredentialRecord, EnrollmentRecord, EnrollmentStatus, Tier, TierRecord};

pub const TIER_SEED_FILE: &str = "tiers.csv";
pub const CREDENTIAL_SEED_FILE: &str = "credentials.csv";
pub const ENROLLMENT_SEED_FILE: &str = "enrollments.csv";

/// Seed loading failure.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to open seed file {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed seed row: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid seed value for key '{key}': {reason}")]
    Invalid { key: String, reason: String },
}

/// Snapshot maps for all three registries, loaded from one seed directory.
pub struct SeedData {
    pub tiers: HashMap<String, TierRecord>,
    pub credentials: HashMap<String, CredentialRecord>,
    pub enrollments: HashMap<String, EnrollmentRecord>,
}

impl SeedData {
    /// Load the three well-known seed files from `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self, SeedError> {
        Ok(Self {
            tiers: load_tiers(open(&dir.join(TIER_SEED_FILE))?)?,
            credentials: load_credentials(open(&dir.join(CREDENTIAL_SEED_FILE))?)?,
            enrollments: load_enrollments(open(&dir.join(ENROLLMENT_SEED_FILE))?)?,
        })
    }
}

fn open(path: &Path) -> Result<File, SeedError> {
    File::open(path).map_err(|source| SeedError::Open {
        path: path.display().to_string(),
        source,
    })
}

#[derive(Debug, Deserialize)]
struct TierRow {
    applicant_id: String,
    tier: String,
    score: f64,
}

pub fn load_tiers<R: Read>(reader: R) -> Result<HashMap<String, TierRecord>, SeedError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = HashMap::new();

    for row in csv_reader.deserialize::<TierRow>() {
        let row = row?;
        let tier: Tier = row.tier.parse().map_err(|reason| SeedError::Invalid {
            key: row.applicant_id.clone(),
            reason,
        })?;
        records.insert(row.applicant_id, TierRecord::new(tier, row.score));
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct CredentialRow {
    applicant_id: String,
    program: String,
    institution: String,
    credential_type: String,
}

pub fn load_credentials<R: Read>(reader: R) -> Result<HashMap<String, CredentialRecord>, SeedError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = HashMap::new();

    for row in csv_reader.deserialize::<CredentialRow>() {
        let row = row?;
        records.insert(
            row.applicant_id.clone(),
            CredentialRecord::held(&row.program, &row.institution, &row.credential_type),
        );
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct EnrollmentRow {
    enrollment_id: String,
    institution: String,
    program: String,
    status: String,
    weekly_hours: u32,
}

pub fn load_enrollments<R: Read>(
    reader: R,
) -> Result<HashMap<String, EnrollmentRecord>, SeedError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = HashMap::new();

    for row in csv_reader.deserialize::<EnrollmentRow>() {
        let row = row?;
        let status: EnrollmentStatus =
            row.status.parse().map_err(|reason| SeedError::Invalid {
                key: row.enrollment_id.clone(),
                reason,
            })?;
        records.insert(
            row.enrollment_id,
            EnrollmentRecord::new(&row.institution, &row.program, status, row.weekly_hours),
        );
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn tier_rows_parse_into_records() {
        let csv = "applicant_id,tier,score\n1000000001,B,48.20\n1000000002,D,71.00\n";
        let records = load_tiers(Cursor::new(csv)).expect("valid seed");

        assert_eq!(records.len(), 2);
        let record = &records["1000000001"];
        assert_eq!(record.tier, Some(Tier::B));
        assert_eq!(record.score, Some(48.20));
    }

    #[test]
    fn unknown_tier_letter_is_rejected() {
        let csv = "applicant_id,tier,score\n1000000001,Z,10.0\n";
        match load_tiers(Cursor::new(csv)) {
            Err(SeedError::Invalid { key, .. }) => assert_eq!(key, "1000000001"),
            other => panic!("expected invalid seed error, got {other:?}"),
        }
    }

    #[test]
    fn credential_rows_mark_credentials_held() {
        let csv = "applicant_id,program,institution,credential_type\n\
                   1000000003,Systems Engineering,National University,undergraduate\n";
        let records = load_credentials(Cursor::new(csv)).expect("valid seed");

        let record = &records["1000000003"];
        assert!(record.has_credential);
        assert_eq!(record.program.as_deref(), Some("Systems Engineering"));
    }

    #[test]
    fn enrollment_rows_parse_status_and_hours() {
        let csv = "enrollment_id,institution,program,status,weekly_hours\n\
                   ENR-001,Tech Institute,Welding,active,24\n\
                   ENR-002,Night School,Accounting,INACTIVE,12\n";
        let records = load_enrollments(Cursor::new(csv)).expect("valid seed");

        assert_eq!(records["ENR-001"].status, EnrollmentStatus::Active);
        assert_eq!(records["ENR-002"].weekly_hours, 12);
    }
}
