//! Immutable, preloaded registry snapshots.
//!
//! A snapshot is built once from seed data before the first request and never
//! mutated afterwards, so concurrent reads need no locking. Every lookup first
//! defers to the configured latency strategy, then resolves against the map;
//! a missing key yields the registry's not-found record.

use std::collections::HashMap;
use std::sync::Arc;

use super::latency::{LatencyProvider, NoLatency};
use super::{
    CredentialLookup, CredentialRecord, EnrollmentLookup, EnrollmentRecord, TierLookup, TierRecord,
};

pub struct TierSnapshot {
    records: HashMap<String, TierRecord>,
    latency: Arc<dyn LatencyProvider>,
}

impl TierSnapshot {
    pub fn new(records: HashMap<String, TierRecord>, latency: Arc<dyn LatencyProvider>) -> Self {
        Self { records, latency }
    }

    pub fn without_latency(records: HashMap<String, TierRecord>) -> Self {
        Self::new(records, Arc::new(NoLatency))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TierLookup for TierSnapshot {
    fn lookup(&self, applicant_id: &str) -> TierRecord {
        self.latency.wait();
        self.records
            .get(applicant_id)
            .cloned()
            .unwrap_or_else(TierRecord::not_found)
    }
}

pub struct CredentialSnapshot {
    records: HashMap<String, CredentialRecord>,
    latency: Arc<dyn LatencyProvider>,
}

impl CredentialSnapshot {
    pub fn new(
        records: HashMap<String, CredentialRecord>,
        latency: Arc<dyn LatencyProvider>,
    ) -> Self {
        Self { records, latency }
    }

    pub fn without_latency(records: HashMap<String, CredentialRecord>) -> Self {
        Self::new(records, Arc::new(NoLatency))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl CredentialLookup for CredentialSnapshot {
    fn lookup(&self, applicant_id: &str) -> CredentialRecord {
        self.latency.wait();
        self.records
            .get(applicant_id)
            .cloned()
            .unwrap_or_else(CredentialRecord::none)
    }
}

pub struct EnrollmentSnapshot {
    records: HashMap<String, EnrollmentRecord>,
    latency: Arc<dyn LatencyProvider>,
}

impl EnrollmentSnapshot {
    pub fn new(
        records: HashMap<String, EnrollmentRecord>,
        latency: Arc<dyn LatencyProvider>,
    ) -> Self {
        Self { records, latency }
    }

    pub fn without_latency(records: HashMap<String, EnrollmentRecord>) -> Self {
        Self::new(records, Arc::new(NoLatency))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl EnrollmentLookup for EnrollmentSnapshot {
    fn lookup(&self, enrollment_id: &str) -> EnrollmentRecord {
        self.latency.wait();
        self.records
            .get(enrollment_id)
            .cloned()
            .unwrap_or_else(EnrollmentRecord::not_found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{EnrollmentStatus, Tier};

    #[test]
    fn missing_tier_key_resolves_to_not_found() {
        let snapshot = TierSnapshot::without_latency(HashMap::new());
        let record = snapshot.lookup("1000000001");
        assert!(!record.found);
        assert!(record.tier.is_none());
    }

    #[test]
    fn present_keys_resolve_to_their_records() {
        let mut records = HashMap::new();
        records.insert("1000000001".to_string(), TierRecord::new(Tier::B, 48.5));
        let snapshot = TierSnapshot::without_latency(records);

        let record = snapshot.lookup("1000000001");
        assert!(record.found);
        assert_eq!(record.tier, Some(Tier::B));
    }

    #[test]
    fn missing_credential_key_means_no_credential() {
        let snapshot = CredentialSnapshot::without_latency(HashMap::new());
        assert!(!snapshot.lookup("1000000001").has_credential);
    }

    #[test]
    fn missing_enrollment_key_resolves_to_not_found() {
        let mut records = HashMap::new();
        records.insert(
            "ENR-001".to_string(),
            EnrollmentRecord::new("Tech Institute", "Welding", EnrollmentStatus::Active, 24),
        );
        let snapshot = EnrollmentSnapshot::without_latency(records);

        assert!(snapshot.lookup("ENR-001").found);
        assert!(!snapshot.lookup("ENR-999").found);
    }
}
