use serde::{Deserialize, Serialize};

/// Numeric identifier band tied to a representative birth year. National IDs
/// are issued in cohort blocks, so the band a number falls in bounds the
/// holder's plausible age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdBand {
    pub min: u64,
    pub max: u64,
    pub birth_year: i64,
}

impl IdBand {
    pub const fn new(min: u64, max: u64, birth_year: i64) -> Self {
        Self {
            min,
            max,
            birth_year,
        }
    }

    pub fn contains(&self, id: u64) -> bool {
        (self.min..=self.max).contains(&id)
    }
}

/// Eligibility rule configuration for the decision engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub min_age: u32,
    pub max_age: u32,
    /// Year ages are estimated against for the identifier coherence check.
    pub reference_year: i64,
    /// Maximum tolerated gap between declared and estimated age, in years.
    pub age_tolerance: i64,
    pub id_bands: Vec<IdBand>,
    pub min_weekly_hours: u32,
    pub denylisted_institutions: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_age: 14,
            max_age: 28,
            reference_year: 2025,
            age_tolerance: 4,
            id_bands: vec![
                IdBand::new(1_120_000_000, 1_150_000_000, 2008),
                IdBand::new(1_100_000_000, 1_119_999_999, 2003),
                IdBand::new(1_080_000_000, 1_099_999_999, 1998),
            ],
            min_weekly_hours: 20,
            denylisted_institutions: vec![
                "Instituto Digital Global".to_string(),
                "Universidad Virtual del Caribe Online".to_string(),
                "Centro Educativo Los Pinos".to_string(),
                "Academia Superior de Gestión".to_string(),
            ],
        }
    }
}

impl EngineConfig {
    /// Representative age for an identifier, or `None` when it falls outside
    /// every known issuance band.
    pub fn estimated_age(&self, id: u64) -> Option<i64> {
        self.id_bands
            .iter()
            .find(|band| band.contains(id))
            .map(|band| self.reference_year - band.birth_year)
    }

    pub fn institution_denylisted(&self, institution: &str) -> bool {
        self.denylisted_institutions
            .iter()
            .any(|name| name == institution)
    }
}
