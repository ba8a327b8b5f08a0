//! The five eligibility rules, one function per check.
//!
//! Each function is total: anything unexpected (an unparseable identifier, a
//! malformed registry row) becomes a failing outcome with `SystemError`
//! instead of escaping, so the remaining checks always still run. Elapsed
//! times are stamped by the engine, not here.

use tracing::{debug, warn};

use super::config::EngineConfig;
use super::domain::{Applicant, CheckOutcome, RejectionReason};
use crate::registry::{CredentialLookup, EnrollmentLookup, EnrollmentStatus, TierLookup};

/// Check 1: declared age inside the program window.
pub(crate) fn check_age(age: u32, config: &EngineConfig) -> CheckOutcome {
    let in_range = age >= config.min_age && age <= config.max_age;
    let detail = format!(
        "declared age {age}, permitted range {}-{}",
        config.min_age, config.max_age
    );

    if in_range {
        CheckOutcome::passed(
            format!(
                "age {age} within the permitted range ({}-{})",
                config.min_age, config.max_age
            ),
            detail,
        )
    } else {
        CheckOutcome::failed(
            format!(
                "age {age} outside the permitted range ({}-{})",
                config.min_age, config.max_age
            ),
            detail,
            RejectionReason::AgeOutOfRange,
        )
    }
}

/// Check 2: anti-fraud heuristic comparing declared age against the age the
/// identifier's issuance band implies. An identifier outside every known band
/// passes vacuously; that permissive fallback is deliberate policy for now.
pub(crate) fn check_coherence(applicant: &Applicant, config: &EngineConfig) -> CheckOutcome {
    let id_number: u64 = match applicant.id.trim().parse() {
        Ok(value) => value,
        Err(err) => {
            warn!(applicant_id = %applicant.id, "identifier not numeric, coherence check failed");
            return CheckOutcome::failed(
                "identifier could not be parsed for coherence screening".to_string(),
                format!("identifier '{}': {err}", applicant.id),
                RejectionReason::SystemError,
            );
        }
    };

    let Some(estimated) = config.estimated_age(id_number) else {
        debug!(applicant_id = %applicant.id, "identifier outside known bands, coherence assumed");
        return CheckOutcome::passed(
            "identifier outside known issuance bands, coherence assumed".to_string(),
            format!(
                "identifier {}, declared age {}, no issuance band matched",
                applicant.id, applicant.age
            ),
        );
    };

    let difference = (estimated - i64::from(applicant.age)).abs();
    let detail = format!(
        "identifier {}, declared age {}, estimated age {estimated}, difference {difference} years",
        applicant.id, applicant.age
    );

    if difference <= config.age_tolerance {
        CheckOutcome::passed(
            format!(
                "identifier consistent with declared age (declared {}, estimated {estimated})",
                applicant.age
            ),
            detail,
        )
    } else {
        CheckOutcome::failed(
            format!(
                "identifier inconsistent with declared age (declared {}, estimated {estimated}, difference {difference})",
                applicant.age
            ),
            detail,
            RejectionReason::IdAgeIncoherent,
        )
    }
}

/// Check 3: the tier registry must hold the applicant in an eligible tier.
pub(crate) fn check_tier(applicant_id: &str, registry: &dyn TierLookup) -> CheckOutcome {
    let record = registry.lookup(applicant_id);

    if !record.found {
        return CheckOutcome::failed(
            "no record found in the tier registry".to_string(),
            format!("identifier {applicant_id} missing from the tier registry"),
            RejectionReason::TierNotFound,
        );
    }

    let Some(tier) = record.tier else {
        warn!(applicant_id, "tier registry returned a record without a tier");
        return CheckOutcome::failed(
            "tier registry returned a malformed record".to_string(),
            format!("identifier {applicant_id}: record found but tier missing"),
            RejectionReason::SystemError,
        );
    };

    let score = record.score.unwrap_or_default();
    let detail = format!(
        "tier registry consulted: identifier {applicant_id}, tier {tier}, score {score:.2}"
    );

    if tier.eligible() {
        CheckOutcome::passed(
            format!("tier {tier} ({}) - eligible", tier.description()),
            detail,
        )
    } else {
        CheckOutcome::failed(
            format!("tier {tier} ({}) - not eligible", tier.description()),
            detail,
            RejectionReason::TierNotEligible,
        )
    }
}

/// Check 4: the applicant must not already hold a recognized credential.
pub(crate) fn check_credential(applicant_id: &str, registry: &dyn CredentialLookup) -> CheckOutcome {
    let record = registry.lookup(applicant_id);

    if !record.has_credential {
        return CheckOutcome::passed(
            "no recognized credential on record - eligible".to_string(),
            format!("credential registry: no credential registered for {applicant_id}"),
        );
    }

    let program = record.program.as_deref().unwrap_or("unspecified");
    let credential_type = record.credential_type.as_deref().unwrap_or("unspecified");
    let institution = record.institution.as_deref().unwrap_or("unspecified");

    CheckOutcome::failed(
        format!("credential already held: {program} ({credential_type}) - not eligible"),
        format!(
            "credential registry: program {program}, institution {institution}, type {credential_type}"
        ),
        RejectionReason::HasCredential,
    )
}

/// Check 5: a valid enrollment. The four sub-conditions are evaluated in
/// priority order and only the first failure is reported.
pub(crate) fn check_enrollment(
    enrollment_id: &str,
    registry: &dyn EnrollmentLookup,
    config: &EngineConfig,
) -> CheckOutcome {
    let record = registry.lookup(enrollment_id);

    if !record.found {
        return CheckOutcome::failed(
            "enrollment not found in the registry".to_string(),
            format!("enrollment id {enrollment_id}"),
            RejectionReason::EnrollmentNotFound,
        );
    }

    if record.status != EnrollmentStatus::Active {
        return CheckOutcome::failed(
            format!("enrollment is not active (status: {})", record.status.label()),
            format!("current status: {}", record.status.label()),
            RejectionReason::EnrollmentInactive,
        );
    }

    if record.weekly_hours < config.min_weekly_hours {
        return CheckOutcome::failed(
            format!(
                "weekly load {}h below the {}h minimum",
                record.weekly_hours, config.min_weekly_hours
            ),
            format!("current load: {} hours/week", record.weekly_hours),
            RejectionReason::InsufficientHours,
        );
    }

    if config.institution_denylisted(&record.institution) {
        return CheckOutcome::failed(
            format!("institution not recognized: {}", record.institution),
            "institution on the exclusion list".to_string(),
            RejectionReason::InstitutionNotRecognized,
        );
    }

    CheckOutcome::passed(
        format!(
            "active enrollment at {} ({}h/week) - eligible",
            record.institution, record.weekly_hours
        ),
        format!(
            "enrollment {enrollment_id}: institution {}, program {}, status {}, load {}h",
            record.institution,
            record.program,
            record.status.label(),
            record.weekly_hours
        ),
    )
}
