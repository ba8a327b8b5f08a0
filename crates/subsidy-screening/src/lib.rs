//! Automated eligibility screening for a means-tested youth subsidy.
//!
//! The crate is organized around a single decision pipeline: five eligibility
//! checks run against three reference registries, every step is recorded in an
//! append-only audit trail, and the aggregate outcome is returned as a
//! structured decision. The HTTP router, registry snapshots, and metrics
//! reporting are thin layers around that pipeline.

pub mod audit;
pub mod config;
pub mod error;
pub mod registry;
pub mod screening;
pub mod telemetry;
