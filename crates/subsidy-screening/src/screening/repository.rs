use super::domain::{ApplicationRequest, RequestId};

/// Storage abstraction for persisted screening requests, implementable over
/// any durable keyed store. The in-memory adapter in the service crate is the
/// reference implementation.
pub trait RequestRepository: Send + Sync {
    fn insert(&self, record: ApplicationRequest) -> Result<ApplicationRequest, RepositoryError>;
    fn update(&self, record: ApplicationRequest) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &RequestId) -> Result<Option<ApplicationRequest>, RepositoryError>;
    fn find_by_applicant(&self, applicant_id: &str)
        -> Result<Vec<ApplicationRequest>, RepositoryError>;
    /// Completed requests with the given outcome (`true` = approved).
    fn with_outcome(&self, approved: bool) -> Result<Vec<ApplicationRequest>, RepositoryError>;
    fn all(&self) -> Result<Vec<ApplicationRequest>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
