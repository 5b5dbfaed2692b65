use chrono::{DateTime, Utc};

use super::domain::{Candidate, CandidateId, NewCandidate};

/// Storage abstraction for committed candidatures.
pub trait CandidateRepository: Send + Sync {
    /// Persist a new record. The repository assigns the identifier and stamps `created_at`
    /// and `updated_at` with `now`.
    fn insert(
        &self,
        candidate: NewCandidate,
        now: DateTime<Utc>,
    ) -> Result<Candidate, RepositoryError>;

    fn fetch(&self, id: CandidateId) -> Result<Option<Candidate>, RepositoryError>;
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
