use std::collections::HashSet;

use super::domain::{Candidate, CandidateId, Vacancy, VacancyId};

/// Read access to the candidate registry owned by the profile subsystem.
pub trait CandidatePool: Send + Sync {
    /// Every candidate not soft-deactivated, loaded in one bulk read.
    fn active_candidates(&self) -> Result<Vec<Candidate>, RepositoryError>;
    fn candidate(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError>;
}

/// Read access to vacancies and the applications filed against them.
pub trait VacancyDirectory: Send + Sync {
    fn vacancy(&self, id: &VacancyId) -> Result<Option<Vacancy>, RepositoryError>;
    /// Ids of every candidate holding an application for the vacancy, in one bulk read.
    fn applicants(&self, vacancy_id: &VacancyId) -> Result<HashSet<CandidateId>, RepositoryError>;
}

/// Error enumeration for data-source failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("data source unavailable: {0}")]
    Unavailable(String),
    #[error("data source timed out after {0} ms")]
    TimedOut(u64),
}
