//! Candidate to vacancy matching: criterion evaluation, score aggregation, ranking and the
//! service facade consumed by the admin UI.

pub mod completeness;
pub mod domain;
pub mod evaluation;
pub mod import;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use completeness::{CompletenessReport, CompletenessScorer, ProfileSection, SectionScore};
pub use domain::{
    Application, Candidate, CandidateId, CandidateProfile, CandidateSummary, CompanyId,
    ContactDetails, EducationEntry, LicenseCategories, LicenseCategory, Vacancy, VacancyId,
    VacancyStatus, WorkExperience,
};
pub use evaluation::{
    AggregateScore, CandidateEvaluator, Criterion, CriterionDetail, CriterionResult,
    CriterionWeights, MatchResult, MatchingConfig, MatchingConfigError, ScoreAggregator, Tier,
    TierThresholds,
};
pub use import::{PortalSnapshot, SnapshotImportError, SnapshotImporter};
pub use ranking::{Ranking, RankingEngine, RankingError};
pub use repository::{CandidatePool, RepositoryError, VacancyDirectory};
pub use router::matching_router;
pub use service::{MatchingError, MatchingErrorKind, MatchingService, RankedResult};
