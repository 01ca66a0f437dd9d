use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::completeness::{CompletenessReport, CompletenessScorer};
use super::domain::{CandidateId, VacancyId, VacancyStatus};
use super::evaluation::{MatchResult, MatchingConfig, MatchingConfigError};
use super::ranking::{RankingEngine, RankingError};
use super::repository::{CandidatePool, RepositoryError, VacancyDirectory};

const MAX_IDENTIFIER_LEN: usize = 64;

/// Ranked candidates returned to the admin UI for one vacancy.
#[derive(Debug, Clone, Serialize)]
pub struct RankedResult {
    pub vacancy_id: VacancyId,
    pub limit: usize,
    pub evaluated: usize,
    pub generated_at: DateTime<Utc>,
    pub matches: Vec<MatchResult>,
}

/// Entry point enforcing the input contract around the ranking engine.
pub struct MatchingService<C, V> {
    engine: RankingEngine<C, V>,
    candidates: Arc<C>,
    completeness: CompletenessScorer,
    config: MatchingConfig,
}

impl<C, V> MatchingService<C, V>
where
    C: CandidatePool + 'static,
    V: VacancyDirectory + 'static,
{
    pub fn new(
        candidates: Arc<C>,
        vacancies: Arc<V>,
        config: MatchingConfig,
    ) -> Result<Self, MatchingConfigError> {
        config.validate()?;
        let engine = RankingEngine::new(Arc::clone(&candidates), vacancies, &config);

        Ok(Self {
            engine,
            candidates,
            completeness: CompletenessScorer,
            config,
        })
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Rank candidates for a vacancy. `limit` defaults to the configured default when absent.
    pub async fn match_candidates(
        &self,
        vacancy_id: &str,
        limit: Option<i64>,
    ) -> Result<RankedResult, MatchingError> {
        let vacancy_id = parse_vacancy_id(vacancy_id)?;
        let limit = self.resolve_limit(limit)?;

        let started = Instant::now();
        let deadline = started + self.config.deadline();
        let outcome = tokio::time::timeout_at(
            tokio::time::Instant::from_std(deadline),
            self.engine.rank(&vacancy_id, limit, deadline),
        )
        .await;

        let ranking = match outcome {
            Ok(Ok(ranking)) => ranking,
            Ok(Err(error)) => {
                let error = self.translate(error, limit);
                warn!(%vacancy_id, kind = error.kind().as_str(), %error, "matching failed");
                return Err(error);
            }
            Err(_) => {
                let error = MatchingError::Timeout {
                    deadline_ms: self.config.deadline_ms,
                };
                warn!(%vacancy_id, kind = error.kind().as_str(), %error, "matching failed");
                return Err(error);
            }
        };

        info!(
            %vacancy_id,
            limit,
            evaluated = ranking.evaluated,
            returned = ranking.matches.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "ranked candidates for vacancy"
        );

        Ok(RankedResult {
            vacancy_id,
            limit,
            evaluated: ranking.evaluated,
            generated_at: Utc::now(),
            matches: ranking.matches,
        })
    }

    /// Completeness breakdown backing the profile progress indicator.
    pub fn profile_completeness(
        &self,
        candidate_id: &str,
    ) -> Result<CompletenessReport, MatchingError> {
        let id = CandidateId(candidate_id.trim().to_string());
        let candidate = self
            .candidates
            .candidate(&id)
            .map_err(MatchingError::DataSourceUnavailable)?
            .ok_or(MatchingError::CandidateNotFound(id))?;

        Ok(self.completeness.report(&candidate))
    }

    fn resolve_limit(&self, requested: Option<i64>) -> Result<usize, MatchingError> {
        let Some(requested) = requested else {
            return Ok(self.config.default_limit);
        };

        match usize::try_from(requested) {
            Ok(limit) if (1..=self.config.max_limit).contains(&limit) => Ok(limit),
            _ => Err(MatchingError::InvalidLimit {
                requested,
                max: self.config.max_limit,
            }),
        }
    }

    fn translate(&self, error: RankingError, limit: usize) -> MatchingError {
        match error {
            RankingError::VacancyNotFound(id) => MatchingError::VacancyNotFound(id),
            RankingError::VacancyNotMatchable { vacancy_id, status } => {
                MatchingError::VacancyNotMatchable { vacancy_id, status }
            }
            RankingError::InvalidLimit(_) => MatchingError::InvalidLimit {
                requested: limit as i64,
                max: self.config.max_limit,
            },
            RankingError::DataSource(source) => MatchingError::DataSourceUnavailable(source),
            RankingError::Timeout => MatchingError::Timeout {
                deadline_ms: self.config.deadline_ms,
            },
        }
    }
}

fn parse_vacancy_id(raw: &str) -> Result<VacancyId, MatchingError> {
    let trimmed = raw.trim();
    let well_formed = !trimmed.is_empty()
        && trimmed.len() <= MAX_IDENTIFIER_LEN
        && trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if well_formed {
        Ok(VacancyId(trimmed.to_string()))
    } else {
        Err(MatchingError::InvalidVacancyId(raw.to_string()))
    }
}

/// Caller-facing failure taxonomy of the matching service.
#[derive(Debug, thiserror::Error)]
pub enum MatchingError {
    #[error("vacancy {0} not found")]
    VacancyNotFound(VacancyId),
    #[error("vacancy {vacancy_id} is {status} and cannot be matched")]
    VacancyNotMatchable {
        vacancy_id: VacancyId,
        status: VacancyStatus,
    },
    #[error("limit must be between 1 and {max}, got {requested}")]
    InvalidLimit { requested: i64, max: usize },
    #[error("limit {0:?} is not a whole number")]
    MalformedLimit(String),
    #[error("vacancy id {0:?} is not well formed")]
    InvalidVacancyId(String),
    #[error("candidate {0} not found")]
    CandidateNotFound(CandidateId),
    #[error("candidate or vacancy store failed: {0}")]
    DataSourceUnavailable(#[source] RepositoryError),
    #[error("matching exceeded the {deadline_ms} ms deadline")]
    Timeout { deadline_ms: u64 },
}

impl MatchingError {
    pub fn kind(&self) -> MatchingErrorKind {
        match self {
            MatchingError::VacancyNotFound(_) => MatchingErrorKind::VacancyNotFound,
            MatchingError::VacancyNotMatchable { .. } => MatchingErrorKind::VacancyNotMatchable,
            MatchingError::InvalidLimit { .. } | MatchingError::MalformedLimit(_) => {
                MatchingErrorKind::InvalidLimit
            }
            MatchingError::InvalidVacancyId(_) => MatchingErrorKind::InvalidVacancyId,
            MatchingError::CandidateNotFound(_) => MatchingErrorKind::CandidateNotFound,
            MatchingError::DataSourceUnavailable(_) => MatchingErrorKind::DataSourceUnavailable,
            MatchingError::Timeout { .. } => MatchingErrorKind::Timeout,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingErrorKind {
    VacancyNotFound,
    VacancyNotMatchable,
    InvalidLimit,
    InvalidVacancyId,
    CandidateNotFound,
    DataSourceUnavailable,
    Timeout,
}

impl MatchingErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            MatchingErrorKind::VacancyNotFound => "vacancy_not_found",
            MatchingErrorKind::VacancyNotMatchable => "vacancy_not_matchable",
            MatchingErrorKind::InvalidLimit => "invalid_limit",
            MatchingErrorKind::InvalidVacancyId => "invalid_vacancy_id",
            MatchingErrorKind::CandidateNotFound => "candidate_not_found",
            MatchingErrorKind::DataSourceUnavailable => "data_source_unavailable",
            MatchingErrorKind::Timeout => "timeout",
        }
    }

    /// Only transient infrastructure failures are worth repeating unmodified.
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            MatchingErrorKind::DataSourceUnavailable | MatchingErrorKind::Timeout
        )
    }
}
