use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tokio::task::{JoinError, JoinSet};
use tracing::debug;

use super::domain::{Candidate, CandidateId, Vacancy, VacancyId, VacancyStatus};
use super::evaluation::{CandidateEvaluator, MatchResult, MatchingConfig};
use super::repository::{CandidatePool, RepositoryError, VacancyDirectory};

/// Ordered matches for one vacancy plus the size of the pool they were drawn from.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub evaluated: usize,
    pub matches: Vec<MatchResult>,
}

/// Orchestrates loading, per-candidate evaluation and ordering for one vacancy.
///
/// Holds no per-request state; concurrent calls share only the read-only sources.
pub struct RankingEngine<C, V> {
    candidates: Arc<C>,
    vacancies: Arc<V>,
    evaluator: Arc<CandidateEvaluator>,
    workers: usize,
}

impl<C, V> RankingEngine<C, V>
where
    C: CandidatePool + 'static,
    V: VacancyDirectory + 'static,
{
    pub fn new(candidates: Arc<C>, vacancies: Arc<V>, config: &MatchingConfig) -> Self {
        Self {
            candidates,
            vacancies,
            evaluator: Arc::new(CandidateEvaluator::new(config)),
            workers: config.worker_count().max(1),
        }
    }

    /// Rank the active pool against an open vacancy, keeping at most `limit` entries.
    ///
    /// Evaluation stops with [`RankingError::Timeout`] once `deadline` passes.
    pub async fn rank(
        &self,
        vacancy_id: &VacancyId,
        limit: usize,
        deadline: Instant,
    ) -> Result<Ranking, RankingError> {
        if limit == 0 {
            return Err(RankingError::InvalidLimit(limit));
        }

        let (vacancy, pool, applicants) = self.load(vacancy_id.clone()).await?;
        let pool = active_unique(pool);
        let evaluated = pool.len();

        let mut matches = self
            .evaluate_pool(Arc::new(vacancy), Arc::new(applicants), pool, deadline)
            .await?;
        matches.sort_by(compare_matches);
        matches.truncate(limit);

        Ok(Ranking { evaluated, matches })
    }

    async fn load(
        &self,
        vacancy_id: VacancyId,
    ) -> Result<(Vacancy, Vec<Candidate>, HashSet<CandidateId>), RankingError> {
        let candidates = Arc::clone(&self.candidates);
        let vacancies = Arc::clone(&self.vacancies);

        tokio::task::spawn_blocking(move || -> Result<_, RankingError> {
            let vacancy = vacancies
                .vacancy(&vacancy_id)?
                .ok_or_else(|| RankingError::VacancyNotFound(vacancy_id.clone()))?;
            if !vacancy.is_matchable() {
                return Err(RankingError::VacancyNotMatchable {
                    vacancy_id,
                    status: vacancy.status,
                });
            }

            let applicants = vacancies.applicants(&vacancy_id)?;
            let pool = candidates.active_candidates()?;
            Ok((vacancy, pool, applicants))
        })
        .await
        .map_err(join_failure)?
    }

    async fn evaluate_pool(
        &self,
        vacancy: Arc<Vacancy>,
        applicants: Arc<HashSet<CandidateId>>,
        mut pool: Vec<Candidate>,
        deadline: Instant,
    ) -> Result<Vec<MatchResult>, RankingError> {
        if pool.is_empty() {
            return Ok(Vec::new());
        }

        let total = pool.len();
        let chunk_size = total.div_ceil(self.workers);
        let mut tasks = JoinSet::new();

        while !pool.is_empty() {
            let rest = pool.split_off(chunk_size.min(pool.len()));
            let chunk = std::mem::replace(&mut pool, rest);
            let evaluator = Arc::clone(&self.evaluator);
            let vacancy = Arc::clone(&vacancy);
            let applicants = Arc::clone(&applicants);

            tasks.spawn_blocking(move || {
                evaluate_chunk(&evaluator, &vacancy, &applicants, chunk, deadline)
            });
        }
        debug!(
            vacancy_id = %vacancy.id,
            candidates = total,
            chunks = tasks.len(),
            "evaluating candidate pool"
        );

        let mut matches = Vec::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            let chunk = joined.map_err(join_failure)??;
            matches.extend(chunk);
        }

        Ok(matches)
    }
}

fn evaluate_chunk(
    evaluator: &CandidateEvaluator,
    vacancy: &Vacancy,
    applicants: &HashSet<CandidateId>,
    chunk: Vec<Candidate>,
    deadline: Instant,
) -> Result<Vec<MatchResult>, RankingError> {
    let mut results = Vec::with_capacity(chunk.len());
    for candidate in &chunk {
        if Instant::now() >= deadline {
            return Err(RankingError::Timeout);
        }
        let already_applied = applicants.contains(&candidate.id);
        results.push(evaluator.evaluate(candidate, vacancy, already_applied));
    }
    Ok(results)
}

/// Drops inactive rows and repeated ids; the first occurrence of an id wins.
fn active_unique(pool: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = HashSet::with_capacity(pool.len());
    pool.into_iter()
        .filter(|candidate| candidate.active && seen.insert(candidate.id.clone()))
        .collect()
}

/// Score desc, completeness desc, candidate id asc.
pub fn compare_matches(left: &MatchResult, right: &MatchResult) -> Ordering {
    right
        .score
        .cmp(&left.score)
        .then_with(|| right.completeness.cmp(&left.completeness))
        .then_with(|| left.candidate_id.cmp(&right.candidate_id))
}

fn join_failure(error: JoinError) -> RankingError {
    if error.is_panic() {
        std::panic::resume_unwind(error.into_panic());
    }
    RankingError::Timeout
}

/// Failures of a ranking run. Per-candidate data gaps never surface here.
#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    #[error("vacancy {0} not found")]
    VacancyNotFound(VacancyId),
    #[error("vacancy {vacancy_id} is {status} and cannot be matched")]
    VacancyNotMatchable {
        vacancy_id: VacancyId,
        status: VacancyStatus,
    },
    #[error("limit must be a positive integer, got {0}")]
    InvalidLimit(usize),
    #[error(transparent)]
    DataSource(#[from] RepositoryError),
    #[error("evaluation exceeded the request deadline")]
    Timeout,
}
