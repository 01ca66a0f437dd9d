mod aggregate;
mod config;
mod criteria;

pub use aggregate::{AggregateScore, ScoreAggregator, Tier};
pub use config::{CriterionWeights, MatchingConfig, MatchingConfigError, TierThresholds};
pub use criteria::{
    evaluate_completeness, evaluate_driving_license, evaluate_location, evaluate_pcd,
    evaluate_vehicle, Criterion, CriterionDetail, CriterionResult, EvaluationContext,
};

use serde::Serialize;

use super::completeness::CompletenessScorer;
use super::domain::{Candidate, CandidateId, CandidateSummary, Vacancy};

/// Stateless evaluator applying every criterion and the aggregator to one candidate.
#[derive(Debug, Clone)]
pub struct CandidateEvaluator {
    completeness: CompletenessScorer,
    aggregator: ScoreAggregator,
    completeness_threshold: u8,
}

impl CandidateEvaluator {
    pub fn new(config: &MatchingConfig) -> Self {
        Self {
            completeness: CompletenessScorer,
            aggregator: ScoreAggregator::new(config.weights, config.tiers),
            completeness_threshold: config.completeness_threshold,
        }
    }

    pub fn evaluate(
        &self,
        candidate: &Candidate,
        vacancy: &Vacancy,
        already_applied: bool,
    ) -> MatchResult {
        let completeness = self.completeness.score(candidate);
        let context = EvaluationContext {
            candidate,
            vacancy,
            completeness,
            completeness_threshold: self.completeness_threshold,
        };

        let criteria: Vec<CriterionResult> = Criterion::ordered()
            .into_iter()
            .map(|criterion| criterion.evaluate(&context))
            .collect();
        let AggregateScore { score, tier } = self.aggregator.aggregate(&criteria);

        MatchResult {
            candidate_id: candidate.id.clone(),
            candidate: candidate.summary(),
            score,
            tier,
            completeness,
            already_applied,
            criteria,
        }
    }
}

/// Ephemeral match of one candidate against the requested vacancy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub candidate_id: CandidateId,
    pub candidate: CandidateSummary,
    pub score: u8,
    pub tier: Tier,
    pub completeness: u8,
    pub already_applied: bool,
    pub criteria: Vec<CriterionResult>,
}

impl MatchResult {
    pub fn criterion(&self, criterion: Criterion) -> Option<&CriterionResult> {
        self.criteria
            .iter()
            .find(|result| result.criterion == criterion)
    }
}
