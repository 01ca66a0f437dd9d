use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::criteria::Criterion;

const WEIGHT_TOTAL: u32 = 100;

/// Tunable inputs of one matching invocation: weights, thresholds and response bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub weights: CriterionWeights,
    pub completeness_threshold: u8,
    pub tiers: TierThresholds,
    pub default_limit: usize,
    pub max_limit: usize,
    pub deadline_ms: u64,
    /// Upper bound on concurrent evaluation chunks; `None` sizes the pool to the host CPUs.
    pub workers: Option<usize>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weights: CriterionWeights::default(),
            completeness_threshold: 70,
            tiers: TierThresholds::default(),
            default_limit: 5,
            max_limit: 50,
            deadline_ms: 2_000,
            workers: None,
        }
    }
}

impl MatchingConfig {
    pub fn validate(&self) -> Result<(), MatchingConfigError> {
        self.weights.validate()?;
        self.tiers.validate()?;

        if self.completeness_threshold > 100 {
            return Err(MatchingConfigError::CompletenessThreshold(
                self.completeness_threshold,
            ));
        }
        if self.max_limit == 0 || self.default_limit == 0 || self.default_limit > self.max_limit {
            return Err(MatchingConfigError::Limits {
                default_limit: self.default_limit,
                max_limit: self.max_limit,
            });
        }
        if self.deadline_ms == 0 {
            return Err(MatchingConfigError::Deadline);
        }
        if self.workers == Some(0) {
            return Err(MatchingConfigError::Workers);
        }

        Ok(())
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|count| count.get())
                .unwrap_or(1)
        })
    }
}

/// Integer weight per criterion. Weights sum to 100 so scores land on a stable scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriterionWeights {
    pub location: u32,
    pub driving_license: u32,
    pub vehicle: u32,
    pub pcd: u32,
    pub profile_completeness: u32,
}

impl Default for CriterionWeights {
    fn default() -> Self {
        Self {
            location: 25,
            driving_license: 20,
            vehicle: 15,
            pcd: 25,
            profile_completeness: 15,
        }
    }
}

impl CriterionWeights {
    pub const fn weight_for(&self, criterion: Criterion) -> u32 {
        match criterion {
            Criterion::Location => self.location,
            Criterion::DrivingLicense => self.driving_license,
            Criterion::Vehicle => self.vehicle,
            Criterion::Pcd => self.pcd,
            Criterion::ProfileCompleteness => self.profile_completeness,
        }
    }

    pub fn total(&self) -> u32 {
        Criterion::ordered()
            .into_iter()
            .map(|criterion| self.weight_for(criterion))
            .sum()
    }

    /// Completeness is the one criterion that is always applicable, so a positive weight on it
    /// keeps every candidate's denominator above zero.
    pub fn validate(&self) -> Result<(), MatchingConfigError> {
        let total = self.total();
        if total != WEIGHT_TOTAL {
            return Err(MatchingConfigError::WeightTotal(total));
        }
        if self.profile_completeness == 0 {
            return Err(MatchingConfigError::CompletenessWeight);
        }
        Ok(())
    }
}

/// Inclusive lower bounds of each tier; anything below `fair` is `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    pub excellent: u8,
    pub very_good: u8,
    pub good: u8,
    pub fair: u8,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            excellent: 90,
            very_good: 75,
            good: 60,
            fair: 40,
        }
    }
}

impl TierThresholds {
    pub fn validate(&self) -> Result<(), MatchingConfigError> {
        let descending = self.excellent <= 100
            && self.excellent > self.very_good
            && self.very_good > self.good
            && self.good > self.fair;
        if descending {
            Ok(())
        } else {
            Err(MatchingConfigError::TierOrder(*self))
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatchingConfigError {
    #[error("criterion weights must sum to 100, found {0}")]
    WeightTotal(u32),
    #[error("profile completeness weight must be positive")]
    CompletenessWeight,
    #[error("tier thresholds must be strictly descending and at most 100: {0:?}")]
    TierOrder(TierThresholds),
    #[error("completeness threshold must be within 0..=100, found {0}")]
    CompletenessThreshold(u8),
    #[error("limits must satisfy 1 <= default ({default_limit}) <= max ({max_limit})")]
    Limits {
        default_limit: usize,
        max_limit: usize,
    },
    #[error("evaluation deadline must be positive")]
    Deadline,
    #[error("worker count must be positive")]
    Workers,
}
