use std::fmt;

use serde::{Serialize, Serializer};

use super::config::{CriterionWeights, TierThresholds};
use super::criteria::CriterionResult;

/// Recruiter-facing bucket of a score, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Excellent,
    VeryGood,
    Good,
    Fair,
    Low,
}

impl Tier {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Excellent,
            Self::VeryGood,
            Self::Good,
            Self::Fair,
            Self::Low,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::VeryGood => "Very Good",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Low => "Low",
        }
    }

    pub fn for_score(score: u8, thresholds: &TierThresholds) -> Self {
        if score >= thresholds.excellent {
            Self::Excellent
        } else if score >= thresholds.very_good {
            Self::VeryGood
        } else if score >= thresholds.good {
            Self::Good
        } else if score >= thresholds.fair {
            Self::Fair
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Tier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AggregateScore {
    pub score: u8,
    pub tier: Tier,
}

/// Folds criterion results into a 0-100 score over the applicable criteria only.
#[derive(Debug, Clone)]
pub struct ScoreAggregator {
    weights: CriterionWeights,
    tiers: TierThresholds,
}

impl ScoreAggregator {
    pub fn new(weights: CriterionWeights, tiers: TierThresholds) -> Self {
        Self { weights, tiers }
    }

    pub fn aggregate(&self, results: &[CriterionResult]) -> AggregateScore {
        let (numerator, denominator) = results
            .iter()
            .filter(|result| result.applicable)
            .fold((0u64, 0u64), |(numerator, denominator), result| {
                let weight = u64::from(self.weights.weight_for(result.criterion));
                let earned = if result.matched { weight } else { 0 };
                (numerator + earned, denominator + weight)
            });

        // Completeness is always applicable with a positive weight, so the denominator only
        // reaches zero for hand-built result lists.
        let score = (200 * numerator + denominator)
            .checked_div(2 * denominator)
            .unwrap_or(0)
            .min(100) as u8;

        AggregateScore {
            score,
            tier: Tier::for_score(score, &self.tiers),
        }
    }
}
