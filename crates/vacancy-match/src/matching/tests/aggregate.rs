use super::common::*;
use crate::matching::evaluation::{
    evaluate_completeness, Criterion, CriterionDetail, CriterionResult, CriterionWeights,
    ScoreAggregator, Tier, TierThresholds,
};

fn aggregator() -> ScoreAggregator {
    ScoreAggregator::new(CriterionWeights::default(), TierThresholds::default())
}

fn result(criterion: Criterion, applicable: bool, matched: bool) -> CriterionResult {
    if criterion == Criterion::ProfileCompleteness {
        return evaluate_completeness(if matched { 100 } else { 0 }, 70);
    }
    CriterionResult {
        criterion,
        applicable,
        matched: applicable && matched,
        detail: CriterionDetail::Pcd {
            candidate_is_pcd: matched,
        },
    }
}

/// Every applicable/matched combination; completeness is always applicable.
fn combinations() -> Vec<Vec<CriterionResult>> {
    let mut all = Vec::new();
    for applicable_mask in 0u8..16 {
        for matched_mask in 0u8..32 {
            let results = Criterion::ordered()
                .into_iter()
                .enumerate()
                .map(|(index, criterion)| {
                    let applicable = index == 4 || applicable_mask & (1 << index) != 0;
                    result(criterion, applicable, matched_mask & (1 << index) != 0)
                })
                .collect();
            all.push(results);
        }
    }
    all
}

#[test]
fn all_matched_scores_one_hundred() {
    let results: Vec<_> = Criterion::ordered()
        .into_iter()
        .map(|criterion| result(criterion, true, true))
        .collect();
    let aggregate = aggregator().aggregate(&results);
    assert_eq!(aggregate.score, 100);
    assert_eq!(aggregate.tier, Tier::Excellent);
}

#[test]
fn only_applicable_weights_form_the_denominator() {
    // location 25 + pcd 25 + completeness 15 applicable; 40 of 65 earned.
    let results = vec![
        result(Criterion::Location, true, true),
        result(Criterion::DrivingLicense, false, false),
        result(Criterion::Vehicle, false, false),
        result(Criterion::Pcd, true, false),
        result(Criterion::ProfileCompleteness, true, true),
    ];
    let aggregate = aggregator().aggregate(&results);
    assert_eq!(aggregate.score, 62);
    assert_eq!(aggregate.tier, Tier::Good);
}

#[test]
fn halves_round_up() {
    // 15 of 40 is exactly 37.5.
    let results = vec![
        result(Criterion::Location, true, false),
        result(Criterion::ProfileCompleteness, true, true),
    ];
    assert_eq!(aggregator().aggregate(&results).score, 38);
}

#[test]
fn empty_result_list_scores_zero() {
    let aggregate = aggregator().aggregate(&[]);
    assert_eq!(aggregate.score, 0);
    assert_eq!(aggregate.tier, Tier::Low);
}

#[test]
fn tier_bounds_are_inclusive() {
    let thresholds = TierThresholds::default();
    let expectations = [
        (100, Tier::Excellent),
        (90, Tier::Excellent),
        (89, Tier::VeryGood),
        (75, Tier::VeryGood),
        (74, Tier::Good),
        (60, Tier::Good),
        (59, Tier::Fair),
        (40, Tier::Fair),
        (39, Tier::Low),
        (0, Tier::Low),
    ];
    for (score, tier) in expectations {
        assert_eq!(Tier::for_score(score, &thresholds), tier, "score {score}");
    }
    assert_eq!(Tier::VeryGood.to_string(), "Very Good");
    assert_eq!(
        serde_json::to_value(Tier::VeryGood).expect("serializes"),
        serde_json::json!("Very Good")
    );
}

#[test]
fn scores_stay_within_bounds() {
    let aggregator = aggregator();
    for results in combinations() {
        let score = aggregator.aggregate(&results).score;
        assert!(score <= 100, "score {score} for {results:?}");
    }
}

#[test]
fn matching_one_more_criterion_never_lowers_the_score() {
    let aggregator = aggregator();
    for results in combinations() {
        let before = aggregator.aggregate(&results).score;
        for index in 0..results.len() {
            if !results[index].applicable || results[index].matched {
                continue;
            }
            let mut improved = results.clone();
            improved[index] = result(improved[index].criterion, true, true);
            let after = aggregator.aggregate(&improved).score;
            assert!(after >= before, "{before} -> {after} flipping {index}");
        }
    }
}

#[test]
fn inapplicable_criteria_are_neutral() {
    let aggregator = aggregator();
    for results in combinations() {
        let applicable_only: Vec<_> = results
            .iter()
            .filter(|result| result.applicable)
            .cloned()
            .collect();
        assert_eq!(
            aggregator.aggregate(&results),
            aggregator.aggregate(&applicable_only)
        );
    }
}

#[test]
fn evaluator_scores_are_deterministic() {
    let evaluator = evaluator();
    let vacancy = vacancy();
    for candidate in [candidate("c-1"), strong_candidate("c-2"), weak_candidate("c-3")] {
        let first = evaluator.evaluate(&candidate, &vacancy, false);
        let second = evaluator.evaluate(&candidate, &vacancy, false);
        assert_eq!(first, second);
        assert_eq!(first.criteria.len(), Criterion::ordered().len());
    }
}
