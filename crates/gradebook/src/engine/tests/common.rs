use std::collections::BTreeMap;

use crate::engine::{
    Assignment, BestOfPolicy, CategoryGroup, ClobberPolicy, ClobberRule, CourseConfig,
    DistributionMethod, DropPolicy, Normalization, ScoreSubstitution, StandardPolicyEngine,
    WeightedAverageCalculator,
};

pub(super) const EPSILON: f64 = 1e-9;

pub(super) fn graded(id: &str, category: &str, earned: f64, max: f64) -> Assignment {
    Assignment::graded(id, title_for(id), category, earned, max)
}

pub(super) fn ungraded(id: &str, category: &str, max: f64) -> Assignment {
    Assignment::ungraded(id, title_for(id), category, max)
}

fn title_for(id: &str) -> String {
    id.to_uppercase()
}

pub(super) fn homework() -> Vec<Assignment> {
    vec![
        graded("hw1", "homework", 8.0, 10.0),
        graded("hw2", "homework", 9.0, 10.0),
        graded("hw3", "homework", 5.0, 10.0),
    ]
}

pub(super) fn weights(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries
        .iter()
        .map(|(category, weight)| (category.to_string(), *weight))
        .collect()
}

pub(super) fn group(
    name: &str,
    categories: &[&str],
    total_weight: f64,
    distribution_method: DistributionMethod,
) -> CategoryGroup {
    CategoryGroup {
        name: name.to_string(),
        categories: categories.iter().map(|c| c.to_string()).collect(),
        total_weight,
        distribution_method,
    }
}

pub(super) fn config_with_weights(entries: &[(&str, f64)]) -> CourseConfig {
    CourseConfig {
        weights: weights(entries),
        ..CourseConfig::default()
    }
}

pub(super) fn drop_lowest(config: &mut CourseConfig, category: &str, count: usize) {
    config
        .drop_policies
        .insert(category.to_string(), DropPolicy::lowest(count));
}

pub(super) fn best_of(name: &str, category: &str, count: usize) -> ClobberPolicy {
    ClobberPolicy {
        name: name.to_string(),
        rule: ClobberRule::BestOf(BestOfPolicy {
            category: category.to_string(),
            count,
        }),
    }
}

pub(super) fn substitution(name: &str, source: &str, target: &str, threshold: f64) -> ClobberPolicy {
    ClobberPolicy {
        name: name.to_string(),
        rule: ClobberRule::Substitution(ScoreSubstitution {
            source_category: source.to_string(),
            target_category: target.to_string(),
            source_assignment: None,
            target_assignment: None,
            normalization: Normalization::Percentage,
            threshold,
            source_weight_reduction: 0.0,
        }),
    }
}

pub(super) fn z_score_substitution(name: &str, source: &str, target: &str) -> ClobberPolicy {
    let mut policy = substitution(name, source, target, 0.0);
    if let ClobberRule::Substitution(rule) = &mut policy.rule {
        rule.normalization = Normalization::ZScore;
    }
    policy
}

pub(super) fn calculator() -> WeightedAverageCalculator<StandardPolicyEngine> {
    WeightedAverageCalculator::new(StandardPolicyEngine::new())
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
