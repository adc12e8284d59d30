use std::collections::BTreeMap;

use tracing::debug;

use super::super::course_config::{ClobberPolicy, ClobberRule, Normalization, ScoreSubstitution};
use super::super::domain::{Assignment, AssignmentId, Score, SubstitutionInfo};
use super::PolicyOutcome;

pub(super) fn apply(
    assignments: &[Assignment],
    weights: &BTreeMap<String, f64>,
    policies: &[ClobberPolicy],
) -> PolicyOutcome {
    let mut modified = assignments.to_vec();
    let mut adjusted_weights = weights.clone();
    let mut applied_policies = Vec::new();
    let mut substitutions = Vec::new();

    for policy in policies {
        let ClobberRule::Substitution(rule) = &policy.rule else {
            continue;
        };

        // Signals are always read from the recorded scores, never from an
        // earlier substitution.
        let Some(info) = evaluate(&policy.name, rule, assignments, &modified) else {
            debug!(policy = %policy.name, "substitution policy did not fire");
            continue;
        };

        if let Some(target) = modified
            .iter_mut()
            .find(|assignment| assignment.id == info.target_id)
        {
            target.score = Score::Graded {
                earned: info.new_score,
            };
            target.substitution = Some(info.clone());
        }

        if rule.source_weight_reduction > 0.0 {
            if let Some(weight) = adjusted_weights.get_mut(&rule.source_category) {
                *weight *= 1.0 - rule.source_weight_reduction.clamp(0.0, 1.0);
            }
        }

        debug!(
            policy = %policy.name,
            target = %info.target_id.0,
            source = %info.source_id.0,
            original = info.original_score,
            replacement = info.new_score,
            "score substituted"
        );
        applied_policies.push(policy.name.clone());
        substitutions.push(info);
    }

    PolicyOutcome {
        adjusted_weights,
        assignments: modified,
        applied_policies,
        substitutions,
    }
}

fn evaluate(
    name: &str,
    rule: &ScoreSubstitution,
    original: &[Assignment],
    modified: &[Assignment],
) -> Option<SubstitutionInfo> {
    let method = rule.normalization;
    let (source, source_norm) = find_source(rule, original)?;

    let already_substituted = |id: &AssignmentId| {
        modified
            .iter()
            .any(|assignment| &assignment.id == id && assignment.substituted())
    };

    let target_scores: Vec<(&Assignment, f64)> = original
        .iter()
        .filter(|assignment| assignment.category == rule.target_category)
        .filter_map(|assignment| normalize(assignment, method).map(|norm| (assignment, norm)))
        .collect();
    if target_scores.is_empty() {
        return None;
    }
    let category_mean =
        target_scores.iter().map(|(_, norm)| norm).sum::<f64>() / target_scores.len() as f64;

    let candidates = target_scores
        .iter()
        .filter(|(assignment, _)| assignment.id != source.id && !already_substituted(&assignment.id));
    let (target, _) = match &rule.target_assignment {
        Some(id) => candidates
            .filter(|(assignment, _)| &assignment.id == id)
            .copied()
            .next()?,
        None => candidates.copied().fold(None, |lowest, (assignment, norm)| match lowest {
            Some((_, best)) if norm >= best => lowest,
            _ => Some((assignment, norm)),
        })?,
    };

    let comparison_signal = source_norm - category_mean;
    if comparison_signal <= rule.threshold {
        return None;
    }

    let original_score = target.earned_points()?;
    let converted = match method {
        Normalization::Percentage => source_norm * target.max_points,
        Normalization::ZScore => {
            let stats = target.statistics?;
            stats.mean + source_norm * stats.std_dev
        }
    };
    let new_score = converted.clamp(0.0, target.max_points);
    if !new_score.is_finite() || new_score <= original_score {
        return None;
    }

    Some(SubstitutionInfo {
        policy: name.to_string(),
        target_id: target.id.clone(),
        original_score,
        new_score,
        comparison_signal,
        source_id: source.id.clone(),
        source_title: source.title.clone(),
    })
}

fn find_source<'a>(
    rule: &ScoreSubstitution,
    original: &'a [Assignment],
) -> Option<(&'a Assignment, f64)> {
    let method = rule.normalization;
    // A pinned source must still belong to the category whose weight is reduced.
    let mut candidates = original
        .iter()
        .filter(|assignment| assignment.category == rule.source_category)
        .filter_map(|assignment| normalize(assignment, method).map(|norm| (assignment, norm)));

    match &rule.source_assignment {
        Some(id) => candidates.find(|(assignment, _)| &assignment.id == id),
        None => candidates.fold(None, |best, (assignment, norm)| match best {
            Some((_, top)) if norm <= top => best,
            _ => Some((assignment, norm)),
        }),
    }
}

fn normalize(assignment: &Assignment, method: Normalization) -> Option<f64> {
    let earned = assignment.earned_points()?;
    match method {
        Normalization::Percentage => assignment.ratio(),
        Normalization::ZScore => {
            let stats = assignment.statistics.filter(|stats| stats.is_usable())?;
            Some((earned - stats.mean) / stats.std_dev)
        }
    }
}

