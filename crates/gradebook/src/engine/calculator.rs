use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::course_config::CourseConfig;
use super::domain::{partition_valid, safe_ratio, Assignment};
use super::error::GradeError;
use super::policy::{select_for_category, PolicyEngine};
use super::report::{CategoryDetail, DroppedAssignment, GradeReport};
use super::weights;

/// Graded weight at or above this counts as a complete course.
pub const DEFAULT_COMPLETE_WEIGHT_THRESHOLD: f64 = 0.99;

/// Tunables for the weighted calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculatorSettings {
    pub complete_weight_threshold: f64,
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        Self {
            complete_weight_threshold: DEFAULT_COMPLETE_WEIGHT_THRESHOLD,
        }
    }
}

/// Stateless orchestrator turning assignments and a course config into a report.
#[derive(Debug, Clone)]
pub struct WeightedAverageCalculator<P> {
    policies: P,
    settings: CalculatorSettings,
}

impl<P: PolicyEngine> WeightedAverageCalculator<P> {
    pub fn new(policies: P) -> Self {
        Self::with_settings(policies, CalculatorSettings::default())
    }

    pub fn with_settings(policies: P, settings: CalculatorSettings) -> Self {
        Self { policies, settings }
    }

    pub fn settings(&self) -> CalculatorSettings {
        self.settings
    }

    /// Compute the weighted report.
    ///
    /// Returns `Ok(None)` when there is no weighting to apply, which callers
    /// treat as the cue to fall back to the simple average.
    pub fn compute(
        &self,
        assignments: &[Assignment],
        config: Option<&CourseConfig>,
    ) -> Result<Option<GradeReport>, GradeError> {
        let Some(config) = config.filter(|config| config.is_weighted()) else {
            debug!("no weight configuration; deferring to simple average");
            return Ok(None);
        };
        config.validate()?;

        let (valid, needs_review) = partition_valid(assignments);
        let valid: Vec<Assignment> = valid.into_iter().cloned().collect();

        let flat_weights = weights::resolve(&config.weights, &config.category_groups, &valid)?;
        let outcome =
            self.policies
                .apply_substitutions(&valid, &flat_weights, &config.clobber_policies);

        let mut by_category: BTreeMap<&str, Vec<&Assignment>> = BTreeMap::new();
        for assignment in &outcome.assignments {
            by_category
                .entry(assignment.category.as_str())
                .or_default()
                .push(assignment);
        }

        let mut applied_policies = outcome.applied_policies.clone();
        let mut category_details = BTreeMap::new();
        let mut weighted_sum = 0.0;
        let mut total_weight_graded = 0.0;
        let mut total_weight_configured = 0.0;

        for (category, &weight) in &outcome.adjusted_weights {
            if weight <= 0.0 {
                continue;
            }
            total_weight_configured += weight;

            let members = by_category
                .get(category.as_str())
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            if members.is_empty() {
                category_details.insert(category.clone(), CategoryDetail::future(weight));
                continue;
            }

            let best_of = self
                .policies
                .find_best_of_policy(category, &config.clobber_policies);
            let selection = select_for_category(
                members,
                config.drop_policies.get(category),
                best_of.map(|(_, policy)| policy),
            );

            if let Some((name, _)) = best_of {
                if !selection.dropped.is_empty() && !applied_policies.iter().any(|n| n == name) {
                    applied_policies.push(name.to_string());
                }
            }

            let graded_count = members
                .iter()
                .filter(|assignment| assignment.is_graded())
                .count();

            let (average, contribution) = if selection.kept.is_empty() {
                (None, 0.0)
            } else {
                let earned: f64 = selection
                    .kept
                    .iter()
                    .filter_map(|assignment| assignment.earned_points())
                    .sum();
                let possible: f64 = selection
                    .kept
                    .iter()
                    .map(|assignment| assignment.max_points)
                    .sum();
                let average = 100.0 * safe_ratio(earned, possible);
                let contribution = average * weight;
                weighted_sum += contribution;
                total_weight_graded += weight;
                (Some(average), contribution)
            };

            let dropped = selection
                .dropped
                .iter()
                .map(|assignment| DroppedAssignment {
                    id: assignment.id.clone(),
                    title: assignment.title.clone(),
                    percentage: 100.0 * assignment.ratio().unwrap_or(0.0),
                })
                .collect();

            category_details.insert(
                category.clone(),
                CategoryDetail {
                    average,
                    weight,
                    contribution,
                    graded_count,
                    total_count: members.len(),
                    dropped,
                    is_future: false,
                },
            );
        }

        let unweighted_categories = by_category
            .keys()
            .filter(|category| !category_details.contains_key(**category))
            .map(|category| category.to_string())
            .collect();

        let weighted_average = if total_weight_graded > 0.0 {
            safe_ratio(weighted_sum, total_weight_graded).clamp(0.0, 100.0)
        } else {
            0.0
        };
        let has_future_categories = category_details
            .values()
            .any(|detail: &CategoryDetail| detail.is_future);

        debug!(
            categories = category_details.len(),
            total_weight_graded,
            total_weight_configured,
            applied = applied_policies.len(),
            "weighted grade computed"
        );

        Ok(Some(GradeReport {
            weighted_average,
            category_details,
            total_weight_graded,
            total_weight_configured,
            has_all_categories: total_weight_graded >= self.settings.complete_weight_threshold,
            has_future_categories,
            applied_policies,
            substitutions: outcome.substitutions,
            unweighted_categories,
            needs_review,
        }))
    }
}
