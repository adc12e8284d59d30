use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::AssignmentId;
use super::error::GradeError;
use super::weights;

/// Declarative weighting policy for one course.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseConfig {
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
    #[serde(default)]
    pub category_groups: Vec<CategoryGroup>,
    #[serde(default)]
    pub drop_policies: BTreeMap<String, DropPolicy>,
    #[serde(default)]
    pub clobber_policies: Vec<ClobberPolicy>,
}

/// Several categories sharing one slice of the course weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub name: String,
    pub categories: Vec<String>,
    pub total_weight: f64,
    #[serde(default)]
    pub distribution_method: DistributionMethod,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionMethod {
    #[default]
    Equal,
    Proportional,
}

/// Number of lowest graded scores to exclude from a category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropPolicy {
    pub enabled: bool,
    pub count: usize,
}

impl DropPolicy {
    pub fn lowest(count: usize) -> Self {
        Self {
            enabled: true,
            count,
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.enabled && self.count > 0
    }
}

/// Named clobber policy, evaluated in configured order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClobberPolicy {
    pub name: String,
    #[serde(flatten)]
    pub rule: ClobberRule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClobberRule {
    BestOf(BestOfPolicy),
    Substitution(ScoreSubstitution),
}

/// Keep only the top `count` graded scores in a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestOfPolicy {
    pub category: String,
    pub count: usize,
}

/// Replace a weak score with a stronger one from another category.
///
/// Source and target default to the best and weakest graded work in their
/// categories; naming an assignment pins the choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSubstitution {
    pub source_category: String,
    pub target_category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_assignment: Option<AssignmentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_assignment: Option<AssignmentId>,
    #[serde(default)]
    pub normalization: Normalization,
    /// Minimum margin the source must clear over the target category's mean,
    /// in the units of `normalization`.
    #[serde(default)]
    pub threshold: f64,
    /// Fraction of the source category weight removed once the policy fires.
    #[serde(default)]
    pub source_weight_reduction: f64,
}

/// How scores are put on a common scale before comparing them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Fraction of points earned.
    #[default]
    Percentage,
    /// Standard deviations from the class mean, using assignment statistics.
    ZScore,
}

/// Non-fatal configuration findings for the config-editing layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigWarning {
    WeightOverriddenByGroup { category: String, group: String },
    WeightsExceedTotal { total: f64 },
    BestOfOverridesDrop { category: String },
}

impl ConfigWarning {
    pub fn summary(&self) -> String {
        match self {
            ConfigWarning::WeightOverriddenByGroup { category, group } => {
                format!("weight for '{category}' is ignored; group '{group}' supplies it")
            }
            ConfigWarning::WeightsExceedTotal { total } => {
                format!("configured weights sum to {:.3}, above 1.0", total)
            }
            ConfigWarning::BestOfOverridesDrop { category } => {
                format!("best-of policy replaces the drop policy for '{category}'")
            }
        }
    }
}

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

impl CourseConfig {
    /// A config with neither weights nor groups carries no weighting at all.
    pub fn is_weighted(&self) -> bool {
        !self.weights.is_empty() || !self.category_groups.is_empty()
    }

    pub fn best_of_policies(&self) -> impl Iterator<Item = (&str, &BestOfPolicy)> {
        self.clobber_policies
            .iter()
            .filter_map(|policy| match &policy.rule {
                ClobberRule::BestOf(best_of) => Some((policy.name.as_str(), best_of)),
                ClobberRule::Substitution(_) => None,
            })
    }

    /// Validation pass run before a config is stored.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, GradeError> {
        let owners = weights::validate_groups(&self.category_groups)?;
        let mut warnings = Vec::new();

        for (category, weight) in &self.weights {
            if !weight.is_finite() || !(0.0..=1.0).contains(weight) {
                return Err(GradeError::InvalidWeight {
                    category: category.clone(),
                    weight: *weight,
                });
            }
            if let Some(group) = owners.get(category.as_str()) {
                warnings.push(ConfigWarning::WeightOverriddenByGroup {
                    category: category.clone(),
                    group: (*group).to_string(),
                });
            }
        }

        for policy in &self.clobber_policies {
            validate_policy(policy)?;
        }

        for (category, drop) in &self.drop_policies {
            if drop.is_active() && self.best_of_policies().any(|(_, b)| &b.category == category) {
                warnings.push(ConfigWarning::BestOfOverridesDrop {
                    category: category.clone(),
                });
            }
        }

        let individual: f64 = self
            .weights
            .iter()
            .filter(|(category, _)| !owners.contains_key(category.as_str()))
            .map(|(_, weight)| *weight)
            .sum();
        let grouped: f64 = self
            .category_groups
            .iter()
            .map(|group| group.total_weight)
            .sum();
        let total = individual + grouped;
        if total > 1.0 + WEIGHT_SUM_TOLERANCE {
            warnings.push(ConfigWarning::WeightsExceedTotal { total });
        }

        Ok(warnings)
    }
}

fn validate_policy(policy: &ClobberPolicy) -> Result<(), GradeError> {
    let invalid = |reason: &str| GradeError::InvalidPolicy {
        policy: policy.name.clone(),
        reason: reason.to_string(),
    };

    match &policy.rule {
        ClobberRule::BestOf(best_of) => {
            if best_of.category.trim().is_empty() {
                return Err(invalid("best_of must name a category"));
            }
            if best_of.count == 0 {
                return Err(invalid("best_of count must keep at least one score"));
            }
        }
        ClobberRule::Substitution(substitution) => {
            if substitution.source_category.trim().is_empty()
                || substitution.target_category.trim().is_empty()
            {
                return Err(invalid("substitution must name source and target categories"));
            }
            if !substitution.threshold.is_finite() {
                return Err(invalid("threshold must be a finite number"));
            }
            let reduction = substitution.source_weight_reduction;
            if !reduction.is_finite() || !(0.0..=1.0).contains(&reduction) {
                return Err(invalid("source_weight_reduction must be within 0..=1"));
            }
        }
    }

    Ok(())
}
