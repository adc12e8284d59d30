mod selection;
mod substitution;

pub use selection::{select_for_category, Selection};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::course_config::{BestOfPolicy, ClobberPolicy, ClobberRule};
use super::domain::{Assignment, SubstitutionInfo};

/// Capability the calculator needs from a policy implementation.
///
/// Injected at construction so a calculator never runs without one.
pub trait PolicyEngine {
    /// Apply score substitutions and the weight adjustments they imply.
    fn apply_substitutions(
        &self,
        assignments: &[Assignment],
        weights: &BTreeMap<String, f64>,
        policies: &[ClobberPolicy],
    ) -> PolicyOutcome;

    /// First `best_of` policy configured for `category`, with its name.
    fn find_best_of_policy<'p>(
        &self,
        category: &str,
        policies: &'p [ClobberPolicy],
    ) -> Option<(&'p str, &'p BestOfPolicy)>;
}

/// Result of running substitution policies over a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyOutcome {
    pub adjusted_weights: BTreeMap<String, f64>,
    pub assignments: Vec<Assignment>,
    pub applied_policies: Vec<String>,
    pub substitutions: Vec<SubstitutionInfo>,
}

/// Default policy engine backed by the configured clobber rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardPolicyEngine;

impl StandardPolicyEngine {
    pub fn new() -> Self {
        Self
    }
}

impl PolicyEngine for StandardPolicyEngine {
    fn apply_substitutions(
        &self,
        assignments: &[Assignment],
        weights: &BTreeMap<String, f64>,
        policies: &[ClobberPolicy],
    ) -> PolicyOutcome {
        substitution::apply(assignments, weights, policies)
    }

    fn find_best_of_policy<'p>(
        &self,
        category: &str,
        policies: &'p [ClobberPolicy],
    ) -> Option<(&'p str, &'p BestOfPolicy)> {
        policies.iter().find_map(|policy| match &policy.rule {
            ClobberRule::BestOf(best_of) if best_of.category == category => {
                Some((policy.name.as_str(), best_of))
            }
            _ => None,
        })
    }
}
