//! Flattening of individual weights and weight groups into one category map.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::course_config::{CategoryGroup, DistributionMethod};
use super::domain::Assignment;
use super::error::GradeError;

/// Resolve per-category weights.
///
/// Group expansions take precedence over individual weights for the same
/// category. The result is keyed by category so it does not depend on the
/// iteration order of either input.
pub fn resolve<'a, I>(
    weights: &BTreeMap<String, f64>,
    groups: &[CategoryGroup],
    assignments: I,
) -> Result<BTreeMap<String, f64>, GradeError>
where
    I: IntoIterator<Item = &'a Assignment>,
{
    validate_groups(groups)?;

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for assignment in assignments {
        *counts.entry(assignment.category.as_str()).or_default() += 1;
    }

    let mut flat = weights.clone();
    for group in groups {
        for (category, weight) in expand_group(group, &counts) {
            if flat.insert(category.clone(), weight).is_some() {
                debug!(%category, group = %group.name, "group weight overrides individual weight");
            }
        }
    }

    Ok(flat)
}

fn expand_group(group: &CategoryGroup, counts: &BTreeMap<&str, usize>) -> Vec<(String, f64)> {
    let equal_share = group.total_weight / group.categories.len() as f64;

    let group_total: usize = group
        .categories
        .iter()
        .map(|category| counts.get(category.as_str()).copied().unwrap_or(0))
        .sum();

    match group.distribution_method {
        DistributionMethod::Proportional if group_total > 0 => group
            .categories
            .iter()
            .map(|category| {
                let count = counts.get(category.as_str()).copied().unwrap_or(0);
                let share = group.total_weight * count as f64 / group_total as f64;
                (category.clone(), share)
            })
            .collect(),
        // A group with no work yet has nothing to be proportional to.
        _ => group
            .categories
            .iter()
            .map(|category| (category.clone(), equal_share))
            .collect(),
    }
}

/// Structural checks on groups, returning the owning group for each category.
pub(crate) fn validate_groups(groups: &[CategoryGroup]) -> Result<BTreeMap<&str, &str>, GradeError> {
    let mut owners: BTreeMap<&str, &str> = BTreeMap::new();

    for group in groups {
        if group.categories.is_empty() {
            return Err(GradeError::InvalidGroup {
                group: group.name.clone(),
                reason: "group lists no categories".to_string(),
            });
        }
        if !group.total_weight.is_finite() || !(0.0..=1.0).contains(&group.total_weight) {
            return Err(GradeError::InvalidGroup {
                group: group.name.clone(),
                reason: format!("total weight {} is outside 0..=1", group.total_weight),
            });
        }

        let mut seen = BTreeSet::new();
        for category in &group.categories {
            if !seen.insert(category.as_str()) {
                return Err(GradeError::DuplicateCategory {
                    category: category.clone(),
                    first: group.name.clone(),
                    second: group.name.clone(),
                });
            }
            if let Some(first) = owners.insert(category.as_str(), group.name.as_str()) {
                return Err(GradeError::DuplicateCategory {
                    category: category.clone(),
                    first: first.to_string(),
                    second: group.name.clone(),
                });
            }
        }
    }

    Ok(owners)
}
