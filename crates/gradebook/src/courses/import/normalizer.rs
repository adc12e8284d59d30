use crate::engine::{ClobberRule, CourseConfig};

/// Canonical category key: invisible characters stripped, whitespace
/// collapsed to underscores, lowercase.
pub(crate) fn normalize_category(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join("_");
    collapsed.to_ascii_lowercase()
}

/// Rewrite every category a config mentions into the imported key form.
pub(crate) fn normalize_config(config: CourseConfig) -> CourseConfig {
    let CourseConfig {
        weights,
        mut category_groups,
        drop_policies,
        mut clobber_policies,
    } = config;

    for group in &mut category_groups {
        for category in &mut group.categories {
            *category = normalize_category(category);
        }
    }
    for policy in &mut clobber_policies {
        match &mut policy.rule {
            ClobberRule::BestOf(best_of) => {
                best_of.category = normalize_category(&best_of.category);
            }
            ClobberRule::Substitution(rule) => {
                rule.source_category = normalize_category(&rule.source_category);
                rule.target_category = normalize_category(&rule.target_category);
            }
        }
    }

    CourseConfig {
        weights: weights
            .into_iter()
            .map(|(category, weight)| (normalize_category(&category), weight))
            .collect(),
        category_groups,
        drop_policies: drop_policies
            .into_iter()
            .map(|(category, policy)| (normalize_category(&category), policy))
            .collect(),
        clobber_policies,
    }
}

#[cfg(test)]
pub(crate) fn normalize_for_tests(value: &str) -> String {
    normalize_category(value)
}
