use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{AssignmentId, ReviewItem, SubstitutionInfo};

/// Weighted grade projection for one course.
///
/// Percentages are full precision; rounding belongs to the views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeReport {
    /// Average rescaled to the weight that has grades, 0 until any does.
    pub weighted_average: f64,
    pub category_details: BTreeMap<String, CategoryDetail>,
    pub total_weight_graded: f64,
    pub total_weight_configured: f64,
    pub has_all_categories: bool,
    pub has_future_categories: bool,
    pub applied_policies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub substitutions: Vec<SubstitutionInfo>,
    /// Categories with assignments but no configured weight.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unweighted_categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub needs_review: Vec<ReviewItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDetail {
    pub average: Option<f64>,
    pub weight: f64,
    pub contribution: f64,
    pub graded_count: usize,
    pub total_count: usize,
    pub dropped: Vec<DroppedAssignment>,
    pub is_future: bool,
}

impl CategoryDetail {
    pub(crate) fn future(weight: f64) -> Self {
        Self {
            average: None,
            weight,
            contribution: 0.0,
            graded_count: 0,
            total_count: 0,
            dropped: Vec::new(),
            is_future: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedAssignment {
    pub id: AssignmentId,
    pub title: String,
    pub percentage: f64,
}

impl GradeReport {
    pub fn category(&self, category: &str) -> Option<&CategoryDetail> {
        self.category_details.get(category)
    }

    /// Categories still waiting on their first assignment.
    pub fn future_categories(&self) -> impl Iterator<Item = &str> {
        self.category_details
            .iter()
            .filter(|(_, detail)| detail.is_future)
            .map(|(category, _)| category.as_str())
    }
}
