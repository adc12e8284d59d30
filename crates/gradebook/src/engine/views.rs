use serde::Serialize;

use super::report::GradeReport;
use super::simple::SimpleAverage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionLevel {
    Complete,
    InProgress,
    NotStarted,
}

impl CompletionLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Complete => "Complete",
            Self::InProgress => "In Progress",
            Self::NotStarted => "Not Started",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub category: String,
    pub average: Option<f64>,
    pub average_label: String,
    pub weight_pct: f64,
    pub contribution: f64,
    pub graded_count: usize,
    pub total_count: usize,
    pub is_future: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropped: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GradeReportSummary {
    pub weighted_average: f64,
    pub weighted_average_label: String,
    pub completion: CompletionLevel,
    pub completion_label: &'static str,
    pub graded_weight_pct: f64,
    pub configured_weight_pct: f64,
    pub categories: Vec<CategoryView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub applied_policies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub review_notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimpleAverageSummary {
    pub average: Option<f64>,
    pub average_label: String,
    pub points_label: String,
    pub graded_count: usize,
    pub total_count: usize,
}

impl GradeReport {
    pub fn summary(&self) -> GradeReportSummary {
        let completion = if self.has_all_categories {
            CompletionLevel::Complete
        } else if self.total_weight_graded > 0.0 {
            CompletionLevel::InProgress
        } else {
            CompletionLevel::NotStarted
        };

        let categories = self
            .category_details
            .iter()
            .map(|(category, detail)| CategoryView {
                category: category.clone(),
                average: detail.average.map(round_one_decimal),
                average_label: percent_label(detail.average),
                weight_pct: round_one_decimal(detail.weight * 100.0),
                contribution: round_one_decimal(detail.contribution),
                graded_count: detail.graded_count,
                total_count: detail.total_count,
                is_future: detail.is_future,
                dropped: detail
                    .dropped
                    .iter()
                    .map(|dropped| {
                        format!("{} ({})", dropped.title, percent_label(Some(dropped.percentage)))
                    })
                    .collect(),
            })
            .collect();

        GradeReportSummary {
            weighted_average: round_one_decimal(self.weighted_average),
            weighted_average_label: percent_label(Some(self.weighted_average)),
            completion,
            completion_label: completion.label(),
            graded_weight_pct: round_one_decimal(self.total_weight_graded * 100.0),
            configured_weight_pct: round_one_decimal(self.total_weight_configured * 100.0),
            categories,
            applied_policies: self.applied_policies.clone(),
            review_notes: self
                .needs_review
                .iter()
                .map(|item| format!("{}: {}", item.title, item.reason.summary()))
                .collect(),
        }
    }
}

impl SimpleAverage {
    pub fn summary(&self) -> SimpleAverageSummary {
        let average = self.has_grades.then_some(self.average_percentage);
        SimpleAverageSummary {
            average: average.map(round_one_decimal),
            average_label: percent_label(average),
            points_label: format!(
                "{} / {} pts",
                round_one_decimal(self.earned_points),
                round_one_decimal(self.total_points)
            ),
            graded_count: self.graded_count,
            total_count: self.total_count,
        }
    }
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn percent_label(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{:.1}%", value),
        None => "n/a".to_string(),
    }
}
