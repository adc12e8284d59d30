use serde::{Deserialize, Serialize};

use super::domain::{partition_valid, safe_ratio, Assignment, ReviewItem};

/// Unweighted points ratio across every graded assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleAverage {
    pub has_grades: bool,
    pub average_percentage: f64,
    pub total_points: f64,
    pub earned_points: f64,
    pub graded_count: usize,
    pub total_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub needs_review: Vec<ReviewItem>,
}

/// Fallback used when a course has no weight configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleAverageCalculator;

impl SimpleAverageCalculator {
    pub fn compute(assignments: &[Assignment]) -> SimpleAverage {
        let (valid, needs_review) = partition_valid(assignments);

        let (earned_points, total_points, graded_count) = valid
            .iter()
            .filter_map(|assignment| {
                assignment
                    .earned_points()
                    .map(|earned| (earned, assignment.max_points))
            })
            .fold((0.0, 0.0, 0usize), |(earned, possible, count), (e, p)| {
                (earned + e, possible + p, count + 1)
            });

        if graded_count == 0 {
            return SimpleAverage {
                has_grades: false,
                average_percentage: 0.0,
                total_points: 0.0,
                earned_points: 0.0,
                graded_count: 0,
                total_count: 0,
                needs_review,
            };
        }

        SimpleAverage {
            has_grades: true,
            average_percentage: 100.0 * safe_ratio(earned_points, total_points),
            total_points,
            earned_points,
            graded_count,
            total_count: valid.len(),
            needs_review,
        }
    }
}
