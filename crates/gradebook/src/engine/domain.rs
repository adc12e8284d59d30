use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for assignments, unique within a course.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssignmentId(pub String);

/// Recorded outcome for a piece of coursework.
///
/// Keeping "graded with zero points" distinct from "not graded yet" is the
/// whole point of this type; callers never test the earned value for
/// truthiness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Score {
    Graded { earned: f64 },
    Ungraded,
}

impl Score {
    pub fn earned(self) -> Option<f64> {
        match self {
            Score::Graded { earned } => Some(earned),
            Score::Ungraded => None,
        }
    }

    pub const fn is_graded(self) -> bool {
        matches!(self, Score::Graded { .. })
    }
}

/// Class-wide distribution for an assignment, expressed in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreStatistics {
    pub mean: f64,
    pub std_dev: f64,
}

impl ScoreStatistics {
    pub(crate) fn is_usable(&self) -> bool {
        self.mean.is_finite() && self.std_dev.is_finite() && self.std_dev > 0.0
    }
}

/// Provenance recorded when a substitution policy replaces a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstitutionInfo {
    pub policy: String,
    pub target_id: AssignmentId,
    pub original_score: f64,
    pub new_score: f64,
    pub comparison_signal: f64,
    pub source_id: AssignmentId,
    pub source_title: String,
}

/// One graded or ungraded piece of coursework.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub title: String,
    pub category: String,
    pub score: Score,
    pub max_points: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<ScoreStatistics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substitution: Option<SubstitutionInfo>,
}

impl Assignment {
    pub fn graded(
        id: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        earned: f64,
        max_points: f64,
    ) -> Self {
        Self {
            id: AssignmentId(id.into()),
            title: title.into(),
            category: category.into(),
            score: Score::Graded { earned },
            max_points,
            due_date: None,
            statistics: None,
            substitution: None,
        }
    }

    pub fn ungraded(
        id: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        max_points: f64,
    ) -> Self {
        Self {
            id: AssignmentId(id.into()),
            title: title.into(),
            category: category.into(),
            score: Score::Ungraded,
            max_points,
            due_date: None,
            statistics: None,
            substitution: None,
        }
    }

    pub fn with_statistics(mut self, mean: f64, std_dev: f64) -> Self {
        self.statistics = Some(ScoreStatistics { mean, std_dev });
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn earned_points(&self) -> Option<f64> {
        self.score.earned()
    }

    pub fn is_graded(&self) -> bool {
        self.score.is_graded()
    }

    pub fn substituted(&self) -> bool {
        self.substitution.is_some()
    }

    /// Fraction of points earned, `None` while ungraded.
    pub fn ratio(&self) -> Option<f64> {
        self.earned_points()
            .map(|earned| safe_ratio(earned, self.max_points))
    }

    /// Checks the record against the point invariants.
    pub fn review_reason(&self) -> Option<ReviewReason> {
        if !self.max_points.is_finite() || self.max_points <= 0.0 {
            return Some(ReviewReason::NonPositiveMaxPoints {
                max_points: self.max_points,
            });
        }

        match self.score {
            Score::Graded { earned } if !earned.is_finite() || earned < 0.0 => {
                Some(ReviewReason::EarnedOutOfRange {
                    earned,
                    max_points: self.max_points,
                })
            }
            Score::Graded { earned } if earned > self.max_points => {
                Some(ReviewReason::EarnedOutOfRange {
                    earned,
                    max_points: self.max_points,
                })
            }
            _ => None,
        }
    }
}

/// Why a record was held out of aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReviewReason {
    NonPositiveMaxPoints { max_points: f64 },
    EarnedOutOfRange { earned: f64, max_points: f64 },
}

impl ReviewReason {
    pub fn summary(&self) -> String {
        match self {
            ReviewReason::NonPositiveMaxPoints { max_points } => {
                format!("max points must be positive (found {max_points})")
            }
            ReviewReason::EarnedOutOfRange { earned, max_points } => {
                format!("earned {earned} outside 0..={max_points}")
            }
        }
    }
}

/// Malformed record surfaced for manual review instead of aborting a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub id: AssignmentId,
    pub title: String,
    pub category: String,
    pub reason: ReviewReason,
}

impl ReviewItem {
    fn new(assignment: &Assignment, reason: ReviewReason) -> Self {
        Self {
            id: assignment.id.clone(),
            title: assignment.title.clone(),
            category: assignment.category.clone(),
            reason,
        }
    }
}

/// Splits records into those safe to aggregate and those needing review.
pub(crate) fn partition_valid(assignments: &[Assignment]) -> (Vec<&Assignment>, Vec<ReviewItem>) {
    let mut valid = Vec::with_capacity(assignments.len());
    let mut needs_review = Vec::new();

    for assignment in assignments {
        match assignment.review_reason() {
            Some(reason) => needs_review.push(ReviewItem::new(assignment, reason)),
            None => valid.push(assignment),
        }
    }

    (valid, needs_review)
}

/// Division that collapses a zero or non-finite denominator to 0.
pub(crate) fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 && denominator.is_finite() {
        let value = numerator / denominator;
        if value.is_finite() {
            value
        } else {
            0.0
        }
    } else {
        0.0
    }
}
