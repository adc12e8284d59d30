//! Grade aggregation: weight resolution, policy application, and averaging.

pub mod calculator;
pub mod course_config;
pub mod domain;
mod error;
pub mod policy;
pub mod report;
pub mod simple;
pub mod views;
pub mod weights;

#[cfg(test)]
mod tests;

pub use calculator::{CalculatorSettings, WeightedAverageCalculator};
pub use course_config::{
    BestOfPolicy, CategoryGroup, ClobberPolicy, ClobberRule, ConfigWarning, CourseConfig,
    DistributionMethod, DropPolicy, Normalization, ScoreSubstitution,
};
pub use domain::{
    Assignment, AssignmentId, ReviewItem, ReviewReason, Score, ScoreStatistics, SubstitutionInfo,
};
pub use error::GradeError;
pub use policy::{
    select_for_category, PolicyEngine, PolicyOutcome, Selection, StandardPolicyEngine,
};
pub use report::{CategoryDetail, DroppedAssignment, GradeReport};
pub use simple::{SimpleAverage, SimpleAverageCalculator};
pub use views::{CategoryView, CompletionLevel, GradeReportSummary, SimpleAverageSummary};
