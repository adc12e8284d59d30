use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::repository::{CourseId, CourseRecord, CourseRepository, RepositoryError};
use crate::engine::{
    Assignment, CalculatorSettings, ConfigWarning, CourseConfig, GradeError, GradeReport,
    PolicyEngine, SimpleAverage, SimpleAverageCalculator, StandardPolicyEngine,
    WeightedAverageCalculator,
};

/// Grade shown for a course: weighted when configured, simple otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GradeProjection {
    Weighted(GradeReport),
    Simple(SimpleAverage),
}

impl GradeProjection {
    pub const fn mode_label(&self) -> &'static str {
        match self {
            GradeProjection::Weighted(_) => "weighted",
            GradeProjection::Simple(_) => "simple",
        }
    }

    /// Headline percentage. Only the simple fallback has none while nothing
    /// is graded; a weighted course reads 0 until graded work arrives.
    pub fn headline(&self) -> Option<f64> {
        match self {
            GradeProjection::Weighted(report) => Some(report.weighted_average),
            GradeProjection::Simple(simple) => {
                simple.has_grades.then_some(simple.average_percentage)
            }
        }
    }
}

/// Assignments plus optional config as exchanged with callers and files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseSnapshot {
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub config: Option<CourseConfig>,
}

/// Computes a projection, falling back to the simple average when unweighted.
#[derive(Debug, Clone)]
pub struct GradeProjector<P = StandardPolicyEngine> {
    calculator: WeightedAverageCalculator<P>,
}

impl Default for GradeProjector {
    fn default() -> Self {
        Self::new(StandardPolicyEngine::new(), CalculatorSettings::default())
    }
}

impl<P: PolicyEngine> GradeProjector<P> {
    pub fn new(policies: P, settings: CalculatorSettings) -> Self {
        Self {
            calculator: WeightedAverageCalculator::with_settings(policies, settings),
        }
    }

    pub fn project(
        &self,
        assignments: &[Assignment],
        config: Option<&CourseConfig>,
    ) -> Result<GradeProjection, GradeError> {
        match self.calculator.compute(assignments, config)? {
            Some(report) => Ok(GradeProjection::Weighted(report)),
            None => Ok(GradeProjection::Simple(SimpleAverageCalculator::compute(
                assignments,
            ))),
        }
    }
}

/// Result of saving a course, carrying non-fatal configuration findings.
#[derive(Debug, Clone, Serialize)]
pub struct SavedCourse {
    pub course_id: CourseId,
    pub assignment_count: usize,
    pub warnings: Vec<ConfigWarning>,
}

/// Service composing the course store and the grade projector.
pub struct GradebookService<R, P = StandardPolicyEngine> {
    repository: Arc<R>,
    projector: GradeProjector<P>,
}

impl<R> GradebookService<R>
where
    R: CourseRepository + 'static,
{
    pub fn new(repository: Arc<R>, settings: CalculatorSettings) -> Self {
        Self::with_projector(
            repository,
            GradeProjector::new(StandardPolicyEngine::new(), settings),
        )
    }
}

impl<R, P> GradebookService<R, P>
where
    R: CourseRepository + 'static,
    P: PolicyEngine,
{
    pub fn with_projector(repository: Arc<R>, projector: GradeProjector<P>) -> Self {
        Self {
            repository,
            projector,
        }
    }

    /// Validate and store a course snapshot, replacing any previous one.
    pub fn save_course(
        &self,
        course_id: CourseId,
        assignments: Vec<Assignment>,
        config: Option<CourseConfig>,
    ) -> Result<SavedCourse, GradebookServiceError> {
        let warnings = match &config {
            Some(config) => config.validate()?,
            None => Vec::new(),
        };
        for warning in &warnings {
            warn!(course = %course_id.0, warning = %warning.summary(), "course config warning");
        }

        let record = CourseRecord {
            course_id,
            assignments,
            config,
            updated_at: Utc::now(),
        };
        let stored = self.repository.upsert(record)?;

        Ok(SavedCourse {
            course_id: stored.course_id,
            assignment_count: stored.assignments.len(),
            warnings,
        })
    }

    /// Re-run the engine over the stored snapshot for a course.
    pub fn project(&self, course_id: &CourseId) -> Result<GradeProjection, GradebookServiceError> {
        let record = self
            .repository
            .fetch(course_id)?
            .ok_or(RepositoryError::NotFound)?;

        let projection = self
            .projector
            .project(&record.assignments, record.config.as_ref())?;

        info!(
            course = %course_id.0,
            mode = projection.mode_label(),
            headline = ?projection.headline(),
            "grade projected"
        );
        Ok(projection)
    }

    /// Project a snapshot that is not stored.
    pub fn project_snapshot(
        &self,
        assignments: &[Assignment],
        config: Option<&CourseConfig>,
    ) -> Result<GradeProjection, GradebookServiceError> {
        Ok(self.projector.project(assignments, config)?)
    }

    pub fn courses(&self) -> Result<Vec<CourseId>, GradebookServiceError> {
        Ok(self.repository.list()?)
    }
}

/// Error raised by the gradebook service.
#[derive(Debug, thiserror::Error)]
pub enum GradebookServiceError {
    #[error(transparent)]
    Config(#[from] GradeError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
