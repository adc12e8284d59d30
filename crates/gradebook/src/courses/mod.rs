//! Course storage boundary, grade projection service, and HTTP routes.

pub mod import;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use import::{GradebookImporter, ImportError};
pub use repository::{CourseId, CourseRecord, CourseRepository, RepositoryError};
pub use router::course_router;
pub use service::{
    CourseSnapshot, GradeProjection, GradeProjector, GradebookService, GradebookServiceError,
    SavedCourse,
};
