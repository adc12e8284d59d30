use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::{Assignment, CourseConfig};

/// Identifier wrapper for courses, the key of the external store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CourseId(pub String);

/// Everything the engine needs for one course, as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub course_id: CourseId,
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub config: Option<CourseConfig>,
    pub updated_at: DateTime<Utc>,
}

/// Storage abstraction keyed by course so the service can run against any store.
pub trait CourseRepository: Send + Sync {
    fn upsert(&self, record: CourseRecord) -> Result<CourseRecord, RepositoryError>;
    fn fetch(&self, id: &CourseId) -> Result<Option<CourseRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<CourseId>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("course not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
