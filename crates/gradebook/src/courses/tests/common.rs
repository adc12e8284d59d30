use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::courses::repository::{CourseId, CourseRecord, CourseRepository, RepositoryError};
use crate::courses::{course_router, CourseSnapshot, GradebookService};
use crate::engine::{Assignment, CalculatorSettings, CourseConfig, DropPolicy};

pub(super) fn course_id() -> CourseId {
    CourseId("math-101".to_string())
}

pub(super) fn assignments() -> Vec<Assignment> {
    vec![
        Assignment::graded("hw1", "Homework 1", "homework", 8.0, 10.0),
        Assignment::graded("hw2", "Homework 2", "homework", 9.0, 10.0),
        Assignment::graded("hw3", "Homework 3", "homework", 5.0, 10.0),
        Assignment::ungraded("final", "Final Exam", "final", 100.0),
    ]
}

pub(super) fn course_config() -> CourseConfig {
    let mut config = CourseConfig::default();
    config.weights.insert("homework".to_string(), 0.3);
    config.weights.insert("final".to_string(), 0.5);
    config.weights.insert("project".to_string(), 0.2);
    config
        .drop_policies
        .insert("homework".to_string(), DropPolicy::lowest(1));
    config
}

pub(super) fn snapshot() -> CourseSnapshot {
    CourseSnapshot {
        assignments: assignments(),
        config: Some(course_config()),
    }
}

pub(super) fn build_service() -> (GradebookService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = GradebookService::new(repository.clone(), CalculatorSettings::default());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<CourseId, CourseRecord>>>,
}

impl CourseRepository for MemoryRepository {
    fn upsert(&self, record: CourseRecord) -> Result<CourseRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.course_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &CourseId) -> Result<Option<CourseRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<CourseId>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut ids: Vec<CourseId> = guard.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

pub(super) struct UnavailableRepository;

impl CourseRepository for UnavailableRepository {
    fn upsert(&self, _record: CourseRecord) -> Result<CourseRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &CourseId) -> Result<Option<CourseRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<CourseId>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn course_router_with_service(
    service: GradebookService<MemoryRepository>,
) -> axum::Router {
    course_router(Arc::new(service))
}
