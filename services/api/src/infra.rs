use gradebook::courses::{CourseId, CourseRecord, CourseRepository, CourseSnapshot, RepositoryError};
use gradebook::engine::CalculatorSettings;
use gradebook::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) settings: CalculatorSettings,
}

/// Process-local course store used until an external store is wired in.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCourseRepository {
    records: Arc<Mutex<BTreeMap<CourseId, CourseRecord>>>,
}

impl InMemoryCourseRepository {
    fn guard(&self) -> Result<MutexGuard<'_, BTreeMap<CourseId, CourseRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("course store lock poisoned".to_string()))
    }
}

impl CourseRepository for InMemoryCourseRepository {
    fn upsert(&self, record: CourseRecord) -> Result<CourseRecord, RepositoryError> {
        let mut guard = self.guard()?;
        guard.insert(record.course_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &CourseId) -> Result<Option<CourseRecord>, RepositoryError> {
        Ok(self.guard()?.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<CourseId>, RepositoryError> {
        Ok(self.guard()?.keys().cloned().collect())
    }
}

/// Read a `{assignments, config}` JSON snapshot from disk.
pub(crate) fn load_snapshot(path: &Path) -> Result<CourseSnapshot, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
