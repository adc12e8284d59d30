//! Gradebook CSV export import.

mod normalizer;
mod parser;

use crate::engine::{Assignment, CourseConfig};
use std::io::Read;
use std::path::Path;

use parser::RowError;

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: usize, reason: String },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read gradebook export: {}", err),
            ImportError::Csv(err) => write!(f, "invalid gradebook CSV data: {}", err),
            ImportError::InvalidRow { line, reason } => {
                write!(f, "gradebook row on line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<RowError> for ImportError {
    fn from(err: RowError) -> Self {
        match err {
            RowError::Csv(err) => Self::Csv(err),
            RowError::Invalid { line, reason } => Self::InvalidRow { line, reason },
        }
    }
}

pub struct GradebookImporter;

impl GradebookImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Assignment>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Read assignments in file order. Blank `Earned` cells import as ungraded.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Assignment>, ImportError> {
        let assignments = parser::parse_assignments(reader)?;
        tracing::debug!(count = assignments.len(), "gradebook export imported");
        Ok(assignments)
    }

    /// Key a hand-written config the way imported categories are keyed, so
    /// `"Final Exam"` in a config matches `final_exam` rows.
    pub fn align_config(config: CourseConfig) -> CourseConfig {
        normalizer::normalize_config(config)
    }
}
