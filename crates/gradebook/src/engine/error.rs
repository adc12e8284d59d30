/// Structural problems with a course configuration.
///
/// These are meant to be caught by the config-editing layer before a course is
/// saved; the engine still fails fast on them rather than double counting.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GradeError {
    #[error("category group '{group}' is invalid: {reason}")]
    InvalidGroup { group: String, reason: String },
    #[error("category '{category}' is listed in both '{first}' and '{second}'")]
    DuplicateCategory {
        category: String,
        first: String,
        second: String,
    },
    #[error("policy '{policy}' is invalid: {reason}")]
    InvalidPolicy { policy: String, reason: String },
    #[error("weight for category '{category}' must be within 0..=1 (found {weight})")]
    InvalidWeight { category: String, weight: f64 },
}
