//! Core error types for studyroom-core.
//!
//! Every fallible operation in the library reports one of these enums.
//! `ValidationError` is the only kind the planner itself can produce; the
//! others come from the storage and configuration collaborators.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Core error type for studyroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A referenced record does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
///
/// Each variant knows which input field it refers to, see [`ValidationError::field`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The request carried no subjects at all
    #[error("at least one subject is required")]
    NoSubjects,

    /// A subject name is empty or whitespace
    #[error("subject #{index} has an empty name")]
    EmptySubjectName { index: usize },

    /// A subject has no exam date
    #[error("please select an exam date for '{subject}'")]
    MissingExamDate { index: usize, subject: String },

    /// A subject's exam date could not be parsed
    #[error("exam date '{value}' for '{subject}' is not an ISO-8601 date")]
    InvalidExamDate {
        index: usize,
        subject: String,
        value: String,
    },

    /// A subject's exam date lies before the planning date
    #[error("exam for '{subject}' on {exam_date} is before the planning date {planning_date}")]
    ExamDateInPast {
        index: usize,
        subject: String,
        exam_date: NaiveDate,
        planning_date: NaiveDate,
    },

    /// Daily study budget outside 1..=12
    #[error("available hours per day must be between 1 and 12, got {value}")]
    HoursPerDayOutOfRange { value: i64 },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    /// Name of the input field that failed, using the boundary JSON names.
    pub fn field(&self) -> String {
        match self {
            Self::NoSubjects => "subjects".to_string(),
            Self::EmptySubjectName { index } => format!("subjects[{index}].name"),
            Self::MissingExamDate { index, .. }
            | Self::InvalidExamDate { index, .. }
            | Self::ExamDateInPast { index, .. } => format!("subjects[{index}].examDate"),
            Self::HoursPerDayOutOfRange { .. } => "availableHoursPerDay".to_string(),
            Self::InvalidValue { field, .. } => field.clone(),
        }
    }
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => {
                if inner.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_follow_boundary_json() {
        assert_eq!(ValidationError::NoSubjects.field(), "subjects");
        assert_eq!(
            ValidationError::MissingExamDate {
                index: 2,
                subject: "Math".into()
            }
            .field(),
            "subjects[2].examDate"
        );
        assert_eq!(
            ValidationError::HoursPerDayOutOfRange { value: 13 }.field(),
            "availableHoursPerDay"
        );
    }

    #[test]
    fn missing_date_message_is_user_facing() {
        let err = ValidationError::MissingExamDate {
            index: 0,
            subject: "Biology".into(),
        };
        assert_eq!(err.to_string(), "please select an exam date for 'Biology'");
    }

    #[test]
    fn rusqlite_errors_become_query_failures() {
        let err: DatabaseError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, DatabaseError::QueryFailed(_)));
    }
}
