//! Application error types for core storage and domain logic.
use crate::reader::Category;
use crate::validate::ValidationErrors;
use thiserror::Error;

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] redb::Error),

    #[error("Storage error: {0}")]
    StorageMessage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// One or more required submission fields were missing or empty.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// The store rejected or could not be reached during creation.
    #[error("Write failed: {0}")]
    Write(#[source] Box<AppError>),

    /// A single category query failed; the other categories are unaffected.
    #[error("Read failed for {category}: {source}")]
    Read {
        category: Category,
        #[source]
        source: Box<AppError>,
    },

    #[error("No acting user identity")]
    Unauthenticated,

    #[error("A submission is already in flight")]
    SubmissionInFlight,
}

impl AppError {
    /// Wrap a store failure raised during snippet creation.
    pub fn write(source: AppError) -> Self {
        match source {
            already @ AppError::Write(_) => already,
            other => AppError::Write(Box::new(other)),
        }
    }

    /// Wrap a store failure raised while loading `category`.
    pub fn read(category: Category, source: AppError) -> Self {
        match source {
            already @ AppError::Read { .. } => already,
            other => AppError::Read {
                category,
                source: Box::new(other),
            },
        }
    }

    /// `true` for failures the caller may retry without changing input.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::Write(_) | AppError::Read { .. } | AppError::SubmissionInFlight
        )
    }
}

impl From<redb::DatabaseError> for AppError {
    fn from(value: redb::DatabaseError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::TransactionError> for AppError {
    fn from(value: redb::TransactionError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::TableError> for AppError {
    fn from(value: redb::TableError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::StorageError> for AppError {
    fn from(value: redb::StorageError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::CommitError> for AppError {
    fn from(value: redb::CommitError) -> Self {
        Self::Database(value.into())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::StorageMessage(format!("Store task failed: {}", value))
    }
}
