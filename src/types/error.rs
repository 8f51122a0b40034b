use thiserror::Error;

/// Field-level validation failures, detected before any write is attempted.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name must be alphabetic words separated by spaces, at least 2 characters")]
    InvalidName,
    #[error("age must be a positive integer")]
    InvalidAge,
    #[error("email must contain '@' and '.'")]
    InvalidEmail,
    #[error("no fields to update")]
    EmptyUpdate,
}

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("user {0} not found")]
    UserNotFound(i64),
    #[error("glucose entry {0} not found")]
    EntryNotFound(i64),
    #[error("email {0} is already registered")]
    DuplicateEmail(String),
    #[error("schema error: {0}")]
    Schema(String),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[source] std::io::Error),
    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),
}
