// src/domain/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Journal error: {0}")]
    Journal(#[from] JournalError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A trade whose prices describe an impossible risk setup, or a reference
/// entity with an unusable name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Entry price must be greater than stop loss price")]
    LongEntryBelowStop,

    #[error("Target price must be greater than entry price")]
    LongTargetBelowEntry,

    #[error("Entry price must be less than stop loss price")]
    ShortEntryAboveStop,

    #[error("Target price must be less than entry price")]
    ShortTargetAboveEntry,

    #[error("Invalid name: {0}")]
    InvalidName(String),
}

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Trade {0} not found")]
    NotFound(u64),

    #[error("Trade {0} is already closed")]
    AlreadyClosed(u64),

    #[error("Rejected trade: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    #[error("Insufficient data for {0}")]
    InsufficientData(String),
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
pub type ValidationResult<T> = Result<T, ValidationError>;
pub type JournalResult<T> = Result<T, JournalError>;
pub type MetricsResult<T> = Result<T, MetricsError>;
