// src/domain/mod.rs
pub mod errors;
pub mod models;
pub mod repository;

// Re-export common types for convenience
pub use errors::{
    AppError, AppResult, JournalError, JournalResult, MetricsError, MetricsResult,
    ValidationError, ValidationResult,
};
pub use models::{Direction, Grade, NewTrade, Ticker, Timeframe, Trade};
pub use repository::{Outcome, TradeFilter, TradeRepository};
