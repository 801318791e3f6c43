// src/lib.rs
// Main library module declarations

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod metrics;

pub use application::service::{JournalService, TradeReport};
pub use domain::{Direction, Grade, NewTrade, Ticker, Timeframe, Trade, TradeFilter};
pub use infrastructure::storage::JsonTradeStore;
pub use metrics::{Dashboard, DashboardSummary, MetricsCalculator};
