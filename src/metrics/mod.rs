//! Trade performance metrics.
//!
//! Derives the journal dashboard from raw trades:
//! - Win/loss counts and strike rate
//! - Average winner, average loser and expectancy in R
//! - Per-day R totals and winning-day percentage

pub mod calculator;

pub use calculator::{DailyR, Dashboard, DashboardSummary, MetricsCalculator};
