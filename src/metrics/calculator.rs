//! Trade performance calculator.
//!
//! Every aggregate is recomputed from the borrowed trade slice on each call.

use std::collections::BTreeMap;

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::errors::{MetricsError, MetricsResult};
use crate::domain::models::Trade;

/// Summed actual R of all trades entered on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyR {
    pub day: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_r: Decimal,
}

/// Flat dashboard figures, exactly the ten dashboard keys. Rates are already
/// scaled to percentages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub trade_count: usize,
    pub win_count: usize,
    pub loss_count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub strike_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_winner: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_loser: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub expectancy: Decimal,
    pub winning_days_count: usize,
    pub losing_days_count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub winning_day_percent: Decimal,
}

/// What the dashboard shows: figures, or a placeholder until there is
/// enough history to compute them. Serializing adds a `status` tag next to
/// the summary keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Dashboard {
    Ready(DashboardSummary),
    NoData { trade_count: usize },
}

/// Metrics calculator over a set of journaled trades.
pub struct MetricsCalculator<'a> {
    trades: &'a [Trade],
    offset: FixedOffset,
}

impl<'a> MetricsCalculator<'a> {
    /// Days are taken in UTC.
    pub fn new(trades: &'a [Trade]) -> Self {
        Self::with_offset(trades, Utc.fix())
    }

    pub fn with_offset(trades: &'a [Trade], offset: FixedOffset) -> Self {
        Self { trades, offset }
    }

    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }

    pub fn closed_count(&self) -> usize {
        self.trades.iter().filter(|t| t.is_closed()).count()
    }

    pub fn win_count(&self) -> usize {
        self.trades
            .iter()
            .filter(|t| t.raw_actual_r().is_some_and(|r| r > Decimal::ZERO))
            .count()
    }

    pub fn loss_count(&self) -> usize {
        self.trades
            .iter()
            .filter(|t| t.raw_actual_r().is_some_and(|r| r <= Decimal::ZERO))
            .count()
    }

    /// Fraction of closed trades that won, to 3 places.
    pub fn strike_rate(&self) -> MetricsResult<Decimal> {
        let rate = ratio(self.win_count(), self.closed_count(), "strike rate")?;
        Ok(rate.round_dp(3))
    }

    pub fn average_winner(&self) -> Decimal {
        self.average_r(true)
    }

    pub fn average_loser(&self) -> Decimal {
        self.average_r(false)
    }

    /// Mean actual R of winners (or losers). The unrounded values are summed
    /// and the sum rounded to 2 places before dividing; no trades on that
    /// side gives zero.
    fn average_r(&self, winners: bool) -> Decimal {
        let side: Vec<Decimal> = self
            .trades
            .iter()
            .filter(|t| t.is_winner() == Some(winners))
            .filter_map(Trade::raw_actual_r)
            .collect();

        if side.is_empty() {
            return Decimal::ZERO;
        }

        let total: Decimal = side.iter().sum();
        total.round_dp(2) / Decimal::from(side.len() as u64)
    }

    /// Probability weighted R per trade, to 2 places.
    pub fn expectancy(&self) -> MetricsResult<Decimal> {
        let strike_rate = self.strike_rate()?;
        let expectancy = strike_rate * self.average_winner()
            + (Decimal::ONE - strike_rate) * self.average_loser();
        Ok(expectancy.round_dp(2))
    }

    fn daily_totals(&self) -> BTreeMap<NaiveDate, Decimal> {
        let mut days = BTreeMap::new();
        for trade in self.trades {
            *days
                .entry(trade.entry_day(&self.offset))
                .or_insert(Decimal::ZERO) += trade.realized_r();
        }
        days
    }

    /// Distinct entry dates, open trades included.
    pub fn total_trading_days_count(&self) -> usize {
        self.daily_totals().len()
    }

    /// Per-day R totals in date order. Each call starts a fresh pass over
    /// the current trades.
    pub fn r_per_day(&self) -> impl Iterator<Item = DailyR> {
        self.daily_totals()
            .into_iter()
            .map(|(day, total)| DailyR {
                day,
                total_r: total.round_dp(2),
            })
    }

    pub fn winning_days_count(&self) -> usize {
        self.r_per_day()
            .filter(|d| d.total_r > Decimal::ZERO)
            .count()
    }

    pub fn losing_days_count(&self) -> usize {
        self.r_per_day()
            .filter(|d| d.total_r <= Decimal::ZERO)
            .count()
    }

    /// Share of trading days that ended positive, as a percentage to 1 place.
    pub fn winning_days_percent(&self) -> MetricsResult<Decimal> {
        let share = ratio(
            self.winning_days_count(),
            self.total_trading_days_count(),
            "winning day percentage",
        )?;
        Ok((share * Decimal::ONE_HUNDRED).round_dp(1))
    }

    /// All dashboard figures, failing if any rate lacks a denominator.
    pub fn summary(&self) -> MetricsResult<DashboardSummary> {
        let strike_rate = self.strike_rate()?;

        Ok(DashboardSummary {
            trade_count: self.trade_count(),
            win_count: self.win_count(),
            loss_count: self.loss_count(),
            strike_rate: (strike_rate * Decimal::ONE_HUNDRED).round_dp(1),
            average_winner: self.average_winner().round_dp(2),
            average_loser: self.average_loser().round_dp(2),
            expectancy: self.expectancy()?,
            winning_days_count: self.winning_days_count(),
            losing_days_count: self.losing_days_count(),
            winning_day_percent: self.winning_days_percent()?,
        })
    }

    pub fn dashboard(&self) -> Dashboard {
        match self.summary() {
            Ok(summary) => Dashboard::Ready(summary),
            Err(MetricsError::InsufficientData(what)) => {
                log::debug!("Dashboard has no data yet: {}", what);
                Dashboard::NoData {
                    trade_count: self.trade_count(),
                }
            }
        }
    }
}

fn ratio(count: usize, total: usize, what: &str) -> MetricsResult<Decimal> {
    if total == 0 {
        return Err(MetricsError::InsufficientData(what.to_string()));
    }
    Ok(Decimal::from(count as u64) / Decimal::from(total as u64))
}
