// src/domain/models.rs
use crate::domain::errors::{ValidationError, ValidationResult};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fractional digits kept for risk multiples.
pub const R_DECIMAL_PLACES: u32 = 2;

/// Longest accepted ticker or timeframe name.
pub const MAX_NAME_LEN: usize = 10;

/// Trade direction. Every direction-dependent rule of the journal lives here
/// so callers never branch on long/short themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
        }
    }

    /// Signed move from `entry` to `price`, positive when it favours the trade.
    pub fn reward(&self, entry: Decimal, price: Decimal) -> Decimal {
        match self {
            Direction::Long => price - entry,
            Direction::Short => entry - price,
        }
    }

    /// Distance between entry and stop, positive for a valid setup.
    pub fn risk(&self, entry: Decimal, stop: Decimal) -> Decimal {
        match self {
            Direction::Long => entry - stop,
            Direction::Short => stop - entry,
        }
    }

    pub fn is_favourable(&self, entry: Decimal, exit: Decimal) -> bool {
        match self {
            Direction::Long => exit > entry,
            Direction::Short => exit < entry,
        }
    }

    /// Reject setups where the stop or target sits on the wrong side of entry.
    pub fn check_prices(
        &self,
        entry: Decimal,
        stop: Decimal,
        target: Decimal,
    ) -> ValidationResult<()> {
        match self {
            Direction::Long => {
                if entry <= stop {
                    return Err(ValidationError::LongEntryBelowStop);
                }
                if target <= entry {
                    return Err(ValidationError::LongTargetBelowEntry);
                }
            }
            Direction::Short => {
                if entry >= stop {
                    return Err(ValidationError::ShortEntryAboveStop);
                }
                if target >= entry {
                    return Err(ValidationError::ShortTargetAboveEntry);
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subjective quality rating of an entry or exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    A,
    B,
    C,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Grade::A => write!(f, "A"),
            Grade::B => write!(f, "B"),
            Grade::C => write!(f, "C"),
        }
    }
}

fn check_name(kind: &str, name: &str) -> ValidationResult<String> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::InvalidName(format!(
            "{} name must be 1 to {} characters, got {:?}",
            kind, MAX_NAME_LEN, name
        )));
    }
    Ok(name.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticker {
    pub name: String,
}

impl Ticker {
    pub fn new(name: &str) -> ValidationResult<Self> {
        Ok(Self {
            name: check_name("Ticker", name)?,
        })
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Chart timeframe that triggered the trade (e.g. "5m", "1h").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeframe {
    pub name: String,
}

impl Timeframe {
    pub fn new(name: &str) -> ValidationResult<Self> {
        Ok(Self {
            name: check_name("Timeframe", name)?,
        })
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A trade as submitted to the journal, before it has an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrade {
    pub ticker: Option<Ticker>,
    pub timeframe: Option<Timeframe>,
    pub direction: Direction,
    pub entered_at: DateTime<Utc>,
    pub exited_at: Option<DateTime<Utc>>,
    pub entry_price: Decimal,
    pub stop_price: Decimal,
    pub target_price: Decimal,
    pub exit_price: Option<Decimal>,
    pub entry_grade: Option<Grade>,
    pub exit_grade: Option<Grade>,
}

impl NewTrade {
    /// Open-state draft carrying only the entry fields.
    pub fn open(
        direction: Direction,
        entered_at: DateTime<Utc>,
        entry_price: Decimal,
        stop_price: Decimal,
        target_price: Decimal,
    ) -> Self {
        Self {
            ticker: None,
            timeframe: None,
            direction,
            entered_at,
            exited_at: None,
            entry_price,
            stop_price,
            target_price,
            exit_price: None,
            entry_grade: None,
            exit_grade: None,
        }
    }

    pub fn with_ticker(mut self, ticker: Ticker) -> Self {
        self.ticker = Some(ticker);
        self
    }

    pub fn with_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = Some(timeframe);
        self
    }

    pub fn with_entry_grade(mut self, grade: Grade) -> Self {
        self.entry_grade = Some(grade);
        self
    }

    /// Journal a trade that has already been closed.
    pub fn closed_at(mut self, exited_at: DateTime<Utc>, exit_price: Decimal) -> Self {
        self.exited_at = Some(exited_at);
        self.exit_price = Some(exit_price);
        self
    }

    pub fn validate(&self) -> ValidationResult<()> {
        self.direction
            .check_prices(self.entry_price, self.stop_price, self.target_price)
    }

    /// Give the draft its identity; bookkeeping timestamps start at `now`.
    pub fn into_trade(self, id: u64, now: DateTime<Utc>) -> Trade {
        Trade {
            id,
            ticker: self.ticker,
            timeframe: self.timeframe,
            direction: self.direction,
            entered_at: self.entered_at,
            exited_at: self.exited_at,
            entry_price: self.entry_price,
            stop_price: self.stop_price,
            target_price: self.target_price,
            exit_price: self.exit_price,
            entry_grade: self.entry_grade,
            exit_grade: self.exit_grade,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A journaled trade. Risk multiples and the winner flag are derived on
/// every call and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: u64,
    pub ticker: Option<Ticker>,
    pub timeframe: Option<Timeframe>,
    pub direction: Direction,
    pub entered_at: DateTime<Utc>,
    pub exited_at: Option<DateTime<Utc>>,
    pub entry_price: Decimal,
    pub stop_price: Decimal,
    pub target_price: Decimal,
    pub exit_price: Option<Decimal>,
    pub entry_grade: Option<Grade>,
    pub exit_grade: Option<Grade>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Trade {
    pub fn validate(&self) -> ValidationResult<()> {
        self.direction
            .check_prices(self.entry_price, self.stop_price, self.target_price)
    }

    pub fn is_long(&self) -> bool {
        self.direction == Direction::Long
    }

    pub fn is_open(&self) -> bool {
        self.exit_price.is_none()
    }

    pub fn is_closed(&self) -> bool {
        self.exit_price.is_some()
    }

    /// Calendar date the trade was entered on, as seen from `offset`.
    pub fn entry_day(&self, offset: &FixedOffset) -> NaiveDate {
        self.entered_at.with_timezone(offset).date_naive()
    }

    /// Initial risk per unit. `None` when entry and stop coincide.
    fn risk(&self) -> Option<Decimal> {
        let risk = self.direction.risk(self.entry_price, self.stop_price);
        (!risk.is_zero()).then_some(risk)
    }

    /// Unrounded reward-to-risk ratio of `price`.
    fn r_exact(&self, price: Decimal) -> Option<Decimal> {
        let reward = self.direction.reward(self.entry_price, price);
        reward.checked_div(self.risk()?)
    }

    /// Reward-to-risk ratio planned at entry, to 2 places.
    pub fn planned_r(&self) -> Option<Decimal> {
        self.r_exact(self.target_price)
            .map(|r| r.round_dp(R_DECIMAL_PLACES))
    }

    /// Realized reward-to-risk ratio to 2 places; `None` while the trade is open.
    pub fn actual_r(&self) -> Option<Decimal> {
        self.raw_actual_r().map(|r| r.round_dp(R_DECIMAL_PLACES))
    }

    /// Realized ratio at full precision. Aggregates classify and sum this
    /// value and round only their result.
    pub fn raw_actual_r(&self) -> Option<Decimal> {
        self.r_exact(self.exit_price?)
    }

    /// Full precision actual R with open trades counting as zero.
    pub fn realized_r(&self) -> Decimal {
        self.raw_actual_r().unwrap_or(Decimal::ZERO)
    }

    /// `None` while the trade is open.
    pub fn is_winner(&self) -> Option<bool> {
        self.exit_price
            .map(|exit| self.direction.is_favourable(self.entry_price, exit))
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let ticker = self
            .ticker
            .as_ref()
            .map(|t| t.name.as_str())
            .unwrap_or("None");
        write!(
            f,
            "{} {} at {}",
            self.direction,
            ticker,
            self.entered_at.format("%H:%M-%d/%m/%Y")
        )
    }
}
