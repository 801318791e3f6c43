// src/domain/repository/mod.rs
// Repository interface for the trade journal

use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDate, Offset, Utc};

use crate::domain::errors::JournalResult;
use crate::domain::models::{Direction, NewTrade, Trade};

/// Settled state of a trade, as used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner,
    Loser,
    Open,
}

impl Outcome {
    pub fn of(trade: &Trade) -> Self {
        match trade.is_winner() {
            Some(true) => Outcome::Winner,
            Some(false) => Outcome::Loser,
            None => Outcome::Open,
        }
    }
}

/// Selection over the trade table. Empty fields match everything; the date
/// range is inclusive and compares entry dates in `offset`.
#[derive(Debug, Clone)]
pub struct TradeFilter {
    pub direction: Option<Direction>,
    pub outcome: Option<Outcome>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub offset: FixedOffset,
}

impl Default for TradeFilter {
    fn default() -> Self {
        Self {
            direction: None,
            outcome: None,
            from: None,
            to: None,
            offset: Utc.fix(),
        }
    }
}

impl TradeFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn in_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn matches(&self, trade: &Trade) -> bool {
        if self.direction.is_some_and(|d| d != trade.direction) {
            return false;
        }
        if self.outcome.is_some_and(|o| o != Outcome::of(trade)) {
            return false;
        }

        let day = trade.entry_day(&self.offset);
        if self.from.is_some_and(|from| day < from) {
            return false;
        }
        if self.to.is_some_and(|to| day > to) {
            return false;
        }

        true
    }
}

/// Persistence collaborator for trades. Implementations reject records that
/// fail validation before anything is written.
#[async_trait]
pub trait TradeRepository {
    async fn insert(&self, trade: NewTrade) -> JournalResult<Trade>;
    async fn update(&self, trade: Trade) -> JournalResult<Trade>;
    async fn get(&self, id: u64) -> JournalResult<Trade>;
    async fn list(&self, filter: &TradeFilter) -> JournalResult<Vec<Trade>>;
    async fn count(&self) -> JournalResult<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn trade_on(day: u32, direction: Direction, exit: Option<rust_decimal::Decimal>) -> Trade {
        let at = Utc.with_ymd_and_hms(2024, 10, day, 9, 30, 0).unwrap();
        let (stop, target) = match direction {
            Direction::Long => (dec!(95), dec!(115)),
            Direction::Short => (dec!(105), dec!(85)),
        };
        let mut t = NewTrade::open(direction, at, dec!(100), stop, target).into_trade(1, at);
        t.exit_price = exit;
        t
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = TradeFilter::all();
        assert!(filter.matches(&trade_on(1, Direction::Long, None)));
        assert!(filter.matches(&trade_on(2, Direction::Short, Some(dec!(90)))));
    }

    #[test]
    fn test_direction_and_outcome() {
        let filter = TradeFilter::all()
            .direction(Direction::Short)
            .outcome(Outcome::Winner);
        assert!(filter.matches(&trade_on(1, Direction::Short, Some(dec!(90)))));
        assert!(!filter.matches(&trade_on(1, Direction::Short, Some(dec!(104)))));
        assert!(!filter.matches(&trade_on(1, Direction::Short, None)));
        assert!(!filter.matches(&trade_on(1, Direction::Long, Some(dec!(110)))));

        let open = TradeFilter::all().outcome(Outcome::Open);
        assert!(open.matches(&trade_on(1, Direction::Long, None)));
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let from = NaiveDate::from_ymd_opt(2024, 10, 2).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 10, 3).unwrap();
        let filter = TradeFilter::all().between(from, to);
        assert!(!filter.matches(&trade_on(1, Direction::Long, None)));
        assert!(filter.matches(&trade_on(2, Direction::Long, None)));
        assert!(filter.matches(&trade_on(3, Direction::Long, None)));
        assert!(!filter.matches(&trade_on(4, Direction::Long, None)));
    }
}
