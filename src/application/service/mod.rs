// src/application/service/mod.rs
// Application services

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::errors::{JournalError, JournalResult};
use crate::domain::models::{NewTrade, Trade};
use crate::domain::repository::{TradeFilter, TradeRepository};
use crate::metrics::{Dashboard, MetricsCalculator};

/// A trade together with the values derived from it, for read-only display.
#[derive(Debug, Clone, Serialize)]
pub struct TradeReport {
    pub trade: Trade,
    pub planned_r: Option<Decimal>,
    pub actual_r: Option<Decimal>,
    pub is_winner: Option<bool>,
}

impl From<Trade> for TradeReport {
    fn from(trade: Trade) -> Self {
        Self {
            planned_r: trade.planned_r(),
            actual_r: trade.actual_r(),
            is_winner: trade.is_winner(),
            trade,
        }
    }
}

/// Journal workflow over a trade repository: opening, closing and amending
/// trades, and rendering the dashboard from whatever is committed.
pub struct JournalService<R: TradeRepository> {
    repository: R,
    offset: FixedOffset,
}

impl<R: TradeRepository + Send + Sync> JournalService<R> {
    pub fn new(repository: R, offset: FixedOffset) -> Self {
        Self { repository, offset }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Record a new trade. Rejected setups never reach the repository.
    pub async fn open_trade(&self, trade: NewTrade) -> JournalResult<Trade> {
        if let Err(e) = trade.validate() {
            log::warn!("Rejected {} trade: {}", trade.direction, e);
            return Err(e.into());
        }

        let trade = self.repository.insert(trade).await?;
        log::info!("Opened trade {}: {}", trade.id, trade);
        Ok(trade)
    }

    /// Move an open trade to closed. Closing is one-way; changing the exit of
    /// a closed trade goes through [`JournalService::amend_trade`].
    pub async fn close_trade(
        &self,
        id: u64,
        exited_at: DateTime<Utc>,
        exit_price: Decimal,
    ) -> JournalResult<Trade> {
        let mut trade = self.repository.get(id).await?;
        if trade.is_closed() {
            log::warn!("Trade {} is already closed", id);
            return Err(JournalError::AlreadyClosed(id));
        }

        trade.exited_at = Some(exited_at);
        trade.exit_price = Some(exit_price);
        let trade = self.repository.update(trade).await?;

        log::info!(
            "Closed trade {} at {} ({}R)",
            trade.id,
            exit_price,
            trade.realized_r().round_dp(2)
        );
        Ok(trade)
    }

    /// Administrative edit of any stored field, exits included.
    pub async fn amend_trade(&self, trade: Trade) -> JournalResult<Trade> {
        if let Err(e) = trade.validate() {
            log::warn!("Rejected amendment of trade {}: {}", trade.id, e);
            return Err(e.into());
        }

        let trade = self.repository.update(trade).await?;
        log::info!("Amended trade {}", trade.id);
        Ok(trade)
    }

    pub async fn trades(&self, filter: &TradeFilter) -> JournalResult<Vec<Trade>> {
        self.repository.list(filter).await
    }

    pub async fn trade_report(&self, id: u64) -> JournalResult<TradeReport> {
        Ok(self.repository.get(id).await?.into())
    }

    /// Dashboard over the committed trade set, recomputed on every call.
    pub async fn dashboard(&self) -> JournalResult<Dashboard> {
        let trades = self
            .repository
            .list(&TradeFilter::all().in_offset(self.offset))
            .await?;

        let dashboard = MetricsCalculator::with_offset(&trades, self.offset).dashboard();
        log::debug!("Computed dashboard over {} trades", trades.len());
        Ok(dashboard)
    }
}
