// src/infrastructure/storage/mod.rs
// JSON-file backed trade store

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::domain::errors::{JournalError, JournalResult};
use crate::domain::models::{NewTrade, Trade};
use crate::domain::repository::{TradeFilter, TradeRepository};

/// On-disk layout of the journal file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct JournalFile {
    next_id: u64,
    trades: Vec<Trade>,
}

/// Trade table held in memory and, when a path is given, mirrored to a JSON
/// file after every committed write. The lock serializes writers.
pub struct JsonTradeStore {
    table: RwLock<JournalFile>,
    path: Option<PathBuf>,
}

impl JsonTradeStore {
    /// Store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            table: RwLock::new(JournalFile {
                next_id: 1,
                trades: Vec::new(),
            }),
            path: None,
        }
    }

    /// Open the journal at `path`, starting empty if the file does not exist.
    pub async fn open<P: AsRef<Path>>(path: P) -> JournalResult<Self> {
        let path = path.as_ref().to_path_buf();

        let table = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Self::parse(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No journal at {}, starting empty", path.display());
                JournalFile {
                    next_id: 1,
                    trades: Vec::new(),
                }
            }
            Err(e) => {
                return Err(JournalError::Storage(format!(
                    "Failed to read journal {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        log::debug!(
            "Loaded {} trades from {}",
            table.trades.len(),
            path.display()
        );

        Ok(Self {
            table: RwLock::new(table),
            path: Some(path),
        })
    }

    fn parse(contents: &str) -> JournalResult<JournalFile> {
        let mut file: JournalFile = serde_json::from_str(contents)
            .map_err(|e| JournalError::Storage(format!("Failed to parse journal: {}", e)))?;

        for trade in &file.trades {
            trade.validate().map_err(|e| {
                JournalError::Storage(format!("Stored trade {} is invalid: {}", trade.id, e))
            })?;
        }

        // Never hand out an id that is already taken.
        let max_id = file.trades.iter().map(|t| t.id).max().unwrap_or(0);
        file.next_id = file.next_id.max(max_id + 1);

        Ok(file)
    }

    async fn flush(&self, table: &JournalFile) -> JournalResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let contents = serde_json::to_string_pretty(table)
            .map_err(|e| JournalError::Storage(format!("Failed to serialize journal: {}", e)))?;

        // Write beside the target and rename so a crash never leaves half a file.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, contents).await.map_err(|e| {
            JournalError::Storage(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, path).await.map_err(|e| {
            JournalError::Storage(format!("Failed to replace {}: {}", path.display(), e))
        })?;

        log::debug!("Flushed {} trades to {}", table.trades.len(), path.display());
        Ok(())
    }
}

#[async_trait]
impl TradeRepository for JsonTradeStore {
    async fn insert(&self, trade: NewTrade) -> JournalResult<Trade> {
        trade.validate()?;

        let mut table = self.table.write().await;
        let trade = trade.into_trade(table.next_id, Utc::now());
        table.next_id += 1;
        table.trades.push(trade.clone());

        if let Err(e) = self.flush(&table).await {
            table.trades.pop();
            table.next_id -= 1;
            return Err(e);
        }

        Ok(trade)
    }

    async fn update(&self, mut trade: Trade) -> JournalResult<Trade> {
        trade.validate()?;

        let mut table = self.table.write().await;
        let index = table
            .trades
            .iter()
            .position(|t| t.id == trade.id)
            .ok_or(JournalError::NotFound(trade.id))?;

        trade.created_at = table.trades[index].created_at;
        trade.updated_at = Utc::now();
        let previous = std::mem::replace(&mut table.trades[index], trade.clone());

        if let Err(e) = self.flush(&table).await {
            table.trades[index] = previous;
            return Err(e);
        }

        Ok(trade)
    }

    async fn get(&self, id: u64) -> JournalResult<Trade> {
        self.table
            .read()
            .await
            .trades
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(JournalError::NotFound(id))
    }

    async fn list(&self, filter: &TradeFilter) -> JournalResult<Vec<Trade>> {
        Ok(self
            .table
            .read()
            .await
            .trades
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }

    async fn count(&self) -> JournalResult<usize> {
        Ok(self.table.read().await.trades.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ValidationError;
    use crate::domain::models::Direction;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn draft() -> NewTrade {
        let at = Utc.with_ymd_and_hms(2024, 10, 6, 14, 12, 0).unwrap();
        NewTrade::open(Direction::Long, at, dec!(100), dec!(95), dec!(115))
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("trade_journal_{}_{}.json", name, std::process::id()))
    }

    #[tokio::test]
    async fn test_insert_assigns_ids() {
        let store = JsonTradeStore::in_memory();
        let a = store.insert(draft()).await.unwrap();
        let b = store.insert(draft()).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.count().await.unwrap(), 2);
        assert_eq!(store.get(2).await.unwrap(), b);
    }

    #[tokio::test]
    async fn test_rejects_invalid_trade() {
        let store = JsonTradeStore::in_memory();
        let mut bad = draft();
        bad.stop_price = dec!(101);

        let err = store.insert(bad).await.unwrap_err();
        assert!(matches!(
            err,
            JournalError::Invalid(ValidationError::LongEntryBelowStop)
        ));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let store = JsonTradeStore::in_memory();
        let trade = store.insert(draft()).await.unwrap();

        let mut closed = trade.clone();
        closed.exit_price = Some(dec!(110));
        closed.created_at = Utc::now() + chrono::Duration::days(1);
        let closed = store.update(closed).await.unwrap();

        assert_eq!(closed.created_at, trade.created_at);
        assert!(closed.updated_at >= trade.updated_at);
        assert_eq!(store.get(trade.id).await.unwrap().exit_price, Some(dec!(110)));
    }

    #[tokio::test]
    async fn test_update_unknown_trade() {
        let store = JsonTradeStore::in_memory();
        let ghost = draft().into_trade(42, Utc::now());
        assert!(matches!(
            store.update(ghost).await,
            Err(JournalError::NotFound(42))
        ));
    }

    #[tokio::test]
    async fn test_rejected_update_leaves_trade() {
        let store = JsonTradeStore::in_memory();
        let trade = store.insert(draft()).await.unwrap();

        let mut bad = trade.clone();
        bad.target_price = dec!(90);
        assert!(store.update(bad).await.is_err());
        assert_eq!(store.get(trade.id).await.unwrap(), trade);
    }

    #[tokio::test]
    async fn test_file_round_trip() {
        let path = temp_path("round_trip");
        let _ = tokio::fs::remove_file(&path).await;

        let store = JsonTradeStore::open(&path).await.unwrap();
        store.insert(draft()).await.unwrap();
        let closed = store
            .insert(draft().closed_at(Utc::now(), dec!(110)))
            .await
            .unwrap();
        drop(store);

        let reopened = JsonTradeStore::open(&path).await.unwrap();
        assert_eq!(reopened.count().await.unwrap(), 2);
        assert_eq!(reopened.get(closed.id).await.unwrap(), closed);

        let next = reopened.insert(draft()).await.unwrap();
        assert_eq!(next.id, 3);

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_corrupt_file() {
        let path = temp_path("corrupt");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        assert!(matches!(
            JsonTradeStore::open(&path).await,
            Err(JournalError::Storage(_))
        ));

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[test]
    fn test_parse_repairs_next_id() {
        let trade = draft().into_trade(7, Utc::now());
        let contents = serde_json::to_string(&JournalFile {
            next_id: 2,
            trades: vec![trade],
        })
        .unwrap();

        assert_eq!(JsonTradeStore::parse(&contents).unwrap().next_id, 8);
    }
}
