// src/main.rs
use trade_journal::config::Config;
use trade_journal::domain::errors::AppResult;
use trade_journal::{Dashboard, JournalService, JsonTradeStore};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    config.init_logging()?;

    log::info!("Starting trade_journal v{}", env!("CARGO_PKG_VERSION"));

    let store = match &config.journal.file_path {
        Some(path) => {
            log::info!("Using journal file {}", path);
            JsonTradeStore::open(path).await?
        }
        None => {
            log::warn!("JOURNAL_FILE is not set, using an empty in-memory journal");
            JsonTradeStore::in_memory()
        }
    };

    let service = JournalService::new(store, config.journal.offset()?);
    let dashboard = service.dashboard().await?;

    if let Dashboard::NoData { trade_count } = &dashboard {
        log::info!("No closed trades yet ({} journaled)", trade_count);
    }

    println!("{}", serde_json::to_string_pretty(&dashboard)?);
    Ok(())
}
