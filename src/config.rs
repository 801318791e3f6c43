// src/config.rs
use crate::domain::errors::{AppError, AppResult};
use chrono::FixedOffset;
use dotenv::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Trade journal configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Journal storage configuration
    pub journal: JournalConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Journal storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalConfig {
    /// JSON journal file; kept in memory only when unset
    pub file_path: Option<String>,

    /// Minutes east of UTC used to decide which calendar day a trade belongs to
    pub utc_offset_minutes: i32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "warn", "error")
    pub level: String,

    /// Log to file
    pub to_file: bool,

    /// Log file path
    pub file_path: Option<String>,
}

impl JournalConfig {
    /// Offset for day grouping, rejecting values beyond a day.
    pub fn offset(&self) -> AppResult<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            AppError::Config(format!(
                "UTC offset out of range: {} minutes",
                self.utc_offset_minutes
            ))
        })
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let utc_offset_minutes = match env::var("JOURNAL_UTC_OFFSET_MINUTES") {
            Ok(value) => value.trim().parse().map_err(|_| {
                AppError::Config(format!(
                    "Invalid JOURNAL_UTC_OFFSET_MINUTES value: {}",
                    value
                ))
            })?,
            Err(_) => 0,
        };

        let journal_config = JournalConfig {
            file_path: env::var("JOURNAL_FILE").ok(),
            utc_offset_minutes,
        };
        journal_config.offset()?;

        // Create Logging config
        let logging_config = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            to_file: env::var("LOG_TO_FILE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            file_path: env::var("LOG_FILE_PATH").ok(),
        };

        Ok(Config {
            journal: journal_config,
            logging: logging_config,
        })
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let mut file = File::open(path).map_err(|e| {
            AppError::Config(format!("Failed to open config file: {}", e))
        })?;

        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(|e| {
            AppError::Config(format!("Failed to read config file: {}", e))
        })?;

        let config: Config = serde_json::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file: {}", e))
        })?;
        config.journal.offset()?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> AppResult<()> {
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            AppError::Config(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, contents).map_err(|e| {
            AppError::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Initialize logging based on configuration
    pub fn init_logging(&self) -> AppResult<()> {
        let mut builder = env_logger::Builder::new();

        // Set log level
        let log_level = match self.logging.level.to_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "info" => log::LevelFilter::Info,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            _ => log::LevelFilter::Info,
        };

        builder.filter_level(log_level);

        // Configure output
        if self.logging.to_file {
            if let Some(file_path) = &self.logging.file_path {
                let file = File::create(file_path).map_err(|e| {
                    AppError::Config(format!("Failed to create log file: {}", e))
                })?;

                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
        }

        // Initialize the logger
        builder.init();

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            journal: JournalConfig {
                file_path: None,
                utc_offset_minutes: 0,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                to_file: false,
                file_path: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_bounds() {
        let mut journal = Config::default().journal;
        assert_eq!(journal.offset().unwrap().local_minus_utc(), 0);

        journal.utc_offset_minutes = -300;
        assert_eq!(journal.offset().unwrap().local_minus_utc(), -18_000);

        journal.utc_offset_minutes = 24 * 60;
        assert!(matches!(journal.offset(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "trade_journal_config_{}.json",
            std::process::id()
        ));
        let mut config = Config::default();
        config.journal.file_path = Some("journal.json".to_string());
        config.journal.utc_offset_minutes = 120;
        config.to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.journal.file_path.as_deref(), Some("journal.json"));
        assert_eq!(loaded.journal.utc_offset_minutes, 120);
        assert_eq!(loaded.logging.level, "info");

        let _ = std::fs::remove_file(&path);
    }
}
