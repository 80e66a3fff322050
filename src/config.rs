use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;
use tracing::info;

use crate::error::{BookstoreError, Result};
use crate::reclaimer::ReclaimerConfig;

const DEFAULT_RECLAIM_INTERVAL_SECS: u64 = 5;
const DEFAULT_ORDER_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RECLAIM_BATCH_SIZE: usize = 100;
const DEFAULT_CHANNEL_BUFFER: usize = 100;

/// Process-level settings, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub reclaim_interval: Duration,
    pub order_timeout: Duration,
    pub reclaim_batch_size: usize,
    /// Request queue depth of every store actor.
    pub channel_buffer: usize,
    /// JSON array of books to load into an empty catalogue.
    pub seed_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            reclaim_interval: Duration::from_secs(DEFAULT_RECLAIM_INTERVAL_SECS),
            order_timeout: Duration::from_secs(DEFAULT_ORDER_TIMEOUT_SECS),
            reclaim_batch_size: DEFAULT_RECLAIM_BATCH_SIZE,
            channel_buffer: DEFAULT_CHANNEL_BUFFER,
            seed_file: None,
        }
    }
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let config = Self::from_lookup(|name| env::var(name).ok())?;
        info!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Builds the configuration from any variable source; unset variables keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let interval_secs = parse_var(&lookup, "BOOKSTORE_RECLAIM_INTERVAL_SECS", DEFAULT_RECLAIM_INTERVAL_SECS)?;
        if interval_secs == 0 {
            return Err(BookstoreError::Config(
                "BOOKSTORE_RECLAIM_INTERVAL_SECS must be at least 1".to_string(),
            ));
        }
        let timeout_secs = parse_var(&lookup, "BOOKSTORE_ORDER_TIMEOUT_SECS", DEFAULT_ORDER_TIMEOUT_SECS)?;
        let reclaim_batch_size =
            parse_var(&lookup, "BOOKSTORE_RECLAIM_BATCH_SIZE", defaults.reclaim_batch_size)?;
        if reclaim_batch_size == 0 {
            return Err(BookstoreError::Config(
                "BOOKSTORE_RECLAIM_BATCH_SIZE must be at least 1".to_string(),
            ));
        }
        let channel_buffer = parse_var(&lookup, "BOOKSTORE_CHANNEL_BUFFER", defaults.channel_buffer)?;
        if channel_buffer == 0 {
            return Err(BookstoreError::Config(
                "BOOKSTORE_CHANNEL_BUFFER must be at least 1".to_string(),
            ));
        }
        let seed_file = lookup("BOOKSTORE_SEED_FILE")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            reclaim_interval: Duration::from_secs(interval_secs),
            order_timeout: Duration::from_secs(timeout_secs),
            reclaim_batch_size,
            channel_buffer,
            seed_file,
        })
    }

    pub fn reclaimer_config(&self) -> ReclaimerConfig {
        ReclaimerConfig {
            interval: self.reclaim_interval,
            order_timeout: self.order_timeout,
            batch_size: self.reclaim_batch_size,
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| BookstoreError::Config(format!("Invalid {name} value '{raw}': {e}"))),
    }
}
