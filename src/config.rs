use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::AuditError;
use crate::semp::paging::DEFAULT_PAGE_LIMIT;

// --- CONFIG AGGREGATOR ---

/// Every value is an optional override; with no environment set the review
/// runs with the fixed defaults (page limit 20, output in the working directory).
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub semp: SempConfig,
    pub review: ReviewConfig,
}

impl Config {
    pub fn load() -> Result<Self, AuditError> {
        dotenv::dotenv().ok();
        Ok(Self {
            semp: SempConfig::load()?,
            review: ReviewConfig::load()?,
        })
    }
}

// --- MODULES ---

// SEMP
#[derive(Debug, Clone)]
pub struct SempConfig {
    pub page_limit: u32,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub fetch_concurrency: usize,
}

impl SempConfig {
    fn load() -> Result<Self, AuditError> {
        let config = Self {
            page_limit:           get_env("SEMP_PAGE_LIMIT", "20")?,
            request_timeout_secs: get_env("SEMP_REQUEST_TIMEOUT_SECS", "30")?,
            connect_timeout_secs: get_env("SEMP_CONNECT_TIMEOUT_SECS", "10")?,
            fetch_concurrency:    get_env("SEMP_FETCH_CONCURRENCY", "1")?,
        };
        if config.page_limit == 0 {
            return Err(AuditError::Config("SEMP_PAGE_LIMIT must be at least 1".to_string()));
        }
        if config.fetch_concurrency == 0 {
            return Err(AuditError::Config("SEMP_FETCH_CONCURRENCY must be at least 1".to_string()));
        }
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for SempConfig {
    fn default() -> Self {
        Self {
            page_limit: DEFAULT_PAGE_LIMIT,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            fetch_concurrency: 1,
        }
    }
}

// REVIEW
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    pub output_dir: PathBuf,
    pub log_level: String,
}

impl ReviewConfig {
    fn load() -> Result<Self, AuditError> {
        Ok(Self {
            output_dir: get_env("REVIEW_OUTPUT_DIR", ".")?,
            log_level:  get_env("REVIEW_LOG", "warn")?,
        })
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            log_level: "warn".to_string(),
        }
    }
}

// --- PRIVATE HELPER ---

fn get_env<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, AuditError> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| AuditError::Config(format!("{} must be valid", key)))
}

// ==========================================
// TESTS
// ==========================================
