//! Royin-Harvest: a polite dictionary harvester
//!
//! This crate walks the Thai Royal Institute dictionary one alphabet symbol at a time,
//! paginating each symbol to exhaustion, and turns the raw headwords into a
//! deduplicated word list in Royal Institute order that can be diffed against a
//! previous snapshot.

pub mod config;
pub mod crawler;
pub mod lexicon;
pub mod output;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Royin-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Harvest interrupted; progress up to the last completed symbol is saved")]
    Interrupted,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while fetching a single dictionary page
#[derive(Debug, Error)]
pub enum FetchError {
    /// Timeout, refused connection or a body that could not be read
    #[error("Network error for {domain} page {page}: {message}")]
    Network {
        domain: String,
        page: u32,
        message: String,
    },

    #[error("HTTP {status} for {domain} page {page}")]
    HttpStatus {
        domain: String,
        page: u32,
        status: u16,
    },

    /// The payload does not follow the `[total_count, words]` contract
    #[error("Invalid response for {domain} page {page}: {message}")]
    Validation {
        domain: String,
        page: u32,
        message: String,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl FetchError {
    /// Returns true if another attempt may succeed
    ///
    /// Transport failures, HTTP 429 and HTTP 5xx are transient. Every other status and
    /// every contract violation is final.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::HttpStatus { status, .. } => *status == 429 || (500..=599).contains(status),
            Self::Validation { .. } | Self::Client(_) => false,
        }
    }
}

/// Result type alias for Royin-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for page fetches
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{harvest, Coordinator, DomainCrawler, Fetcher, PageResponse, PageSource};
pub use lexicon::{compare, Alphabet, Collator, DiffResult, WordCollection, WordSetProcessor};
pub use state::{Checkpoint, CrawlState};
