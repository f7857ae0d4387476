//! Configuration module for Royin-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A loaded [`Config`] is validated once and then shared read-only (usually behind an
//! `Arc`) by the fetcher, the coordinator and the word processor.
//!
//! # Example
//!
//! ```no_run
//! use royin_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Retries per page: {}", config.fetcher.max_retries);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ApiConfig, Config, FetchStrategy, FetcherConfig, OutputConfig, UserAgentConfig, WordsConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
