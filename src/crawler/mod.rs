//! Crawler module for harvesting the dictionary
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with caching, pacing and retry logic
//! - Request scheduling and global concurrency limiting
//! - Paginating a single domain to exhaustion
//! - Overall harvest coordination with checkpoint/resume

mod coordinator;
mod domain;
mod fetcher;
mod retry;
mod scheduler;

#[cfg(test)]
mod testing;

pub use coordinator::Coordinator;
pub use domain::DomainCrawler;
pub use fetcher::{
    build_http_client, endpoint_url, parse_payload, total_pages, Fetcher, PageResponse,
    PageSource,
};
pub use retry::{AttemptOutcome, RetryPolicy, MAX_BACKOFF};
pub use scheduler::{ScheduledFetch, Scheduler};

use crate::config::Config;
use crate::lexicon::{Alphabet, WordCollection};
use crate::storage::JsonCheckpointStore;
use crate::HarvestError;
use std::future::Future;
use std::sync::Arc;

/// Runs a complete harvest against the live service
///
/// This is the main entry point for starting a harvest. It will:
/// 1. Build the fetcher (HTTP client, cache, pacing)
/// 2. Load the checkpoint unless `fresh` is set
/// 3. Walk the Thai alphabet, persisting progress after each domain
/// 4. Normalize, filter, deduplicate and sort the harvested words
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `fresh` - Ignore any stored checkpoint
/// * `shutdown` - Resolves when the harvest should stop early
///
/// # Returns
///
/// * `Ok(WordCollection)` - The processed word list
/// * `Err(HarvestError)` - The harvest failed or was interrupted
pub async fn harvest<F>(
    config: Arc<Config>,
    fresh: bool,
    shutdown: F,
) -> Result<WordCollection, HarvestError>
where
    F: Future<Output = ()>,
{
    let fetcher = Arc::new(Fetcher::new(&config)?);
    let store = JsonCheckpointStore::new(&config.output.checkpoint_path);

    let mut coordinator = Coordinator::new(
        Arc::clone(&config),
        fetcher,
        Alphabet::thai(),
        Box::new(store),
        !fresh,
    );

    coordinator.run_until(shutdown).await
}
