//! Harvest coordinator - main crawl orchestration logic
//!
//! This module contains the alphabet walk that coordinates a harvest:
//! - Loading (or discarding) the checkpoint
//! - Crawling each domain that is not yet completed
//! - Advancing and persisting the checkpoint after every completed domain
//! - Handling interrupts
//! - Processing the aggregated words once the alphabet is exhausted

use crate::config::Config;
use crate::crawler::domain::DomainCrawler;
use crate::crawler::fetcher::PageSource;
use crate::lexicon::{Alphabet, Collator, WordCollection, WordSetProcessor};
use crate::state::{Checkpoint, CrawlState};
use crate::storage::CheckpointStore;
use crate::HarvestError;
use std::future::Future;
use std::sync::Arc;

/// Main harvest coordinator structure
pub struct Coordinator<S: PageSource + ?Sized> {
    config: Arc<Config>,
    crawler: DomainCrawler<S>,
    alphabet: Alphabet,
    store: Box<dyn CheckpointStore>,
    checkpoint: Checkpoint,
    state: CrawlState,
    persist_warned: bool,
}

impl<S: PageSource + ?Sized> Coordinator<S> {
    /// Creates a new coordinator instance
    ///
    /// With `resume`, the stored checkpoint is loaded and checked against the alphabet;
    /// an unreadable or invalid one is discarded with a warning. Without it the walk
    /// starts at the first symbol and the stored checkpoint is overwritten on the first
    /// completed domain.
    pub fn new(
        config: Arc<Config>,
        source: Arc<S>,
        alphabet: Alphabet,
        store: Box<dyn CheckpointStore>,
        resume: bool,
    ) -> Self {
        let checkpoint = if resume {
            load_checkpoint(store.as_ref(), &alphabet)
        } else {
            tracing::info!("Starting fresh harvest");
            Checkpoint::new()
        };

        let crawler = DomainCrawler::from_config(source, &config);

        Self {
            config,
            crawler,
            alphabet,
            store,
            checkpoint,
            state: CrawlState::NotStarted,
            persist_warned: false,
        }
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    pub fn checkpoint(&self) -> &Checkpoint {
        &self.checkpoint
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Runs the harvest to completion
    pub async fn run(&mut self) -> Result<WordCollection, HarvestError> {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Runs the harvest until it completes, fails, or `shutdown` resolves
    ///
    /// On shutdown the in-flight domain is abandoned and [`HarvestError::Interrupted`]
    /// is returned; the last persisted checkpoint stays valid.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<WordCollection, HarvestError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let total = self.alphabet.len();
        let start = self.checkpoint.current_domain_index;
        tracing::info!(
            "Harvesting {} domains starting at index {} ({:?} page strategy)",
            total,
            start,
            self.crawler.strategy()
        );

        for index in start..total {
            let Some(domain) = self.alphabet.symbol(index) else {
                break;
            };
            self.state = CrawlState::InProgress {
                domain_index: index,
            };

            if self.checkpoint.is_completed(domain) {
                tracing::debug!("Domain {} already completed, reusing stored words", domain);
                continue;
            }

            tracing::info!("[{}/{}] Crawling domain {}", index + 1, total, domain);

            let result = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::warn!("Shutdown requested, abandoning domain {}", domain);
                    return Err(HarvestError::Interrupted);
                }
                result = self.crawler.crawl(domain) => result,
            };

            let words = match result {
                Ok(words) => words,
                Err(e) => {
                    tracing::error!("Domain {} failed: {}", domain, e);
                    return Err(e.into());
                }
            };

            let count = words.len();
            self.checkpoint.mark_completed(domain, index, words);
            self.persist();

            tracing::info!(
                "[{}/{}] Domain {}: {} words (total: {})",
                index + 1,
                total,
                domain,
                count,
                self.checkpoint.total_words_scraped
            );
        }

        let raw = self.checkpoint.all_words(&self.alphabet);
        tracing::info!("Harvest complete: {} raw words", raw.len());

        let mut processor = WordSetProcessor::new(self.config.words, Collator::new(&self.alphabet));
        let collection = processor.process(raw);
        self.state = CrawlState::Completed;

        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to remove checkpoint after completion: {}", e);
        }

        Ok(collection)
    }

    /// Saves the checkpoint; a failure costs resumability, not the harvest
    fn persist(&mut self) {
        match self.store.save(&self.checkpoint) {
            Ok(()) => {}
            Err(e) if !self.persist_warned => {
                tracing::warn!(
                    "Failed to save checkpoint, progress will not be resumable: {}",
                    e
                );
                self.persist_warned = true;
            }
            Err(e) => tracing::debug!("Checkpoint save failed again: {}", e),
        }
    }
}

fn load_checkpoint(store: &dyn CheckpointStore, alphabet: &Alphabet) -> Checkpoint {
    let mut checkpoint = match store.load() {
        Ok(Some(checkpoint)) => checkpoint,
        Ok(None) => {
            tracing::info!("No checkpoint found, starting fresh harvest");
            return Checkpoint::new();
        }
        Err(e) => {
            tracing::warn!("Could not read checkpoint ({}), starting fresh harvest", e);
            return Checkpoint::new();
        }
    };

    if let Err(e) = checkpoint.verify(alphabet) {
        tracing::warn!("Discarding checkpoint: {}", e);
        return Checkpoint::new();
    }

    if checkpoint.rewind_to_first_incomplete(alphabet) {
        tracing::warn!(
            "Checkpoint index pointed past an incomplete domain, rewinding to {}",
            checkpoint.current_domain_index
        );
    }

    tracing::info!(
        "Resuming from checkpoint: {} domains completed, {} words, next index {}",
        checkpoint.completed_domains.len(),
        checkpoint.total_words_scraped,
        checkpoint.current_domain_index
    );
    checkpoint
}
