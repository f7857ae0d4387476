//! Single-domain crawl
//!
//! Page 1 tells how many headwords the domain has; the remaining pages are then
//! fetched either one by one or with bounded concurrency. Any page failure aborts the
//! whole domain, so callers never see a partial word list.

use crate::config::{Config, FetchStrategy};
use crate::crawler::fetcher::{PageResponse, PageSource};
use crate::FetchResult;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;

/// Drives one alphabet symbol to completion
pub struct DomainCrawler<S: PageSource + ?Sized> {
    source: Arc<S>,
    page_size: u32,
    strategy: FetchStrategy,
    max_concurrent: usize,
}

impl<S: PageSource + ?Sized> DomainCrawler<S> {
    pub fn new(source: Arc<S>, page_size: u32, strategy: FetchStrategy, max_concurrent: usize) -> Self {
        Self {
            source,
            page_size,
            strategy,
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub fn from_config(source: Arc<S>, config: &Config) -> Self {
        Self::new(
            source,
            config.api.page_size,
            config.fetcher.strategy,
            config.fetcher.max_concurrent as usize,
        )
    }

    pub fn strategy(&self) -> FetchStrategy {
        self.strategy
    }

    /// Fetches every page of `domain` and returns the concatenated raw words
    ///
    /// In sequential mode the words are in page order; in concurrent mode pages after
    /// the first are appended in the order they complete.
    pub async fn crawl(&self, domain: char) -> FetchResult<Vec<String>> {
        let first = self.source.fetch_page(domain, 1).await?;
        let total_pages = first.total_pages(self.page_size);
        tracing::debug!(
            "Domain {}: {} words across {} pages",
            domain,
            first.total_count,
            total_pages
        );

        let mut words = first.words;
        if total_pages <= 1 {
            return Ok(words);
        }

        let last_page = u32::try_from(total_pages).unwrap_or(u32::MAX);
        match self.strategy {
            FetchStrategy::Sequential => {
                for page in 2..=last_page {
                    let response = self.source.fetch_page(domain, page).await?;
                    words.extend(response.words);
                }
            }
            FetchStrategy::Concurrent => {
                let pages: Vec<PageResponse> = stream::iter(2..=last_page)
                    .map(|page| self.source.fetch_page(domain, page))
                    .buffer_unordered(self.max_concurrent)
                    .try_collect()
                    .await?;
                for response in pages {
                    words.extend(response.words);
                }
            }
        }

        Ok(words)
    }
}
