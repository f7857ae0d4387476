//! HTTP fetcher implementation
//!
//! This module handles all requests to the lookup service, including:
//! - Building the HTTP client with the crawler's identification headers
//! - Serving pages from the on-disk cache
//! - Pacing and concurrency limiting through the [`Scheduler`]
//! - Retry with exponential backoff for transient failures
//! - Validation of the `[total_count, words]` payload

use crate::config::Config;
use crate::crawler::retry::{AttemptOutcome, RetryPolicy};
use crate::crawler::scheduler::Scheduler;
use crate::storage::FileCache;
use crate::{ConfigError, FetchError, FetchResult, HarvestError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// One page of a domain listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse {
    /// Number of headwords the service reports for the whole domain
    pub total_count: u64,
    pub words: Vec<String>,
    /// 1-indexed
    pub page: u32,
    pub domain: char,
}

impl PageResponse {
    /// Number of pages the domain spans
    pub fn total_pages(&self, page_size: u32) -> u64 {
        total_pages(self.total_count, page_size)
    }
}

/// `ceil(total_count / page_size)`; zero when `page_size` is zero
pub fn total_pages(total_count: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_count.div_ceil(u64::from(page_size))
}

/// Anything that can produce a page of a domain listing
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, domain: char, page: u32) -> FetchResult<PageResponse>;
}

/// Validates a decoded payload and turns it into a [`PageResponse`]
///
/// The payload must be a two-element array: a non-negative integer count, then a list
/// whose items are strings or objects carrying a string `headword` (or `word`).
pub fn parse_payload(domain: char, page: u32, payload: &Value) -> FetchResult<PageResponse> {
    let invalid = |message: String| FetchError::Validation {
        domain: domain.to_string(),
        page,
        message,
    };

    let parts = match payload.as_array() {
        Some(parts) if parts.len() == 2 => parts,
        Some(parts) => {
            return Err(invalid(format!(
                "expected [total_count, words], got an array of {} elements",
                parts.len()
            )))
        }
        None => return Err(invalid("expected a JSON array".to_string())),
    };

    let total_count = parts[0]
        .as_u64()
        .ok_or_else(|| invalid(format!("total_count is not a non-negative integer: {}", parts[0])))?;

    let items = parts[1]
        .as_array()
        .ok_or_else(|| invalid("words is not a list".to_string()))?;

    let words = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            headword(item).ok_or_else(|| invalid(format!("word #{} has no headword: {}", index, item)))
        })
        .collect::<FetchResult<Vec<String>>>()?;

    Ok(PageResponse {
        total_count,
        words,
        page,
        domain,
    })
}

fn headword(item: &Value) -> Option<String> {
    match item {
        Value::String(word) => Some(word.clone()),
        Value::Object(fields) => ["headword", "word"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}

/// Builds an HTTP client with proper configuration
///
/// Sends `Name/Version (+ContactURL; ContactEmail)` as the User-Agent, the service
/// base URL as Referer, and the Accept headers the lookup page itself sends.
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, text/javascript, */*; q=0.01"),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("th-TH,th;q=0.9,en;q=0.8"),
    );
    if let Ok(referer) = HeaderValue::from_str(&config.api.base_url) {
        headers.insert(REFERER, referer);
    }

    Client::builder()
        .user_agent(config.user_agent.header_value())
        .default_headers(headers)
        .timeout(config.api.timeout())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Full URL of the lookup endpoint
pub fn endpoint_url(config: &Config) -> Result<Url, ConfigError> {
    let joined = format!(
        "{}/{}",
        config.api.base_url.trim_end_matches('/'),
        config.api.endpoint.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", joined, e)))
}

/// Rate-limited, retrying, cache-aware page fetcher
///
/// One fetcher is shared by every domain of a harvest so that pacing and the
/// concurrency limit apply to the whole run.
pub struct Fetcher {
    client: Client,
    url: Url,
    scheduler: Arc<Scheduler>,
    retry: RetryPolicy,
    cache: Option<FileCache>,
}

impl Fetcher {
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        let client = build_http_client(config).map_err(FetchError::Client)?;
        let url = endpoint_url(config)?;
        let scheduler = Scheduler::new(
            config.fetcher.max_concurrent as usize,
            config.fetcher.delay(),
        );
        let cache = config
            .fetcher
            .cache_enabled
            .then(|| FileCache::new(&config.output.cache_dir));

        Ok(Self {
            client,
            url,
            scheduler: Arc::new(scheduler),
            retry: RetryPolicy::from_config(&config.fetcher),
            cache,
        })
    }

    pub fn cache(&self) -> Option<&FileCache> {
        self.cache.as_ref()
    }

    /// Fetches one page, from the cache when possible
    pub async fn fetch(&self, domain: char, page: u32) -> FetchResult<PageResponse> {
        if let Some(hit) = self.cache.as_ref().and_then(|cache| cache.load(domain, page)) {
            return Ok(hit);
        }

        let mut attempt = 0;
        let response = loop {
            let result = self.send_once(domain, page).await;
            match self.retry.classify(&result, attempt) {
                AttemptOutcome::Success | AttemptOutcome::Fatal => break result?,
                AttemptOutcome::Retry(delay) => {
                    if let Err(e) = &result {
                        tracing::warn!(
                            "Attempt {}/{} failed: {}; retrying in {:?}",
                            attempt + 1,
                            self.retry.max_attempts(),
                            e,
                            delay
                        );
                    }
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        };

        if let Some(cache) = &self.cache {
            cache.store(&response);
        }

        tracing::debug!(
            "Fetched {} page {} ({} words, total: {})",
            domain,
            page,
            response.words.len(),
            response.total_count
        );

        Ok(response)
    }

    /// One network attempt; the concurrency slot is held only for its duration
    async fn send_once(&self, domain: char, page: u32) -> FetchResult<PageResponse> {
        let network = |message: String| FetchError::Network {
            domain: domain.to_string(),
            page,
            message,
        };

        let _slot = self
            .scheduler
            .acquire()
            .await
            .ok_or_else(|| network("request scheduler is closed".to_string()))?;

        tracing::trace!("GET {} domain={} page={}", self.url, domain, page);
        let response = self
            .client
            .get(self.url.clone())
            .query(&[("domain", domain.to_string()), ("page", page.to_string())])
            .send()
            .await
            .map_err(|e| network(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                domain: domain.to_string(),
                page,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| network(describe(&e)))?;
        let payload: Value = serde_json::from_str(&body).map_err(|e| FetchError::Validation {
            domain: domain.to_string(),
            page,
            message: format!("body is not JSON: {}", e),
        })?;

        parse_payload(domain, page, &payload)
    }
}

#[async_trait]
impl PageSource for Fetcher {
    async fn fetch_page(&self, domain: char, page: u32) -> FetchResult<PageResponse> {
        self.fetch(domain, page).await
    }
}

fn describe(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timeout".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    }
}
