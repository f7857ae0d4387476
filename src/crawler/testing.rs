//! In-memory page source for crawler tests

use crate::crawler::fetcher::{PageResponse, PageSource};
use crate::{FetchError, FetchResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Serves `total` synthetic words per domain, `page_size` per page
///
/// Word `n` of domain `d` is `"{d}{n}"`. Later pages finish sooner than earlier ones so
/// that completion order differs from page order.
pub(crate) struct FakeSource {
    totals: HashMap<char, u64>,
    page_size: u32,
    pub(crate) fail_on: Option<(char, u32)>,
    calls: Mutex<Vec<(char, u32)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeSource {
    pub(crate) fn new(totals: &[(char, u64)], page_size: u32) -> Self {
        Self {
            totals: totals.iter().copied().collect(),
            page_size,
            fail_on: None,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing_on(mut self, domain: char, page: u32) -> Self {
        self.fail_on = Some((domain, page));
        self
    }

    pub(crate) fn calls(&self) -> Vec<(char, u32)> {
        self.calls.lock().unwrap().clone()
    }

    /// Domains that were asked for at least one page, in first-request order
    pub(crate) fn domains_requested(&self) -> Vec<char> {
        let mut domains = Vec::new();
        for (domain, _) in self.calls() {
            if !domains.contains(&domain) {
                domains.push(domain);
            }
        }
        domains
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageSource for FakeSource {
    async fn fetch_page(&self, domain: char, page: u32) -> FetchResult<PageResponse> {
        self.calls.lock().unwrap().push((domain, page));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20 / u64::from(page.clamp(1, 20)))).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_on == Some((domain, page)) {
            return Err(FetchError::HttpStatus {
                domain: domain.to_string(),
                page,
                status: 503,
            });
        }

        let total_count = self.totals.get(&domain).copied().unwrap_or(0);
        let start = u64::from(page - 1) * u64::from(self.page_size);
        let end = total_count.min(start + u64::from(self.page_size));
        let words = (start..end).map(|n| format!("{}{}", domain, n)).collect();

        Ok(PageResponse {
            total_count,
            words,
            page,
            domain,
        })
    }
}
