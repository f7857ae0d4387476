//! Request pacing and global concurrency limiting
//!
//! This module handles:
//! - Global concurrency limiting via a semaphore
//! - The minimum delay between two requests sent anywhere in the process
//!
//! Every network attempt goes through [`Scheduler::acquire`]; cache hits never do.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;

/// Permission to send one request
///
/// Dropping it frees the concurrency slot.
pub struct ScheduledFetch {
    /// The semaphore permit for this fetch
    pub _permit: OwnedSemaphorePermit,
}

/// Shared pacing state for all fetches
pub struct Scheduler {
    /// Global semaphore for limiting concurrent fetches
    global_semaphore: Arc<Semaphore>,

    /// When the most recent request was sent
    last_request: Mutex<Option<Instant>>,

    /// Minimum spacing between two requests
    min_delay: Duration,
}

impl Scheduler {
    pub fn new(max_concurrent: usize, min_delay: Duration) -> Self {
        Self {
            global_semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
            last_request: Mutex::new(None),
            min_delay,
        }
    }

    /// Waits for a free slot and for the pacing delay to elapse
    ///
    /// The slot is taken first; the pacing lock is held across the sleep so that
    /// concurrent callers are released one `min_delay` apart. Returns None only if the
    /// semaphore has been closed.
    pub async fn acquire(&self) -> Option<ScheduledFetch> {
        let permit = self.global_semaphore.clone().acquire_owned().await.ok()?;
        self.wait_for_turn().await;
        Some(ScheduledFetch { _permit: permit })
    }

    async fn wait_for_turn(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_delay {
                let wait = self.min_delay - elapsed;
                tracing::trace!("Rate limit: waiting {:?}", wait);
                tokio::time::sleep(wait).await;
            }
        }

        *last = Some(Instant::now());
    }

    /// Free concurrency slots right now
    pub fn available_slots(&self) -> usize {
        self.global_semaphore.available_permits()
    }

    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_permit_is_released_on_drop() {
        let scheduler = Scheduler::new(2, Duration::ZERO);
        assert_eq!(scheduler.available_slots(), 2);

        let first = scheduler.acquire().await.unwrap();
        assert_eq!(scheduler.available_slots(), 1);

        drop(first);
        assert_eq!(scheduler.available_slots(), 2);
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_clamped() {
        let scheduler = Scheduler::new(0, Duration::ZERO);
        assert_eq!(scheduler.available_slots(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_are_spaced() {
        let scheduler = Scheduler::new(5, Duration::from_millis(200));
        let start = Instant::now();

        for _ in 0..3 {
            let _slot = scheduler.acquire().await.unwrap();
        }

        // the first request goes out immediately, the next two wait 200ms each
        assert!(start.elapsed() >= Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_one_clock() {
        let scheduler = Arc::new(Scheduler::new(5, Duration::from_millis(100)));
        let start = Instant::now();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let scheduler = Arc::clone(&scheduler);
                tokio::spawn(async move {
                    let _slot = scheduler.acquire().await;
                    Instant::now()
                })
            })
            .collect();

        let mut sent = Vec::new();
        for handle in handles {
            sent.push(handle.await.unwrap());
        }
        sent.sort();

        assert!(sent[3].duration_since(start) >= Duration::from_millis(300));
        for pair in sent.windows(2) {
            assert!(pair[1].duration_since(pair[0]) >= Duration::from_millis(100));
        }
    }
}
