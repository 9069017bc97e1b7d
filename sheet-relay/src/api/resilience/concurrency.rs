//! Concurrency limiter implementation
//!
//! Provides a semaphore-based limiter shared by every request, bounding how
//! many calls to the Sheets API are in flight at once.

use super::config::ConcurrencyConfig;
use log::debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

// Tokio's semaphore caps permits at 2^61-1
const UNLIMITED_PERMITS: usize = 1_000_000;

/// Semaphore-based concurrency limiter for outbound API calls
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    config: ConcurrencyConfig,
    requests_acquired: Arc<AtomicU64>,
    requests_waited: Arc<AtomicU64>,
}

impl ConcurrencyLimiter {
    /// Create a new concurrency limiter with the given configuration
    pub fn new(config: ConcurrencyConfig) -> Self {
        let permits = if config.enabled {
            config.max_concurrent_requests.clamp(1, UNLIMITED_PERMITS)
        } else {
            UNLIMITED_PERMITS
        };

        Self {
            semaphore: Arc::new(Semaphore::new(permits)),
            config,
            requests_acquired: Arc::new(AtomicU64::new(0)),
            requests_waited: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Wait for a free slot; the slot is released when the permit drops
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit, AcquireError> {
        if !self.config.enabled {
            return self.semaphore.clone().acquire_owned().await;
        }

        if self.semaphore.available_permits() == 0 {
            self.requests_waited.fetch_add(1, Ordering::Relaxed);
            debug!(
                "Concurrency limiter: waiting for permit ({} in use)",
                self.config.max_concurrent_requests
            );
        }

        let permit = self.semaphore.clone().acquire_owned().await?;
        self.requests_acquired.fetch_add(1, Ordering::Relaxed);

        debug!(
            "Concurrency limiter: acquired permit ({}/{} in use)",
            self.in_use(),
            self.config.max_concurrent_requests
        );

        Ok(permit)
    }

    /// Get the number of available permits (requests that can start immediately)
    pub fn available_permits(&self) -> usize {
        if !self.config.enabled {
            return usize::MAX;
        }
        self.semaphore.available_permits()
    }

    fn in_use(&self) -> usize {
        self.config
            .max_concurrent_requests
            .saturating_sub(self.semaphore.available_permits())
    }

    /// Get current statistics
    pub fn stats(&self) -> ConcurrencyStats {
        ConcurrencyStats {
            available_permits: self.available_permits(),
            requests_acquired: self.requests_acquired.load(Ordering::Relaxed),
            requests_waited: self.requests_waited.load(Ordering::Relaxed),
        }
    }
}

/// Statistics for the concurrency limiter
#[derive(Debug, Clone)]
pub struct ConcurrencyStats {
    pub available_permits: usize,
    /// Total permits acquired since creation
    pub requests_acquired: u64,
    /// Number of times a request had to wait for a permit
    pub requests_waited: u64,
}

impl ConcurrencyStats {
    /// Fraction of requests that had to wait
    pub fn wait_rate(&self) -> f64 {
        if self.requests_acquired == 0 {
            0.0
        } else {
            self.requests_waited as f64 / self.requests_acquired as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_concurrency_limiter_disabled() {
        let limiter = ConcurrencyLimiter::new(ConcurrencyConfig {
            max_concurrent_requests: 5,
            enabled: false,
        });

        let mut permits = Vec::new();
        for _ in 0..100 {
            permits.push(limiter.acquire().await.unwrap());
        }
        assert_eq!(permits.len(), 100);
        assert_eq!(limiter.available_permits(), usize::MAX);
    }

    #[tokio::test]
    async fn test_concurrency_limiter_max_permits() {
        let limiter = ConcurrencyLimiter::new(ConcurrencyConfig {
            max_concurrent_requests: 2,
            enabled: true,
        });

        let _p1 = limiter.acquire().await.unwrap();
        let _p2 = limiter.acquire().await.unwrap();
        assert_eq!(limiter.available_permits(), 0);

        let third = tokio::time::timeout(
            tokio::time::Duration::from_millis(20),
            limiter.acquire(),
        )
        .await;
        assert!(third.is_err());
    }

    #[tokio::test]
    async fn test_zero_limit_still_allows_one_request() {
        let limiter = ConcurrencyLimiter::new(ConcurrencyConfig {
            max_concurrent_requests: 0,
            enabled: true,
        });

        assert!(limiter.acquire().await.is_ok());
        assert_eq!(limiter.available_permits(), 0);
    }

    #[tokio::test]
    async fn test_concurrency_limiter_acquire_waits() {
        let limiter = ConcurrencyLimiter::new(ConcurrencyConfig {
            max_concurrent_requests: 1,
            enabled: true,
        });
        let limiter_clone = limiter.clone();

        let permit = limiter.acquire().await.unwrap();
        assert_eq!(limiter.available_permits(), 0);

        let handle = tokio::spawn(async move {
            let _permit = limiter_clone.acquire().await.unwrap();
            true
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
        drop(permit);

        let result = tokio::time::timeout(tokio::time::Duration::from_millis(100), handle).await;
        assert!(result.is_ok());

        let stats = limiter.stats();
        assert_eq!(stats.requests_acquired, 2);
        assert_eq!(stats.requests_waited, 1);
        assert!((stats.wait_rate() - 0.5).abs() < f64::EPSILON);
    }
}
