//! Sliding-window admission control for provider fetches
//!
//! A [`Throttle`] lets at most `limit` fetches start within any `interval`.
//! Fetches still run concurrently; the throttle only gates when each one
//! may begin.

use crate::types::ThrottleConfig;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

pub struct Throttle {
    limit: usize,
    interval: Duration,
    /// Start times of admissions still inside the window
    started: Mutex<VecDeque<Instant>>,
}

impl Throttle {
    pub fn new(config: ThrottleConfig) -> Self {
        let limit = config.limit.max(1) as usize;
        Self {
            limit,
            interval: config.interval(),
            started: Mutex::new(VecDeque::with_capacity(limit)),
        }
    }

    /// Wait until one more fetch may start, then record it
    pub async fn admit(&self) {
        loop {
            let wait = {
                let mut started = self.started.lock().await;
                let now = Instant::now();

                while started
                    .front()
                    .is_some_and(|first| now.duration_since(*first) >= self.interval)
                {
                    started.pop_front();
                }

                if started.len() < self.limit {
                    started.push_back(now);
                    return;
                }

                match started.front() {
                    Some(first) => (*first + self.interval).saturating_duration_since(now),
                    None => Duration::ZERO,
                }
            };

            log::debug!("⏳ Throttled, next slot in {}ms", wait.as_millis());
            sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join_all;

    #[tokio::test(start_paused = true)]
    async fn test_limits_starts_per_interval() {
        let throttle = Throttle::new(ThrottleConfig {
            limit: 2,
            interval_ms: 1_000,
        });
        let throttle = &throttle;
        let origin = Instant::now();

        let admissions = join_all((0..5).map(|_| async move {
            throttle.admit().await;
            origin.elapsed().as_millis() / 1_000
        }))
        .await;

        let mut windows = admissions;
        windows.sort();
        assert_eq!(windows, vec![0, 0, 1, 1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_under_limit_is_immediate() {
        let throttle = Throttle::new(ThrottleConfig {
            limit: 5,
            interval_ms: 1_000,
        });
        let origin = Instant::now();

        for _ in 0..5 {
            throttle.admit().await;
        }
        assert_eq!(origin.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_limit_behaves_as_one() {
        let throttle = Throttle::new(ThrottleConfig {
            limit: 0,
            interval_ms: 500,
        });
        let origin = Instant::now();

        throttle.admit().await;
        throttle.admit().await;
        assert!(origin.elapsed() >= Duration::from_millis(500));
    }
}
