//! Bucketed rolling window of call outcomes.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy)]
struct Bucket {
    started: Instant,
    successes: u32,
    failures: u32,
}

/// Success/failure counts over the most recent `window`, kept in
/// `bucket_count` buckets so old outcomes expire a bucket at a time.
#[derive(Debug)]
pub(crate) struct RollingWindow {
    window: Duration,
    bucket_span: Duration,
    buckets: VecDeque<Bucket>,
}

impl RollingWindow {
    pub(crate) fn new(window: Duration, bucket_count: u32) -> Self {
        let bucket_count = bucket_count.max(1);
        Self {
            window,
            bucket_span: window / bucket_count,
            buckets: VecDeque::with_capacity(bucket_count as usize),
        }
    }

    pub(crate) fn record(&mut self, now: Instant, success: bool) {
        self.evict(now);

        let needs_bucket = self
            .buckets
            .back()
            .is_none_or(|bucket| now.duration_since(bucket.started) >= self.bucket_span);
        if needs_bucket {
            self.buckets.push_back(Bucket {
                started: now,
                successes: 0,
                failures: 0,
            });
        }

        if let Some(bucket) = self.buckets.back_mut() {
            if success {
                bucket.successes = bucket.successes.saturating_add(1);
            } else {
                bucket.failures = bucket.failures.saturating_add(1);
            }
        }
    }

    /// `(successes, failures)` still inside the window at `now`.
    pub(crate) fn totals(&mut self, now: Instant) -> (u32, u32) {
        self.evict(now);
        self.buckets.iter().fold((0u32, 0u32), |(s, f), bucket| {
            (
                s.saturating_add(bucket.successes),
                f.saturating_add(bucket.failures),
            )
        })
    }

    pub(crate) fn clear(&mut self) {
        self.buckets.clear();
    }

    fn evict(&mut self, now: Instant) {
        while let Some(front) = self.buckets.front() {
            if now.duration_since(front.started) >= self.window {
                self.buckets.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[tokio::test(start_paused = true)]
    async fn test_counts_within_window() {
        let mut window = RollingWindow::new(Duration::from_secs(10), 10);
        let now = Instant::now();

        window.record(now, true);
        window.record(now, false);
        window.record(now + Duration::from_secs(3), false);

        assert_eq!(window.totals(now + Duration::from_secs(3)), (1, 2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_old_buckets_expire() {
        let mut window = RollingWindow::new(Duration::from_secs(10), 10);
        let start = Instant::now();

        window.record(start, false);
        window.record(start, false);
        window.record(start + Duration::from_secs(6), true);

        assert_eq!(window.totals(start + Duration::from_secs(9)), (1, 2));
        assert_eq!(window.totals(start + Duration::from_secs(11)), (1, 0));
        assert_eq!(window.totals(start + Duration::from_secs(20)), (0, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear() {
        let mut window = RollingWindow::new(Duration::from_secs(10), 10);
        let now = Instant::now();

        window.record(now, false);
        window.clear();

        assert_eq!(window.totals(now), (0, 0));
    }

    proptest! {
        #[test]
        fn prop_recent_outcomes_all_counted(outcomes in prop::collection::vec(any::<bool>(), 0..200)) {
            let mut window = RollingWindow::new(Duration::from_secs(60), 60);
            let start = Instant::now();

            for (i, success) in outcomes.iter().enumerate() {
                window.record(start + Duration::from_millis(i as u64 * 100), *success);
            }

            let successes = outcomes.iter().filter(|s| **s).count() as u32;
            let failures = outcomes.len() as u32 - successes;
            let end = start + Duration::from_millis(outcomes.len() as u64 * 100);
            prop_assert_eq!(window.totals(end), (successes, failures));
        }
    }

    #[test]
    fn test_zero_buckets_clamped() {
        let window = RollingWindow::new(Duration::from_secs(10), 0);
        assert_eq!(window.bucket_span, Duration::from_secs(10));
    }
}
