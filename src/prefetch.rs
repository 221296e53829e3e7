//! Scroll-driven prefetching.
//!
//! Scroll events arrive far faster than pages should be requested. A
//! [`Debouncer`] collapses a burst into its last [`VisibleRange`] once the
//! view has been still for the configured delay, and [`fetch_targets`] turns
//! that range into the indices whose pages should be checked.

use std::time::Duration;

use tokio::sync::mpsc;

/// First and last visible row index, both inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRange {
    pub start: usize,
    pub end: usize,
}

impl VisibleRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }
}

/// Indices to check after the view settles on `range`: the first visible row,
/// `threshold` rows above it (clamped at 0) and `threshold` rows below the
/// last visible row. Each is checked independently.
pub fn fetch_targets(range: VisibleRange, threshold: usize) -> [usize; 3] {
    [
        range.start,
        range.start.saturating_sub(threshold),
        range.end.saturating_add(threshold),
    ]
}

/// Send side of a [`Debouncer`]. Never blocks, so it can be fed straight from
/// an input handler.
#[derive(Clone)]
pub struct ScrollSender<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> ScrollSender<T> {
    /// Returns false once the debouncer has been dropped
    pub fn send(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }
}

/// Trailing-edge debounce over a channel
pub struct Debouncer<T> {
    delay: Duration,
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> Debouncer<T> {
    pub fn channel(delay: Duration) -> (ScrollSender<T>, Debouncer<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ScrollSender { tx }, Debouncer { delay, rx })
    }

    /// Wait for the next burst to settle and return its last value. Every new
    /// value restarts the delay. Returns `None` once all senders are gone and
    /// nothing is pending; a value pending at that point is still delivered.
    pub async fn next(&mut self) -> Option<T> {
        let mut latest = self.rx.recv().await?;
        loop {
            tokio::select! {
                biased;
                value = self.rx.recv() => match value {
                    Some(value) => latest = value,
                    None => return Some(latest),
                },
                _ = tokio::time::sleep(self.delay) => return Some(latest),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[test]
    fn test_fetch_targets() {
        let range = VisibleRange::new(2000, 2050);
        assert_eq!(fetch_targets(range, 1000), [2000, 1000, 3050]);
    }

    #[test]
    fn test_fetch_targets_clamps_at_zero() {
        let range = VisibleRange::new(100, 140);
        assert_eq!(fetch_targets(range, 250), [100, 0, 390]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_last_value() {
        let (tx, mut debouncer) = Debouncer::channel(Duration::from_millis(100));
        for start in [0, 40, 80, 120] {
            tx.send(VisibleRange::new(start, start + 30));
        }

        let started = Instant::now();
        let range = debouncer.next().await.unwrap();
        assert_eq!(range, VisibleRange::new(120, 150));
        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_event_restarts_the_window() {
        let (tx, mut debouncer) = Debouncer::channel(Duration::from_millis(100));

        let feeder = tokio::spawn(async move {
            for i in 0..5 {
                tx.send(i);
                tokio::time::sleep(Duration::from_millis(60)).await;
            }
        });

        let started = Instant::now();
        assert_eq!(debouncer.next().await, Some(4));
        // last send at 240ms; the sender drops at 300ms and closes the channel
        assert!(started.elapsed() >= Duration::from_millis(240));
        feeder.await.unwrap();
        assert_eq!(debouncer.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quiet_channel_fires_once_per_burst() {
        let (tx, mut debouncer) = Debouncer::channel(Duration::from_millis(100));
        tx.send(1);
        assert_eq!(debouncer.next().await, Some(1));

        tokio::time::sleep(Duration::from_millis(500)).await;
        tx.send(2);
        tx.send(3);
        assert_eq!(debouncer.next().await, Some(3));
        drop(tx);
        assert_eq!(debouncer.next().await, None);
    }
}
