/*!
 * Channel Metrics
 * Lock-free counters describing traffic through a command channel
 */

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time copy of a channel's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelStats {
    /// Tokens added by producers and the live feeder
    pub fed: u64,
    /// Tokens removed by successful waits
    pub consumed: u64,
    /// Tokens dropped ahead of a loose match
    pub discarded: u64,
    /// Waits that ran out of budget or lost their input
    pub failed_waits: u64,
}

/// Counters updated by the wait engine
///
/// # Performance
/// - Cache-line aligned to keep counter updates off the channel lock's line
#[repr(C, align(64))]
#[derive(Debug, Default)]
pub struct ChannelMetrics {
    fed: AtomicU64,
    consumed: AtomicU64,
    discarded: AtomicU64,
    failed_waits: AtomicU64,
}

impl ChannelMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_fed(&self, count: usize) {
        self.fed.fetch_add(count as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_consumed(&self, discarded: usize) {
        self.consumed.fetch_add(1, Ordering::Relaxed);
        if discarded > 0 {
            self.discarded.fetch_add(discarded as u64, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn record_failure(&self) {
        self.failed_waits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ChannelStats {
        ChannelStats {
            fed: self.fed.load(Ordering::Relaxed),
            consumed: self.consumed.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            failed_waits: self.failed_waits.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = ChannelMetrics::new();
        metrics.record_fed(3);
        metrics.record_consumed(0);
        metrics.record_consumed(2);
        metrics.record_failure();

        assert_eq!(
            metrics.snapshot(),
            ChannelStats {
                fed: 3,
                consumed: 2,
                discarded: 2,
                failed_waits: 1,
            }
        );
    }
}
