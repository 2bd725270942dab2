//! Counters for the dashboard poll loop.

use std::sync::Mutex;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub ticks: u64,
    pub applied: u64,
    pub stale_dropped: u64,
    pub fetch_errors: u64,
}

/// Tracks how the poll loop is behaving: ticks issued, snapshots applied,
/// stale completions discarded, and failed fetches. Purely informational;
/// the dashboard surfaces the counters in its footer.
#[derive(Debug, Default)]
pub struct PollMetrics {
    inner: Mutex<MetricsSnapshot>,
}

impl PollMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_tick(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.ticks += 1;
        }
    }

    pub fn record_applied(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.applied += 1;
        }
    }

    pub fn record_stale(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.stale_dropped += 1;
        }
    }

    pub fn record_fetch_error(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.fetch_errors += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner.lock().map(|c| *c).unwrap_or_default()
    }
}
