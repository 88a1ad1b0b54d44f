// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Query debouncing
//!
//! [`QueryDebouncer`] holds at most one pending value together with its
//! deadline. Every push replaces the pending value and restarts the quiet
//! period; the value is released by the first [`QueryDebouncer::poll`] at or
//! after the deadline. Time is always passed in, so the same code runs
//! against the real clock and against tokio's paused test clock.

use tokio::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct QueryDebouncer {
    interval: Duration,
    pending: Option<(String, Instant)>,
}

impl QueryDebouncer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
        }
    }

    pub fn from_millis(interval_ms: u64) -> Self {
        Self::new(Duration::from_millis(interval_ms))
    }

    /// Record a new raw value, cancelling any pending emission
    pub fn push(&mut self, value: impl Into<String>, now: Instant) {
        self.pending = Some((value.into(), now + self.interval));
    }

    /// Release the pending value once its quiet period has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_only_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = QueryDebouncer::from_millis(300);

        debouncer.push("j", start);
        assert_eq!(debouncer.poll(start + Duration::from_millis(299)), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(300)), Some("j".to_string()));
        assert_eq!(debouncer.poll(start + Duration::from_millis(900)), None);
    }

    #[test]
    fn newer_value_restarts_the_timer() {
        let start = Instant::now();
        let mut debouncer = QueryDebouncer::from_millis(300);

        debouncer.push("j", start);
        debouncer.push("ja", start + Duration::from_millis(200));
        assert_eq!(debouncer.poll(start + Duration::from_millis(400)), None);
        assert_eq!(debouncer.deadline(), Some(start + Duration::from_millis(500)));
        assert_eq!(debouncer.poll(start + Duration::from_millis(500)), Some("ja".to_string()));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn cancel_drops_pending_value() {
        let start = Instant::now();
        let mut debouncer = QueryDebouncer::from_millis(10);
        debouncer.push("x", start);
        debouncer.cancel();
        assert_eq!(debouncer.poll(start + Duration::from_secs(1)), None);
    }

    #[test]
    fn zero_interval_emits_on_next_poll() {
        let start = Instant::now();
        let mut debouncer = QueryDebouncer::from_millis(0);
        debouncer.push("now", start);
        assert_eq!(debouncer.poll(start), Some("now".to_string()));
    }
}
