//! Observable reading state.
//!
//! The canonical record consumers render from: the latest normalized
//! reading, the connectivity flag, and the bounded history. Only the owning
//! session writes it — the two mutators are crate-private.

use std::time::{Duration, Instant};

use sensorwatch_types::HistoryBuffer;

/// One normalized observation of a tracked quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// The normalized numeric value. Always finite.
    pub value: f64,
    /// When the value was applied to the state.
    pub observed_at: Instant,
}

/// The observable record for one tracked quantity.
#[derive(Debug, Clone)]
pub struct ReadingState {
    latest: Option<Reading>,
    connected: bool,
    history: HistoryBuffer,
}

impl Default for ReadingState {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadingState {
    /// Create an empty state with the default history capacity.
    pub fn new() -> Self {
        Self {
            latest: None,
            connected: false,
            history: HistoryBuffer::new(),
        }
    }

    /// Create an empty state keeping at most `capacity` history entries.
    pub fn with_history_capacity(capacity: usize) -> Self {
        Self {
            latest: None,
            connected: false,
            history: HistoryBuffer::with_capacity(capacity),
        }
    }

    /// The most recent reading, absent until the first successful
    /// normalization. A connectivity loss does not reset it.
    pub fn latest(&self) -> Option<&Reading> {
        self.latest.as_ref()
    }

    /// The latest value alone, when present.
    pub fn value(&self) -> Option<f64> {
        self.latest.as_ref().map(|r| r.value)
    }

    /// How long ago the latest reading arrived.
    pub fn age(&self) -> Option<Duration> {
        self.latest.as_ref().map(|r| r.observed_at.elapsed())
    }

    /// True while the active transport has a valid channel and has delivered
    /// at least one payload since the last failure.
    pub fn connected(&self) -> bool {
        self.connected
    }

    /// The rolling history of recent values, oldest first.
    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Record a new reading: update the latest and append to history.
    pub(crate) fn record_value(&mut self, value: f64) {
        self.latest = Some(Reading {
            value,
            observed_at: Instant::now(),
        });
        self.history.push(value);
    }

    /// Set the connectivity flag. No debouncing: a flapping transport is
    /// surfaced as-is.
    pub(crate) fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_absent_and_disconnected() {
        let state = ReadingState::new();
        assert!(state.latest().is_none());
        assert!(state.value().is_none());
        assert!(!state.connected());
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_record_updates_latest_and_history() {
        let mut state = ReadingState::new();
        state.record_value(23.5);
        state.record_value(24.1);

        assert_eq!(state.value(), Some(24.1));
        assert_eq!(
            state.history().iter().collect::<Vec<_>>(),
            vec![23.5, 24.1]
        );
    }

    #[test]
    fn test_disconnect_preserves_latest_value() {
        let mut state = ReadingState::new();
        state.record_value(23.5);
        state.set_connected(true);

        state.set_connected(false);
        assert_eq!(state.value(), Some(23.5));
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn test_history_capacity_is_respected() {
        let mut state = ReadingState::with_history_capacity(3);
        for v in [1.0, 2.0, 3.0, 4.0] {
            state.record_value(v);
        }
        assert_eq!(
            state.history().iter().collect::<Vec<_>>(),
            vec![2.0, 3.0, 4.0]
        );
    }
}
