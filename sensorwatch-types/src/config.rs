//! Session configuration for the acquisition core.

use alloc::string::String;
use core::time::Duration;

/// Shortest polling interval the device relay tolerates.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Longest useful polling interval.
pub const MAX_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Default polling interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// How raw payloads are obtained from the telemetry source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ConnectionMode {
    /// Persistent bidirectional channel; the broker pushes quantity-named events.
    Push,
    /// Server-initiated text event stream.
    EventStream,
    /// Client-initiated HTTP polling.
    #[default]
    Polling,
}

impl ConnectionMode {
    /// Cycle to the next mode.
    pub fn next(self) -> Self {
        match self {
            ConnectionMode::Push => ConnectionMode::EventStream,
            ConnectionMode::EventStream => ConnectionMode::Polling,
            ConnectionMode::Polling => ConnectionMode::Push,
        }
    }

    /// Returns the display label for this mode.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionMode::Push => "Push",
            ConnectionMode::EventStream => "Event stream",
            ConnectionMode::Polling => "Polling",
        }
    }
}

/// An immutable snapshot of how one acquisition session connects.
///
/// The session treats this as a value: changing anything means building a new
/// config and reconfiguring, which tears down the running transport and
/// starts a fresh one. There is no in-place mutation of a live transport.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionConfig {
    /// Transport strategy to use.
    pub mode: ConnectionMode,
    /// Endpoint URL. HTTP(S) for polling and event-stream modes,
    /// `mqtt://host:port` (or bare `host:port`) for push mode.
    pub endpoint: String,
    /// Delay between fetch cycles. Only meaningful for polling mode.
    #[cfg_attr(feature = "serde", serde(default = "default_poll_interval"))]
    pub poll_interval: Duration,
}

#[cfg(feature = "serde")]
fn default_poll_interval() -> Duration {
    DEFAULT_POLL_INTERVAL
}

impl SessionConfig {
    /// Create a config with the default polling interval.
    pub fn new(mode: ConnectionMode, endpoint: impl Into<String>) -> Self {
        Self {
            mode,
            endpoint: endpoint.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Convenience constructor for polling mode.
    pub fn polling(endpoint: impl Into<String>) -> Self {
        Self::new(ConnectionMode::Polling, endpoint)
    }

    /// Set the polling interval, clamped to the supported bounds.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = clamp_poll_interval(interval);
        self
    }

    /// A config with an empty endpoint cannot start a transport.
    pub fn is_valid(&self) -> bool {
        !self.endpoint.trim().is_empty()
    }
}

/// Force an interval into the supported 500–5000 ms window.
pub fn clamp_poll_interval(interval: Duration) -> Duration {
    interval.clamp(MIN_POLL_INTERVAL, MAX_POLL_INTERVAL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_cycle_covers_all() {
        let mut mode = ConnectionMode::Polling;
        let mut seen = alloc::vec::Vec::new();
        for _ in 0..3 {
            mode = mode.next();
            seen.push(mode);
        }
        assert!(seen.contains(&ConnectionMode::Push));
        assert!(seen.contains(&ConnectionMode::EventStream));
        assert!(seen.contains(&ConnectionMode::Polling));
    }

    #[test]
    fn test_interval_clamping() {
        let config = SessionConfig::polling("http://localhost:8000")
            .with_poll_interval(Duration::from_millis(100));
        assert_eq!(config.poll_interval, MIN_POLL_INTERVAL);

        let config = SessionConfig::polling("http://localhost:8000")
            .with_poll_interval(Duration::from_secs(60));
        assert_eq!(config.poll_interval, MAX_POLL_INTERVAL);

        let config = SessionConfig::polling("http://localhost:8000")
            .with_poll_interval(Duration::from_millis(2500));
        assert_eq!(config.poll_interval, Duration::from_millis(2500));
    }

    #[test]
    fn test_empty_endpoint_is_invalid() {
        assert!(!SessionConfig::polling("").is_valid());
        assert!(!SessionConfig::polling("   ").is_valid());
        assert!(SessionConfig::polling("http://localhost:8000").is_valid());
    }
}
