//! Dashboard settings.
//!
//! Settings come from three layers, weakest first: built-in defaults, an
//! optional TOML file, and `SENSORWATCH_*` environment variables. CLI flags
//! override all of them. The struct is also the runtime configuration
//! surface: the UI mutates it and asks each session for a fresh
//! [`SessionConfig`] snapshot, which restarts the transport.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

use sensorwatch_types::{
    clamp_poll_interval, ConnectionMode, Quantity, SessionConfig, DEFAULT_HISTORY_CAPACITY,
};

/// All dashboard settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Transport strategy for every quantity.
    pub mode: ConnectionMode,
    /// Base URL of the device relay; per-quantity endpoints derive from it.
    pub base_url: String,
    /// Explicit endpoint overrides, one per quantity.
    pub temperature_url: Option<String>,
    pub humidity_url: Option<String>,
    pub distance_url: Option<String>,
    /// Actuator command endpoint override.
    pub command_url: Option<String>,
    /// Polling interval in milliseconds (clamped to 500–5000).
    pub poll_interval_ms: u64,
    /// Readings kept per quantity for the history view.
    pub history_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: ConnectionMode::Polling,
            base_url: "http://localhost:8000".to_string(),
            temperature_url: None,
            humidity_url: None,
            distance_url: None,
            command_url: None,
            poll_interval_ms: 1000,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl Settings {
    /// Load settings from an optional file merged with the environment.
    ///
    /// Without an explicit path, a `sensorwatch.toml` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        builder = match path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name("sensorwatch").required(false)),
        };
        let config = builder
            .add_source(Environment::with_prefix("SENSORWATCH"))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// The telemetry endpoint for one quantity under the current mode.
    pub fn endpoint_for(&self, quantity: Quantity) -> String {
        let explicit = match quantity {
            Quantity::Temperature => &self.temperature_url,
            Quantity::Humidity => &self.humidity_url,
            Quantity::Distance => &self.distance_url,
        };
        if let Some(url) = explicit {
            return url.clone();
        }

        let base = self.base_url.trim_end_matches('/');
        match self.mode {
            ConnectionMode::Polling => format!("{base}/api/{}/latest/", quantity.key()),
            ConnectionMode::EventStream => format!("{base}/api/{}/stream/", quantity.key()),
            // Push mode connects to the broker itself; the quantity selects
            // the topic, not the path.
            ConnectionMode::Push => self.base_url.clone(),
        }
    }

    /// The actuator command endpoint.
    pub fn command_endpoint(&self) -> String {
        self.command_url.clone().unwrap_or_else(|| {
            format!("{}/api/actuator/", self.base_url.trim_end_matches('/'))
        })
    }

    /// An immutable session config snapshot for one quantity.
    pub fn session_config(&self, quantity: Quantity) -> SessionConfig {
        SessionConfig::new(self.mode, self.endpoint_for(quantity))
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
    }

    /// Step the polling interval, staying inside the supported bounds.
    pub fn step_interval(&mut self, delta_ms: i64) {
        let next = (self.poll_interval_ms as i64).saturating_add(delta_ms).max(0) as u64;
        self.poll_interval_ms =
            clamp_poll_interval(Duration::from_millis(next)).as_millis() as u64;
    }
}
