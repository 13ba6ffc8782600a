//! # sensorwatch-tui
//!
//! A terminal dashboard for live sensor telemetry. It runs one acquisition
//! session per tracked quantity (temperature, humidity, distance) against a
//! remote device relay and renders the results as gauges and history charts,
//! with a side channel for toggling an actuator on the device.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Application                           │
//! │  ┌─────────┐     ┌──────────────┐     ┌────────┐            │
//! │  │  app    │────▶│ ui (render)  │────▶│Terminal│            │
//! │  │ (state) │     └──────────────┘     └────────┘            │
//! │  └────┬────┘                                                 │
//! │       │ pump() per frame                                     │
//! │       ▼                                                      │
//! │  AcquisitionSession × 3  ◀── Polling | EventStream | Push   │
//! │  (sensorwatch-core)                                          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state — the three sessions, the runtime
//!   settings surface, actuator command dispatch, and view navigation
//! - **[`settings`]**: Layered configuration (defaults, optional TOML file,
//!   environment, CLI) and per-quantity endpoint derivation
//! - **[`events`]**: Key handling
//! - **[`ui`]**: Rendering — dashboard tiles, history sparklines, theme,
//!   and the shared chrome
//!
//! The acquisition core itself lives in `sensorwatch-core` and has no
//! knowledge of this (or any) UI.

pub mod app;
pub mod events;
pub mod settings;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, View};
pub use settings::Settings;
