//! # sensorwatch-core
//!
//! The data-acquisition core behind the sensorwatch dashboard. It keeps a
//! live connection to a remote device relay under one of three transport
//! strategies, normalizes whatever payload shape arrives into canonical
//! readings, tracks connection health, and accumulates a bounded rolling
//! history — while staying safely restartable as configuration changes and
//! safely stoppable without leaking timers or connections.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    AcquisitionSession                        │
//! │  ┌───────────┐   raw payloads   ┌───────────┐   readings    │
//! │  │ transport │─────────────────▶│ normalize │──────────────▶│
//! │  │  (1 of 3) │   connectivity   └───────────┘  ReadingState │
//! │  └───────────┘────────────────────────────────────────────▶ │
//! └──────────────────────────────────────────────────────────────┘
//!        ▲
//!        │ PollingTransport | EventStreamTransport | PushTransport
//! ```
//!
//! - **[`transport`]**: The [`Transport`] trait plus the three strategies —
//!   HTTP polling, server-sent event streams, and an MQTT push channel.
//!   Each runs its I/O on a background task and hands events to the caller
//!   through a non-blocking `poll()`.
//! - **[`session`]**: [`AcquisitionSession`] owns at most one live transport,
//!   bridges its payloads through the normalizer, and exposes
//!   configure/start/stop semantics. All state mutation happens on the
//!   caller's thread inside [`AcquisitionSession::pump`].
//! - **[`state`]**: [`ReadingState`] — latest reading, connectivity flag, and
//!   the bounded history. Consumers read it; only the session writes it.
//! - **[`command`]**: [`CommandClient`] — the actuator side channel, a plain
//!   HTTP POST independent of the acquisition loop.
//!
//! ## Usage
//!
//! ```no_run
//! use sensorwatch_core::AcquisitionSession;
//! use sensorwatch_types::{Quantity, SessionConfig};
//!
//! # tokio_test::block_on(async {
//! let mut session = AcquisitionSession::new(Quantity::Temperature);
//! session.configure(SessionConfig::polling(
//!     "http://localhost:8000/api/temperature/latest/",
//! ));
//! session.start();
//!
//! // ... periodically, from the UI loop:
//! session.pump();
//! if let Some(reading) = session.state().latest() {
//!     println!("{} °C", reading.value);
//! }
//!
//! session.stop();
//! # });
//! ```

pub mod command;
pub mod error;
pub mod session;
pub mod state;
pub mod transport;

pub use command::CommandClient;
pub use error::TransportError;
pub use session::AcquisitionSession;
pub use state::{Reading, ReadingState};
pub use transport::{
    EventStreamTransport, PollingTransport, PushTransport, Transport, TransportEvent,
};
