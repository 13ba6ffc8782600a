//! # sensorwatch-types
//!
//! Core types for live sensor telemetry. This crate defines the schema shared
//! by the acquisition core and its consumers: which quantities a device can
//! report, how a session is configured, the bounded history of recent
//! readings, and the normalizer that turns heterogeneous backend payloads
//! into canonical numeric values.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable the `serde` feature for config files and
//!   payload normalization
//! - **Backend agnostic**: The normalizer accepts every payload shape the known
//!   device relays emit, from `{ datos: [{ valor: .. }] }` records down to bare
//!   numeric literals
//!
//! ## Features
//!
//! - `std` (default): Standard library support
//! - `serde` (default): Serialization derives plus the [`normalize`] payload
//!   decoder; disable for a bare-schema build
//!
//! ## Example
//!
//! ```rust
//! use sensorwatch_types::{HistoryBuffer, Quantity, SessionConfig};
//!
//! let config = SessionConfig::polling("http://localhost:8000/api/temperature/latest/");
//! assert!(config.is_valid());
//!
//! let mut history = HistoryBuffer::with_capacity(3);
//! for v in [1.0, 2.0, 3.0, 4.0] {
//!     history.push(v);
//! }
//! assert_eq!(history.iter().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
//! assert_eq!(Quantity::Temperature.unit(), "°C");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod config;
mod history;
#[cfg(feature = "serde")]
mod normalize;
mod quantity;

pub use config::*;
pub use history::*;
#[cfg(feature = "serde")]
pub use normalize::*;
pub use quantity::*;
