//! Transport strategies for obtaining raw payloads from a telemetry source.
//!
//! This module provides a trait-based abstraction over the three ways the
//! dashboard can receive readings: client-initiated HTTP polling, a
//! server-initiated event stream, and a broker push channel. A transport is
//! responsible only for producing raw payloads and connectivity changes; it
//! never interprets payload contents.

mod polling;
mod push;
mod sse;

pub use polling::PollingTransport;
pub use push::PushTransport;
pub use sse::EventStreamTransport;

use std::fmt::Debug;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// One output of a transport.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// A raw decoded payload, not yet normalized.
    Payload(serde_json::Value),
    /// The transport gained or lost its channel to the source.
    Connectivity(bool),
}

/// Trait for receiving telemetry from a remote source.
///
/// Implementations run their I/O on a background task and buffer events;
/// `poll()` drains them without blocking, so a render loop can call it every
/// frame. Transports are single-use: once stopped they stay inert and a new
/// connection means a new instance.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use sensorwatch_core::{PollingTransport, Transport};
///
/// # tokio_test::block_on(async {
/// let mut transport =
///     PollingTransport::spawn("http://localhost:8000/api/temperature/latest/",
///                             Duration::from_millis(1000));
/// while let Some(event) = transport.poll() {
///     println!("{event:?}");
/// }
/// transport.stop();
/// # });
/// ```
pub trait Transport: Send + Debug {
    /// Drain the next pending event, if any.
    ///
    /// Non-blocking. Returns `None` once the transport has been stopped,
    /// even if events were still buffered at that point.
    fn poll(&mut self) -> Option<TransportEvent>;

    /// Returns a human-readable description of the transport.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Stop the transport.
    ///
    /// Idempotent. Aborts the background task and renders any in-flight I/O
    /// completion a no-op: nothing observable happens after `stop()` returns.
    fn stop(&mut self);
}

/// Shared plumbing for task-backed transports: the event channel receiver,
/// the task handle, and the stopped latch.
#[derive(Debug)]
pub(crate) struct TransportTask {
    receiver: mpsc::Receiver<TransportEvent>,
    task: Option<JoinHandle<()>>,
    stopped: bool,
}

/// Buffer size for transport event channels. Senders block (briefly) when
/// the consumer falls behind, which bounds memory on a bursty source.
pub(crate) const EVENT_BUFFER: usize = 16;

impl TransportTask {
    pub(crate) fn new(receiver: mpsc::Receiver<TransportEvent>, task: JoinHandle<()>) -> Self {
        Self {
            receiver,
            task: Some(task),
            stopped: false,
        }
    }

    pub(crate) fn poll(&mut self) -> Option<TransportEvent> {
        if self.stopped {
            return None;
        }
        self.receiver.try_recv().ok()
    }

    pub(crate) fn stop(&mut self) {
        self.stopped = true;
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.receiver.close();
    }
}

impl Drop for TransportTask {
    fn drop(&mut self) {
        // A dropped transport must not leave its task running.
        self.stop();
    }
}
