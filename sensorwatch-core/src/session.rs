//! Acquisition session lifecycle.
//!
//! An [`AcquisitionSession`] owns at most one live transport, bridges its raw
//! payloads through the normalizer, and applies the results to its
//! [`ReadingState`]. The state machine is `Idle → Active → Idle`;
//! reconfiguring while active is an implicit stop-then-start with the new
//! snapshot, never a live mutation of the running transport.

use tracing::{debug, info, warn};

use sensorwatch_types::{normalize, ConnectionMode, Quantity, SessionConfig};

use crate::state::ReadingState;
use crate::transport::{
    EventStreamTransport, PollingTransport, PushTransport, Transport, TransportEvent,
};

/// Owner of one quantity's transport and reading state.
///
/// One session tracks one quantity; a dashboard showing temperature,
/// humidity, and distance runs three sessions side by side. All mutation of
/// the reading state happens on the caller's thread inside [`pump`], so no
/// locking is involved anywhere.
///
/// [`pump`]: AcquisitionSession::pump
#[derive(Debug)]
pub struct AcquisitionSession {
    quantity: Quantity,
    config: Option<SessionConfig>,
    transport: Option<Box<dyn Transport>>,
    state: ReadingState,
}

impl AcquisitionSession {
    /// Create an idle, unconfigured session for `quantity`.
    pub fn new(quantity: Quantity) -> Self {
        Self {
            quantity,
            config: None,
            transport: None,
            state: ReadingState::new(),
        }
    }

    /// Create an idle session with a custom history capacity.
    pub fn with_history_capacity(quantity: Quantity, capacity: usize) -> Self {
        Self {
            quantity,
            config: None,
            transport: None,
            state: ReadingState::with_history_capacity(capacity),
        }
    }

    /// The quantity this session tracks.
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// The configuration snapshot currently held, if any.
    pub fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    /// True while a transport is live.
    pub fn is_active(&self) -> bool {
        self.transport.is_some()
    }

    /// Description of the live transport, for status display.
    pub fn transport_description(&self) -> Option<&str> {
        self.transport.as_deref().map(|t| t.description())
    }

    /// The observable reading state.
    pub fn state(&self) -> &ReadingState {
        &self.state
    }

    /// Replace the configuration snapshot.
    ///
    /// If the session is active it is restarted under the new configuration;
    /// the old transport is fully stopped before the new one is spawned, so
    /// two transports are never live at once.
    pub fn configure(&mut self, config: SessionConfig) {
        let was_active = self.is_active();
        if was_active {
            self.stop();
        }
        self.config = Some(config);
        if was_active {
            self.start();
        }
    }

    /// Spawn a transport for the held configuration.
    ///
    /// No-op while already active, while unconfigured, or when the held
    /// configuration has no endpoint.
    pub fn start(&mut self) {
        if self.transport.is_some() {
            return;
        }
        let Some(config) = self.config.clone() else {
            return;
        };
        if !config.is_valid() {
            warn!(
                quantity = self.quantity.key(),
                "refusing to start without an endpoint"
            );
            return;
        }

        let transport: Box<dyn Transport> = match config.mode {
            ConnectionMode::Polling => Box::new(PollingTransport::spawn(
                &config.endpoint,
                config.poll_interval,
            )),
            ConnectionMode::EventStream => {
                Box::new(EventStreamTransport::spawn(&config.endpoint))
            }
            ConnectionMode::Push => {
                Box::new(PushTransport::spawn(&config.endpoint, self.quantity))
            }
        };

        info!(
            quantity = self.quantity.key(),
            transport = transport.description(),
            "session started"
        );
        self.transport = Some(transport);
    }

    /// Tear down the live transport, if any, and force connectivity false.
    ///
    /// Synchronous and idempotent. After this returns no pending completion
    /// of the old transport can reach the reading state.
    pub fn stop(&mut self) {
        let Some(mut transport) = self.transport.take() else {
            return;
        };
        transport.stop();
        self.state.set_connected(false);
        info!(quantity = self.quantity.key(), "session stopped");
    }

    /// Drain pending transport events into the reading state.
    ///
    /// Call this from the consumer's refresh loop. Payloads that normalize
    /// to a finite value update the latest reading and history; payloads the
    /// normalizer cannot interpret leave the state untouched for this cycle.
    /// Returns the number of events applied.
    pub fn pump(&mut self) -> usize {
        let Some(transport) = self.transport.as_mut() else {
            return 0;
        };

        let mut applied = 0;
        while let Some(event) = transport.poll() {
            match event {
                TransportEvent::Payload(raw) => match normalize(&raw, self.quantity) {
                    Some(value) => {
                        self.state.record_value(value);
                        applied += 1;
                    }
                    None => {
                        debug!(
                            quantity = self.quantity.key(),
                            "payload carried no recognizable reading"
                        );
                    }
                },
                TransportEvent::Connectivity(flag) => {
                    self.state.set_connected(flag);
                    applied += 1;
                }
            }
        }
        applied
    }
}

impl Drop for AcquisitionSession {
    fn drop(&mut self) {
        self.stop();
    }
}
