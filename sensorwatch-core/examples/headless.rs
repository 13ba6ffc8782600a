//! Example: headless acquisition
//!
//! Runs one temperature session against a relay endpoint and prints every
//! reading, without any UI. Useful for checking connectivity before starting
//! the dashboard.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example headless -- http://localhost:8000/api/temperature/latest/
//! ```

use std::time::Duration;

use sensorwatch_core::AcquisitionSession;
use sensorwatch_types::{Quantity, SessionConfig};

#[tokio::main]
async fn main() {
    let endpoint = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://localhost:8000/api/temperature/latest/".to_string());

    println!("Polling {endpoint} — Ctrl-C to stop\n");

    let mut session = AcquisitionSession::new(Quantity::Temperature);
    session.configure(SessionConfig::polling(&endpoint));
    session.start();

    let mut last_connected = false;
    loop {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let applied = session.pump();

        let state = session.state();
        if state.connected() != last_connected {
            last_connected = state.connected();
            println!(
                "[{}]",
                if last_connected { "connected" } else { "disconnected" }
            );
        }
        if applied > 0 {
            if let Some(reading) = state.latest() {
                println!(
                    "{:.1} {}  (history: {} readings)",
                    reading.value,
                    Quantity::Temperature.unit(),
                    state.history().len()
                );
            }
        }
    }
}
