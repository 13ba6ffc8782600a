//! Client-initiated HTTP polling transport.
//!
//! Issues one fetch immediately on start, then one per interval. Fetches are
//! strictly sequential: the loop awaits each cycle before the next tick, and
//! ticks missed while a slow response is outstanding are skipped rather than
//! queued, so at most one request is in flight at any instant.

use std::time::Duration;

use reqwest::{header, Client};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::error::TransportError;

use super::{Transport, TransportEvent, TransportTask, EVENT_BUFFER};

/// Hard per-cycle timeout. Expiry counts as a network failure.
pub const POLL_TIMEOUT: Duration = Duration::from_secs(5);

/// Tunneling intermediaries (ngrok) interpose an interstitial page unless
/// this bypass header is present.
const NGROK_BYPASS_HEADER: &str = "ngrok-skip-browser-warning";

/// A transport that polls an HTTP endpoint for JSON readings.
///
/// Every successful cycle emits the decoded payload followed by
/// `Connectivity(true)`; every failed cycle (connect error, timeout, non-2xx
/// status, undecodable body) emits `Connectivity(false)` and is otherwise
/// skipped.
#[derive(Debug)]
pub struct PollingTransport {
    inner: TransportTask,
    description: String,
}

impl PollingTransport {
    /// Spawn a polling loop against `endpoint`.
    ///
    /// Must be called within a Tokio runtime.
    pub fn spawn(endpoint: &str, interval: Duration) -> Self {
        let client = Client::builder()
            .timeout(POLL_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        let url = endpoint.to_string();
        let description = format!("polling: {} every {}ms", url, interval.as_millis());

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let task = tokio::spawn(poll_loop(client, url, interval, tx));

        Self {
            inner: TransportTask::new(rx, task),
            description,
        }
    }
}

impl Transport for PollingTransport {
    fn poll(&mut self) -> Option<TransportEvent> {
        self.inner.poll()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn stop(&mut self) {
        self.inner.stop();
    }
}

async fn poll_loop(
    client: Client,
    url: String,
    interval: Duration,
    tx: mpsc::Sender<TransportEvent>,
) {
    let mut ticker = tokio::time::interval(interval);
    // The first tick fires immediately; ticks that elapse while a fetch is
    // outstanding are skipped, keeping cycles mutually exclusive.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        match fetch_once(&client, &url).await {
            Ok(payload) => {
                if tx.send(TransportEvent::Payload(payload)).await.is_err() {
                    return;
                }
                if tx.send(TransportEvent::Connectivity(true)).await.is_err() {
                    return;
                }
            }
            Err(e) => {
                debug!(url = %url, error = %e, "poll cycle failed");
                if tx.send(TransportEvent::Connectivity(false)).await.is_err() {
                    return;
                }
            }
        }
    }
}

async fn fetch_once(client: &Client, url: &str) -> Result<Value, TransportError> {
    let response = client
        .get(url)
        .header(header::ACCEPT, "application/json")
        .header(NGROK_BYPASS_HEADER, "true")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(TransportError::Http(format!(
            "endpoint returned status {}",
            response.status()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| TransportError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve each canned HTTP response to one connection, then stop accepting.
    async fn serve_responses(responses: Vec<String>) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            for response in responses {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut buf = [0u8; 2048];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
        addr
    }

    fn json_response(body: &str) -> String {
        format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        )
    }

    fn error_response() -> String {
        "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
            .to_string()
    }

    /// Drain events from the transport until `want` payloads arrived or the
    /// deadline passes.
    async fn collect_events(
        transport: &mut PollingTransport,
        want_payloads: usize,
        deadline: Duration,
    ) -> Vec<TransportEvent> {
        let start = tokio::time::Instant::now();
        let mut events = Vec::new();
        while start.elapsed() < deadline {
            while let Some(event) = transport.poll() {
                events.push(event);
            }
            let payloads = events
                .iter()
                .filter(|e| matches!(e, TransportEvent::Payload(_)))
                .count();
            if payloads >= want_payloads {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        events
    }

    #[tokio::test]
    async fn test_successive_cycles_deliver_successive_payloads() {
        let addr = serve_responses(vec![
            json_response(r#"{ "datos": [ { "valor": 23.5 } ] }"#),
            json_response(r#"{ "datos": [ { "valor": 24.1 } ] }"#),
        ])
        .await;

        let mut transport = PollingTransport::spawn(
            &format!("http://{addr}/api/temperature/latest/"),
            Duration::from_millis(500),
        );

        let events = collect_events(&mut transport, 2, Duration::from_secs(5)).await;
        transport.stop();

        let values: Vec<f64> = events
            .iter()
            .filter_map(|e| match e {
                TransportEvent::Payload(v) => v["datos"][0]["valor"].as_f64(),
                _ => None,
            })
            .collect();
        assert_eq!(values, vec![23.5, 24.1]);
        assert!(events
            .iter()
            .any(|e| matches!(e, TransportEvent::Connectivity(true))));
    }

    #[tokio::test]
    async fn test_http_error_reports_disconnect_without_payload() {
        let addr = serve_responses(vec![error_response()]).await;

        let mut transport = PollingTransport::spawn(
            &format!("http://{addr}/"),
            Duration::from_millis(500),
        );

        let events = collect_events(&mut transport, 1, Duration::from_millis(600)).await;
        transport.stop();

        assert!(!events
            .iter()
            .any(|e| matches!(e, TransportEvent::Payload(_))));
        assert!(events
            .iter()
            .any(|e| matches!(e, TransportEvent::Connectivity(false))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_reports_disconnect() {
        // Port 1 is never listening.
        let mut transport =
            PollingTransport::spawn("http://127.0.0.1:1/", Duration::from_millis(500));

        let events = collect_events(&mut transport, 1, Duration::from_millis(800)).await;
        transport.stop();

        assert!(events
            .iter()
            .any(|e| matches!(e, TransportEvent::Connectivity(false))));
    }

    #[tokio::test]
    async fn test_stop_discards_in_flight_response() {
        // A server that answers only after a long delay.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await;
            tokio::time::sleep(Duration::from_millis(400)).await;
            let _ = socket
                .write_all(json_response(r#"{ "valor": 99.0 }"#).as_bytes())
                .await;
        });

        let mut transport =
            PollingTransport::spawn(&format!("http://{addr}/"), Duration::from_millis(500));

        // Let the first fetch go out, then stop while it is in flight.
        tokio::time::sleep(Duration::from_millis(100)).await;
        transport.stop();

        // Wait past the delayed response; nothing may surface.
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(transport.poll().is_none());
    }
}
