//! Server-initiated event-stream transport.
//!
//! Consumes a `text/event-stream` response line by line. Each `data:` field
//! is JSON-decoded when possible; otherwise the raw text is passed through
//! unchanged, so a stream of bare numeric literals still works. When the
//! stream errors or ends the transport reports the loss and re-opens it
//! after a fixed retry delay, standing in for a browser EventSource's native
//! retry — the session never layers its own backoff on top.

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::{header, Client, Response};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::TransportError;

use super::{Transport, TransportEvent, TransportTask, EVENT_BUFFER};

/// Delay before re-opening a failed stream, matching the browser default.
const RETRY_DELAY: Duration = Duration::from_secs(3);

/// Time allowed for the initial connection. The stream itself has no
/// deadline — it is expected to stay open indefinitely.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// A transport that consumes a server-sent event stream.
#[derive(Debug)]
pub struct EventStreamTransport {
    inner: TransportTask,
    description: String,
}

impl EventStreamTransport {
    /// Spawn a stream reader against `endpoint`.
    ///
    /// Must be called within a Tokio runtime.
    pub fn spawn(endpoint: &str) -> Self {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        let url = endpoint.to_string();
        let description = format!("event-stream: {url}");

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let task = tokio::spawn(stream_loop(client, url, tx));

        Self {
            inner: TransportTask::new(rx, task),
            description,
        }
    }
}

impl Transport for EventStreamTransport {
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

async fn stream_loop(client: Client, url: String, tx: mpsc::Sender<TransportEvent>) {
    loop {
        match open_stream(&client, &url).await {
            Ok(response) => {
                if tx.send(TransportEvent::Connectivity(true)).await.is_err() {
                    return;
                }
                if let Err(e) = read_events(response, &tx).await {
                    debug!(url = %url, error = %e, "event stream failed");
                }
            }
            Err(e) => {
                debug!(url = %url, error = %e, "event stream connect failed");
            }
        }
        if tx.send(TransportEvent::Connectivity(false)).await.is_err() {
            return;
        }
        tokio::time::sleep(RETRY_DELAY).await;
    }
}

async fn open_stream(client: &Client, url: &str) -> Result<Response, TransportError> {
    let response = client
        .get(url)
        .header(header::ACCEPT, "text/event-stream")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(TransportError::Http(format!(
            "endpoint returned status {}",
            response.status()
        )));
    }

    Ok(response)
}

/// Read `data:` fields until the stream errors or ends.
///
/// Returns `Ok(())` on a clean end of stream (the server closed), `Err` on a
/// mid-stream failure. Either way the caller reports the channel as lost.
async fn read_events(
    response: Response,
    tx: &mpsc::Sender<TransportEvent>,
) -> Result<(), TransportError> {
    let mut stream = response.bytes_stream();
    let mut buffer = String::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| TransportError::Connection(e.to_string()))?;
        buffer.push_str(&String::from_utf8_lossy(&chunk));

        while let Some(newline) = buffer.find('\n') {
            let line = buffer[..newline].trim_end_matches('\r').to_string();
            buffer.drain(..=newline);

            if let Some(data) = line.strip_prefix("data:") {
                let data = data.strip_prefix(' ').unwrap_or(data);
                if data.is_empty() {
                    continue;
                }
                let payload = decode_data(data);
                if tx.send(TransportEvent::Payload(payload)).await.is_err() {
                    return Ok(());
                }
            }
            // Blank separator lines, comments, and other fields are ignored.
        }
    }

    Ok(())
}

/// JSON-decode an event's data field, passing raw text through on failure.
fn decode_data(data: &str) -> Value {
    serde_json::from_str(data).unwrap_or_else(|_| Value::String(data.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one event-stream connection carrying the given frames, then
    /// close the socket.
    async fn serve_stream(frames: Vec<String>) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await;
            let header = "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nCache-Control: no-cache\r\nConnection: close\r\n\r\n";
            let _ = socket.write_all(header.as_bytes()).await;
            for frame in frames {
                let _ = socket.write_all(frame.as_bytes()).await;
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        });
        addr
    }

    async fn collect_events(
        transport: &mut EventStreamTransport,
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

    #[test]
    fn test_decode_data_json_object() {
        let value = decode_data(r#"{ "temperature": 21.5 }"#);
        assert_eq!(value["temperature"].as_f64(), Some(21.5));
    }

    #[test]
    fn test_decode_data_bare_number() {
        assert_eq!(decode_data("22.7"), serde_json::json!(22.7));
    }

    #[test]
    fn test_decode_data_raw_text_passthrough() {
        assert_eq!(
            decode_data("not json at all"),
            Value::String("not json at all".to_string())
        );
    }

    #[tokio::test]
    async fn test_stream_delivers_json_and_text_events() {
        let addr = serve_stream(vec![
            "data: { \"temperature\": 21.5 }\n\n".to_string(),
            "data: warming up\n\n".to_string(),
            ": keep-alive comment\n".to_string(),
        ])
        .await;

        let mut transport = EventStreamTransport::spawn(&format!("http://{addr}/events"));
        let events = collect_events(&mut transport, 2, Duration::from_secs(5)).await;
        transport.stop();

        assert!(matches!(
            events.first(),
            Some(TransportEvent::Connectivity(true))
        ));
        let payloads: Vec<&Value> = events
            .iter()
            .filter_map(|e| match e {
                TransportEvent::Payload(v) => Some(v),
                _ => None,
            })
            .collect();
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[0]["temperature"].as_f64(), Some(21.5));
        assert_eq!(*payloads[1], Value::String("warming up".to_string()));
    }

    #[tokio::test]
    async fn test_stream_close_reports_disconnect() {
        let addr = serve_stream(vec!["data: 22.7\n\n".to_string()]).await;

        let mut transport = EventStreamTransport::spawn(&format!("http://{addr}/events"));
        let events = collect_events(&mut transport, 1, Duration::from_secs(5)).await;

        // The server closes after one event; the loss must surface before
        // the retry kicks in.
        let start = tokio::time::Instant::now();
        let mut saw_disconnect = events
            .iter()
            .any(|e| matches!(e, TransportEvent::Connectivity(false)));
        while !saw_disconnect && start.elapsed() < Duration::from_secs(2) {
            if let Some(TransportEvent::Connectivity(false)) = transport.poll() {
                saw_disconnect = true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        transport.stop();
        assert!(saw_disconnect);
    }
}
