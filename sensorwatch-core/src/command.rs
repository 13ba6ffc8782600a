//! Actuator command channel.
//!
//! A side channel independent of the acquisition loop: a single HTTP POST
//! that toggles an actuator on the device. Failures are returned to the
//! caller for direct display — an explicit user action that did not take
//! effect is never silently retried.

use std::time::Duration;

use reqwest::{header, Client};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::error::TransportError;

/// Timeout for a command round trip.
const COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

/// The canonical command body. An older relay revision used
/// `{ "comando": "0"|"1", "hay_comando": true }`; that shape is legacy and
/// not emitted.
#[derive(Debug, Serialize)]
struct ActuatorCommand {
    estado: bool,
}

/// Client for the actuator command endpoint.
///
/// # Example
///
/// ```no_run
/// use sensorwatch_core::CommandClient;
///
/// # tokio_test::block_on(async {
/// let client = CommandClient::new("http://localhost:8000/api/actuator/");
/// match client.send(true).await {
///     Ok(ack) => println!("acknowledged: {ack}"),
///     Err(e) => eprintln!("command failed: {e}"),
/// }
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct CommandClient {
    client: Client,
    endpoint: String,
}

impl CommandClient {
    /// Create a client for the given command endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(COMMAND_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// The endpoint this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Set the actuator state, returning the relay's acknowledgment body.
    ///
    /// Any non-2xx status, timeout, or undecodable acknowledgment is an
    /// error. The caller decides how to surface it; nothing is retried.
    pub async fn send(&self, on: bool) -> Result<Value, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(header::ACCEPT, "application/json")
            .json(&ActuatorCommand { estado: on })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TransportError::Http(format!(
                "command endpoint returned status {}",
                response.status()
            )));
        }

        let ack: Value = response
            .json()
            .await
            .map_err(|e| TransportError::Parse(e.to_string()))?;
        info!(endpoint = %self.endpoint, on, "actuator command acknowledged");
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Accept one POST, capture the raw request, and reply with `response`.
    async fn serve_command(
        response: String,
    ) -> (SocketAddr, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            // Read until the JSON body has arrived; requests here are tiny.
            loop {
                match socket.read(&mut buf).await {
                    Ok(n) if n > 0 => {
                        request.extend_from_slice(&buf[..n]);
                        if request.contains(&b'}') {
                            break;
                        }
                    }
                    _ => break,
                }
            }
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = tx.send(String::from_utf8_lossy(&request).into_owned());
        });
        (addr, rx)
    }

    fn ack_response(body: &str) -> String {
        format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        )
    }

    #[tokio::test]
    async fn test_send_posts_estado_body_and_returns_ack() {
        let (addr, request) = serve_command(ack_response(r#"{ "ok": true }"#)).await;

        let client = CommandClient::new(format!("http://{addr}/actuator/"));
        let ack = client.send(true).await.unwrap();
        assert_eq!(ack["ok"], serde_json::json!(true));

        let request = request.await.unwrap();
        assert!(request.starts_with("POST "));
        assert!(request.contains(r#"{"estado":true}"#));
    }

    #[tokio::test]
    async fn test_send_false_serializes_false() {
        let (addr, request) = serve_command(ack_response("{}")).await;

        let client = CommandClient::new(format!("http://{addr}/actuator/"));
        client.send(false).await.unwrap();

        let request = request.await.unwrap();
        assert!(request.contains(r#"{"estado":false}"#));
    }

    #[tokio::test]
    async fn test_error_status_is_surfaced() {
        let (addr, _request) = serve_command(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                .to_string(),
        )
        .await;

        let client = CommandClient::new(format!("http://{addr}/actuator/"));
        let err = client.send(true).await.unwrap_err();
        assert!(matches!(err, TransportError::Http(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_connection_error() {
        let client = CommandClient::new("http://127.0.0.1:1/actuator/");
        let err = client.send(true).await.unwrap_err();
        assert!(matches!(
            err,
            TransportError::Connection(_) | TransportError::Http(_)
        ));
    }
}
