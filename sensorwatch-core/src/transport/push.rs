//! Broker push transport.
//!
//! Keeps a persistent MQTT connection to the device relay and subscribes to
//! the topic named after the tracked quantity. Reconnection is delegated to
//! the rumqttc event loop — this layer only reports channel gains and losses
//! and forwards published payloads.

use std::time::Duration;

use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

use sensorwatch_types::Quantity;

use super::{Transport, TransportEvent, TransportTask, EVENT_BUFFER};

/// Default broker port when the endpoint does not name one.
const DEFAULT_MQTT_PORT: u16 = 1883;

/// Pause after an event-loop error before letting the next poll re-dial.
const REDIAL_DELAY: Duration = Duration::from_secs(1);

/// A transport that receives readings pushed over MQTT.
#[derive(Debug)]
pub struct PushTransport {
    inner: TransportTask,
    description: String,
}

impl PushTransport {
    /// Spawn a push subscription for `quantity` against `endpoint`
    /// (`mqtt://host:port`, `host:port`, or bare `host`).
    ///
    /// Must be called within a Tokio runtime.
    pub fn spawn(endpoint: &str, quantity: Quantity) -> Self {
        let (host, port) = parse_endpoint(endpoint);
        let topic = quantity.key().to_string();
        let description = format!("push: {host}:{port} topic {topic}");

        let client_id = format!("sensorwatch-{topic}");
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let task = tokio::spawn(push_loop(host, port, client_id, topic, tx));

        Self {
            inner: TransportTask::new(rx, task),
            description,
        }
    }
}

impl Transport for PushTransport {
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

/// Split an endpoint into host and port, defaulting the port.
fn parse_endpoint(endpoint: &str) -> (String, u16) {
    let trimmed = endpoint
        .trim()
        .trim_start_matches("mqtt://")
        .trim_start_matches("tcp://")
        .trim_start_matches("http://")
        .trim_start_matches("https://")
        .trim_end_matches('/');

    match trimmed.rsplit_once(':') {
        Some((host, port)) => match port.parse() {
            Ok(port) => (host.to_string(), port),
            Err(_) => (trimmed.to_string(), DEFAULT_MQTT_PORT),
        },
        None => (trimmed.to_string(), DEFAULT_MQTT_PORT),
    }
}

async fn push_loop(
    host: String,
    port: u16,
    client_id: String,
    topic: String,
    tx: mpsc::Sender<TransportEvent>,
) {
    let mut options = MqttOptions::new(client_id, host, port);
    options.set_keep_alive(Duration::from_secs(5));

    let (client, mut eventloop) = AsyncClient::new(options, 10);

    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                // Sessions are clean, so the subscription must be re-issued
                // on every (re)connect.
                if client.subscribe(&topic, QoS::AtMostOnce).await.is_err() {
                    return;
                }
                if tx.send(TransportEvent::Connectivity(true)).await.is_err() {
                    return;
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let payload = decode_payload(&publish.payload);
                if tx.send(TransportEvent::Payload(payload)).await.is_err() {
                    return;
                }
            }
            Ok(_) => {}
            Err(e) => {
                debug!(topic = %topic, error = %e, "push channel error");
                if tx.send(TransportEvent::Connectivity(false)).await.is_err() {
                    return;
                }
                tokio::time::sleep(REDIAL_DELAY).await;
            }
        }
    }
}

/// JSON-decode a published payload, passing raw text through on failure.
fn decode_payload(bytes: &[u8]) -> Value {
    let text = String::from_utf8_lossy(bytes);
    serde_json::from_str(&text).unwrap_or_else(|_| Value::String(text.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_endpoint_with_scheme_and_port() {
        assert_eq!(
            parse_endpoint("mqtt://broker.local:1884"),
            ("broker.local".to_string(), 1884)
        );
    }

    #[test]
    fn test_parse_endpoint_bare_host() {
        assert_eq!(
            parse_endpoint("broker.local"),
            ("broker.local".to_string(), DEFAULT_MQTT_PORT)
        );
    }

    #[test]
    fn test_parse_endpoint_host_port() {
        assert_eq!(
            parse_endpoint("192.168.1.100:1883"),
            ("192.168.1.100".to_string(), 1883)
        );
    }

    #[test]
    fn test_parse_endpoint_trailing_slash() {
        assert_eq!(
            parse_endpoint("mqtt://broker.local/"),
            ("broker.local".to_string(), DEFAULT_MQTT_PORT)
        );
    }

    #[test]
    fn test_decode_payload_json() {
        let value = decode_payload(br#"{ "valor": 23.5 }"#);
        assert_eq!(value["valor"].as_f64(), Some(23.5));
    }

    #[test]
    fn test_decode_payload_raw_number_text() {
        assert_eq!(decode_payload(b"22.7"), serde_json::json!(22.7));
    }

    #[test]
    fn test_decode_payload_raw_text() {
        assert_eq!(
            decode_payload(b"sensor offline"),
            Value::String("sensor offline".to_string())
        );
    }

    #[tokio::test]
    async fn test_unreachable_broker_reports_disconnect() {
        let mut transport = PushTransport::spawn("127.0.0.1:1", Quantity::Temperature);

        let start = tokio::time::Instant::now();
        let mut saw_disconnect = false;
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
