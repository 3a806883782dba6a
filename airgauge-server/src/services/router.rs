use std::sync::Arc;

use airgauge_api::{Envelope, MessageKind};

use crate::services::ack::AckSender;
use crate::services::liveness::LivenessTracker;
use crate::services::metrics::MetricsSink;

/// What happened to one inbound publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Body could not be parsed
    Rejected,
    /// Parsed but the type code is not handled
    Ignored,
    /// Liveness refreshed, nothing else touched
    Heartbeat,
    /// Readings applied; `acked` is true when an acknowledgment was published
    Data { acked: bool },
}

/// Drives each publish event through parsing, liveness, metrics and
/// acknowledgment. Safe to call from concurrent publish events.
pub struct MessageRouter {
    liveness: Arc<LivenessTracker>,
    sink: Arc<dyn MetricsSink>,
    acks: AckSender,
}

impl MessageRouter {
    pub fn new(liveness: Arc<LivenessTracker>, sink: Arc<dyn MetricsSink>, acks: AckSender) -> Self {
        Self { liveness, sink, acks }
    }

    pub fn handle_publish(&self, topic: &str, payload: &[u8]) -> Outcome {
        tracing::debug!(topic, bytes = payload.len(), "Received MQTT message");

        let envelope = match Envelope::parse(payload) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!(topic, "Failed to parse message: {}", e);
                if let Err(e) = self.sink.parse_error(topic) {
                    tracing::warn!("Failed to record parse error: {}", e);
                }
                return Outcome::Rejected;
            }
        };

        let device_id = envelope.device_id();
        if let Err(e) = self.sink.message_received(&envelope.kind, topic, device_id) {
            tracing::warn!("Failed to record message: {}", e);
        }

        let kind = envelope.message_kind();
        if !kind.is_recognized() {
            tracing::debug!(topic, kind = %envelope.kind, "Ignoring message type");
            return Outcome::Ignored;
        }

        self.liveness.touch(device_id);

        if kind == MessageKind::Heartbeat {
            return Outcome::Heartbeat;
        }

        let reading = envelope.latest_reading().cloned().unwrap_or_default();
        if let Err(e) = self.sink.set_readings(device_id, topic, &reading) {
            tracing::error!(topic, mac = device_id, "Failed to update sensor metrics: {}", e);
        }

        let acked = envelope.needs_ack() && self.acks.send(topic, envelope.id);

        Outcome::Data { acked }
    }
}
