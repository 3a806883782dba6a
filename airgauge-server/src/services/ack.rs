use std::sync::Arc;

use airgauge_api::AckMessage;

use crate::errors::{AckError, TransportError};
use crate::services::metrics::MetricsSink;

/// Outbound path of the transport. `publish` hands the payload to the
/// transport's queue and returns without waiting for delivery.
pub trait Publisher: Send + Sync {
    fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), TransportError>;
}

/// Replies go to the inbound topic with its first `/up` replaced by `/down`.
pub fn reply_topic(topic: &str) -> String {
    topic.replacen("/up", "/down", 1)
}

pub struct AckSender {
    publisher: Arc<dyn Publisher>,
    sink: Arc<dyn MetricsSink>,
}

impl AckSender {
    pub fn new(publisher: Arc<dyn Publisher>, sink: Arc<dyn MetricsSink>) -> Self {
        Self { publisher, sink }
    }

    /// Acknowledges message `id` received on `topic`. Failures are counted
    /// and logged, never returned.
    pub fn send(&self, topic: &str, id: i64) -> bool {
        match self.deliver(topic, id) {
            Ok(down_topic) => {
                tracing::debug!(msg_id = id, topic = %down_topic, "Sent acknowledgment");
                if let Err(e) = self.sink.ack_sent(topic) {
                    tracing::warn!("Failed to record ack: {}", e);
                }
                true
            }
            Err(e) => {
                tracing::error!(msg_id = id, topic = %e.topic(), "{}", e);
                if let Err(e) = self.sink.ack_error(topic) {
                    tracing::warn!("Failed to record ack error: {}", e);
                }
                false
            }
        }
    }

    fn deliver(&self, topic: &str, id: i64) -> Result<String, AckError> {
        let down_topic = reply_topic(topic);

        let payload = serde_json::to_vec(&AckMessage::success(id)).map_err(|source| AckError::Encode {
            topic: topic.to_string(),
            source,
        })?;

        self.publisher
            .publish(&down_topic, payload)
            .map_err(|source| AckError::Publish {
                topic: topic.to_string(),
                source,
            })?;

        Ok(down_topic)
    }
}
