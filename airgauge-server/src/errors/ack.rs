use super::TransportError;

#[derive(Debug, thiserror::Error)]
pub enum AckError {
    #[error("Failed to encode acknowledgment for {topic}: {source}")]
    Encode {
        topic: String,
        source: serde_json::Error,
    },

    #[error("Failed to publish acknowledgment to {topic}: {source}")]
    Publish {
        topic: String,
        source: TransportError,
    },
}

impl AckError {
    pub fn topic(&self) -> &str {
        match self {
            AckError::Encode { topic, .. } => topic,
            AckError::Publish { topic, .. } => topic,
        }
    }
}
