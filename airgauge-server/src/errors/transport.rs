#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Outbound queue rejected publish: {0}")]
    Rejected(String),

    #[error("Transport disconnected")]
    Disconnected,
}
