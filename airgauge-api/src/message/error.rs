#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Malformed envelope: {0}")]
    Malformed(#[from] serde_json::Error),
}
