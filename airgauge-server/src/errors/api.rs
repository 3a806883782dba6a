use super::MetricsError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Metrics error: {0}")]
    MetricsError(#[from] MetricsError),
}
