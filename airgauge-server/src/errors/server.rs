use config::ConfigError;
use rumqttd::local::LinkError;

use super::MetricsError;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid address: {0}")]
    Address(#[from] std::net::AddrParseError),

    #[error("Broker link error: {0}")]
    Link(#[from] LinkError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
