use std::env;
use std::time::Duration;

use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use config::builder::DefaultState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Broker {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    /// Filter the core subscribes to on its local link
    pub topic: String,
    pub max_payload_size: usize,
    pub max_connections: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Liveness {
    pub heartbeat_interval_secs: u64,
}

impl Liveness {
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metrics {
    pub namespace: String,
    /// Adds a `topic` label to the sensor gauges
    pub topic_label: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub logger: Logger,
    pub broker: Broker,
    pub liveness: Liveness,
    pub metrics: Metrics,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());

        let builder = Config::builder()
            .add_source(File::with_name("configs/default"))
            .add_source(File::with_name(&format!("configs/{run_mode}")).required(false))
            .add_source(Environment::default().separator("__"));

        Self::build(builder)
    }

    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Self::build(Config::builder().add_source(File::from_str(source, FileFormat::Toml)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Settings = builder.build()?.try_deserialize()?;

        if settings.liveness.heartbeat_interval_secs == 0 {
            return Err(ConfigError::Message(
                "liveness.heartbeat_interval_secs must be greater than zero".to_string(),
            ));
        }

        if settings.broker.topic.is_empty() {
            return Err(ConfigError::Message("broker.topic must not be empty".to_string()));
        }

        Ok(settings)
    }
}
