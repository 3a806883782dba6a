use std::error::Error;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Broker {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub broker_host: String,
    pub mac: String,
    pub topic_prefix: String,
    pub heartbeat_interval_secs: u64,
    pub report_interval_secs: u64,
    pub need_ack: bool,
}

impl Device {
    pub fn up_topic(&self) -> String {
        format!("{}/{}/up", self.topic_prefix, self.mac)
    }

    pub fn down_topic(&self) -> String {
        format!("{}/{}/down", self.topic_prefix, self.mac)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs.max(1))
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval_secs.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub broker: Broker,
    pub device: Device,
}

impl Settings {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../",
            "configs/default.toml"
        )))?)
    }
}
