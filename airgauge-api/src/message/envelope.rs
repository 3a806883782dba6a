use serde::{Deserialize, Serialize};

use super::{MessageKind, ParseError};
use crate::models::SensorReading;

/// Top-level structure of one inbound device message.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Envelope {
    /// Device assigned sequence identifier
    #[serde(deserialize_with = "crate::nullable::or_default")]
    pub id: i64,
    /// Message type code
    #[serde(rename = "type", deserialize_with = "crate::nullable::or_default")]
    pub kind: String,
    /// Set to 1 when the device expects an acknowledgment
    #[serde(deserialize_with = "crate::nullable::or_default")]
    pub need_ack: i64,
    /// Device identity carried by data messages
    #[serde(deserialize_with = "crate::nullable::or_default")]
    pub mac: String,
    /// Device identity carried by heartbeat messages
    #[serde(deserialize_with = "crate::nullable::or_default")]
    pub wifi_mac: String,
    /// Device clock at send time
    #[serde(deserialize_with = "crate::nullable::or_default")]
    pub timestamp: i64,
    /// Sampled readings, oldest first as sent by the device
    #[serde(rename = "sensorData", deserialize_with = "crate::nullable::seq_or_default")]
    pub sensor_data: Vec<SensorReading>,
}

impl Envelope {
    pub fn parse(payload: &[u8]) -> Result<Self, ParseError> {
        Ok(serde_json::from_slice(payload)?)
    }

    pub fn message_kind(&self) -> MessageKind {
        MessageKind::from_code(&self.kind)
    }

    /// Heartbeats identify the device by `wifi_mac`, data messages by `mac`.
    pub fn device_id(&self) -> &str {
        if self.wifi_mac.is_empty() {
            &self.mac
        } else {
            &self.wifi_mac
        }
    }

    pub fn needs_ack(&self) -> bool {
        self.need_ack == 1
    }

    /// The reading with the greatest sample time. On equal sample times the
    /// earliest reading in the sequence wins.
    pub fn latest_reading(&self) -> Option<&SensorReading> {
        self.sensor_data.iter().reduce(|latest, reading| {
            if reading.sample_time() > latest.sample_time() {
                reading
            } else {
                latest
            }
        })
    }
}
