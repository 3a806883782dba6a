use std::collections::HashMap;
use std::sync::Mutex;

use airgauge_api::SensorReading;

use crate::errors::{MetricsError, TransportError};
use crate::services::ack::Publisher;
use crate::services::metrics::MetricsSink;

#[derive(Default)]
struct Recorded {
    received: HashMap<(String, String, String), u64>,
    parse_errors: HashMap<String, u64>,
    acks_sent: HashMap<String, u64>,
    ack_errors: HashMap<String, u64>,
    readings: HashMap<String, SensorReading>,
    gauge_writes: usize,
}

/// In-memory sink keyed the same way as the Prometheus one.
#[derive(Default)]
pub struct RecordingSink {
    recorded: Mutex<Recorded>,
}

impl RecordingSink {
    pub fn received(&self, kind: &str, topic: &str, device_id: &str) -> u64 {
        let key = (kind.to_string(), topic.to_string(), device_id.to_string());
        self.recorded.lock().unwrap().received.get(&key).copied().unwrap_or(0)
    }

    pub fn parse_errors(&self, topic: &str) -> u64 {
        self.recorded.lock().unwrap().parse_errors.get(topic).copied().unwrap_or(0)
    }

    pub fn acks_sent(&self, topic: &str) -> u64 {
        self.recorded.lock().unwrap().acks_sent.get(topic).copied().unwrap_or(0)
    }

    pub fn ack_errors(&self, topic: &str) -> u64 {
        self.recorded.lock().unwrap().ack_errors.get(topic).copied().unwrap_or(0)
    }

    pub fn reading(&self, device_id: &str) -> Option<SensorReading> {
        self.recorded.lock().unwrap().readings.get(device_id).cloned()
    }

    pub fn gauge_writes(&self) -> usize {
        self.recorded.lock().unwrap().gauge_writes
    }
}

impl MetricsSink for RecordingSink {
    fn message_received(&self, kind: &str, topic: &str, device_id: &str) -> Result<(), MetricsError> {
        let key = (kind.to_string(), topic.to_string(), device_id.to_string());
        *self.recorded.lock().unwrap().received.entry(key).or_default() += 1;
        Ok(())
    }

    fn parse_error(&self, topic: &str) -> Result<(), MetricsError> {
        *self.recorded.lock().unwrap().parse_errors.entry(topic.to_string()).or_default() += 1;
        Ok(())
    }

    fn ack_sent(&self, topic: &str) -> Result<(), MetricsError> {
        *self.recorded.lock().unwrap().acks_sent.entry(topic.to_string()).or_default() += 1;
        Ok(())
    }

    fn ack_error(&self, topic: &str) -> Result<(), MetricsError> {
        *self.recorded.lock().unwrap().ack_errors.entry(topic.to_string()).or_default() += 1;
        Ok(())
    }

    fn set_readings(&self, device_id: &str, _topic: &str, reading: &SensorReading) -> Result<(), MetricsError> {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.readings.insert(device_id.to_string(), reading.clone());
        recorded.gauge_writes += 1;
        Ok(())
    }

    fn reset_readings(&self, device_id: &str) -> Result<(), MetricsError> {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.readings.insert(device_id.to_string(), SensorReading::default());
        recorded.gauge_writes += 1;
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    fail: bool,
    published: Mutex<Vec<(String, Vec<u8>)>>,
}

impl RecordingPublisher {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn published(&self) -> Vec<(String, Vec<u8>)> {
        self.published.lock().unwrap().clone()
    }
}

impl Publisher for RecordingPublisher {
    fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), TransportError> {
        if self.fail {
            return Err(TransportError::Disconnected);
        }

        self.published.lock().unwrap().push((topic.to_string(), payload));
        Ok(())
    }
}
