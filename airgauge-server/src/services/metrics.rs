use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use airgauge_api::{Channel, SensorReading};
use prometheus::{Encoder, GaugeVec, IntCounterVec, Opts, Registry, TextEncoder};

use crate::configs::Metrics;
use crate::errors::MetricsError;

/// Observations the core reports while processing device messages.
///
/// Implementations must be safe to call from concurrent publish events and
/// from the liveness sweep.
pub trait MetricsSink: Send + Sync {
    fn message_received(&self, kind: &str, topic: &str, device_id: &str) -> Result<(), MetricsError>;

    fn parse_error(&self, topic: &str) -> Result<(), MetricsError>;

    fn ack_sent(&self, topic: &str) -> Result<(), MetricsError>;

    fn ack_error(&self, topic: &str) -> Result<(), MetricsError>;

    /// Overwrites every sensor gauge of the device with the reading's values.
    fn set_readings(&self, device_id: &str, topic: &str, reading: &SensorReading) -> Result<(), MetricsError>;

    /// Zeroes every sensor gauge series ever written for the device.
    fn reset_readings(&self, device_id: &str) -> Result<(), MetricsError>;
}

const SENSOR_GAUGES: [(Channel, &str, &str); 9] = [
    (Channel::Temperature, "temperature_celsius", "Temperature in Celsius"),
    (Channel::Humidity, "humidity_percent", "Humidity in percent"),
    (Channel::Co2, "co2_ppm", "CO2 level in parts per million"),
    (Channel::Pm1, "pm1_ugm3", "PM1 particulate matter in ug/m3"),
    (Channel::Pm25, "pm25_ugm3", "PM2.5 particulate matter in ug/m3"),
    (Channel::Pm10, "pm10_ugm3", "PM10 particulate matter in ug/m3"),
    (Channel::Tvoc, "tvoc_ppb", "Total Volatile Organic Compounds in parts per billion"),
    (Channel::Radon, "radon_index", "Radon index"),
    (Channel::Battery, "battery_percent", "Battery level in percent"),
];

pub struct PrometheusSink {
    registry: Registry,
    topic_label: bool,
    gauges: HashMap<Channel, GaugeVec>,
    /// Topics each device's gauges were written under, when gauges carry `topic`
    gauge_topics: Mutex<HashMap<String, HashSet<String>>>,
    messages_received: IntCounterVec,
    parse_errors: IntCounterVec,
    acks_sent: IntCounterVec,
    ack_errors: IntCounterVec,
}

impl PrometheusSink {
    pub fn new(metrics: &Metrics) -> Result<Self, MetricsError> {
        let registry = Registry::new();
        let namespace = metrics.namespace.as_str();

        let gauge_labels: &[&str] = if metrics.topic_label {
            &["mac", "topic"]
        } else {
            &["mac"]
        };

        let mut gauges = HashMap::with_capacity(SENSOR_GAUGES.len());
        for (channel, name, help) in SENSOR_GAUGES {
            let gauge = GaugeVec::new(Opts::new(name, help).namespace(namespace), gauge_labels)?;
            registry.register(Box::new(gauge.clone()))?;
            gauges.insert(channel, gauge);
        }

        let messages_received = register_counter(
            &registry,
            namespace,
            "mqtt_messages_received_total",
            "Total number of MQTT messages received by message type",
            &["type", "topic", "mac"],
        )?;
        let parse_errors = register_counter(
            &registry,
            namespace,
            "mqtt_parse_errors_total",
            "Total number of message parsing errors",
            &["topic"],
        )?;
        let acks_sent = register_counter(
            &registry,
            namespace,
            "mqtt_acks_sent_total",
            "Total number of acknowledgments sent to devices",
            &["topic"],
        )?;
        let ack_errors = register_counter(
            &registry,
            namespace,
            "mqtt_ack_errors_total",
            "Total number of acknowledgment send errors",
            &["topic"],
        )?;

        Ok(Self {
            registry,
            topic_label: metrics.topic_label,
            gauges,
            gauge_topics: Mutex::new(HashMap::new()),
            messages_received,
            parse_errors,
            acks_sent,
            ack_errors,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Renders the registry in the Prometheus text exposition format.
    pub fn render(&self) -> Result<String, MetricsError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;

        Ok(String::from_utf8(buffer)?)
    }

    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }

    fn write_gauges(&self, labels: &[&str], reading: &SensorReading) -> Result<(), MetricsError> {
        for (channel, value) in reading.channels() {
            if let Some(gauge) = self.gauges.get(&channel) {
                gauge.get_metric_with_label_values(labels)?.set(value);
            }
        }

        Ok(())
    }

    fn gauge_labels<'a>(&self, device_id: &'a str, topic: &'a str) -> Vec<&'a str> {
        if self.topic_label {
            vec![device_id, topic]
        } else {
            vec![device_id]
        }
    }
}

fn register_counter(
    registry: &Registry,
    namespace: &str,
    name: &str,
    help: &str,
    labels: &[&str],
) -> Result<IntCounterVec, MetricsError> {
    let counter = IntCounterVec::new(Opts::new(name, help).namespace(namespace), labels)?;
    registry.register(Box::new(counter.clone()))?;

    Ok(counter)
}

impl MetricsSink for PrometheusSink {
    fn message_received(&self, kind: &str, topic: &str, device_id: &str) -> Result<(), MetricsError> {
        self.messages_received
            .get_metric_with_label_values(&[kind, topic, device_id])?
            .inc();
        Ok(())
    }

    fn parse_error(&self, topic: &str) -> Result<(), MetricsError> {
        self.parse_errors.get_metric_with_label_values(&[topic])?.inc();
        Ok(())
    }

    fn ack_sent(&self, topic: &str) -> Result<(), MetricsError> {
        self.acks_sent.get_metric_with_label_values(&[topic])?.inc();
        Ok(())
    }

    fn ack_error(&self, topic: &str) -> Result<(), MetricsError> {
        self.ack_errors.get_metric_with_label_values(&[topic])?.inc();
        Ok(())
    }

    fn set_readings(&self, device_id: &str, topic: &str, reading: &SensorReading) -> Result<(), MetricsError> {
        if self.topic_label {
            self.gauge_topics
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(device_id.to_string())
                .or_default()
                .insert(topic.to_string());
        }

        self.write_gauges(&self.gauge_labels(device_id, topic), reading)
    }

    fn reset_readings(&self, device_id: &str) -> Result<(), MetricsError> {
        let zero = SensorReading::default();

        if !self.topic_label {
            return self.write_gauges(&[device_id], &zero);
        }

        let topics = self
            .gauge_topics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(device_id)
            .unwrap_or_default();

        for topic in topics {
            self.write_gauges(&[device_id, topic.as_str()], &zero)?;
        }

        Ok(())
    }
}
