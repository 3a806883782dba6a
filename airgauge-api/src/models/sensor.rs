use serde::{Deserialize, Serialize};

/// A single channel value as reported by the device.
///
/// Devices wrap every channel in an object which may carry extra fields
/// (status, level, unit). Only `value` is kept.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    #[serde(default, deserialize_with = "crate::nullable::or_default")]
    pub value: f64,
}

impl Measurement {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl From<f64> for Measurement {
    fn from(value: f64) -> Self {
        Self { value }
    }
}

/// One sampled reading set. A channel absent from the payload reads as `0`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorReading {
    /// Device-reported sample time of this reading
    #[serde(deserialize_with = "crate::nullable::or_default")]
    pub timestamp: Measurement,
    /// Temperature in Celsius
    #[serde(deserialize_with = "crate::nullable::or_default")]
    pub temperature: Measurement,
    /// Relative humidity percentage
    #[serde(deserialize_with = "crate::nullable::or_default")]
    pub humidity: Measurement,
    /// CO2 in parts per million
    #[serde(deserialize_with = "crate::nullable::or_default")]
    pub co2: Measurement,
    /// PM1 in ug/m3
    #[serde(deserialize_with = "crate::nullable::or_default")]
    pub pm1: Measurement,
    /// PM2.5 in ug/m3
    #[serde(deserialize_with = "crate::nullable::or_default")]
    pub pm25: Measurement,
    /// PM10 in ug/m3
    #[serde(deserialize_with = "crate::nullable::or_default")]
    pub pm10: Measurement,
    /// Total volatile organic compounds in parts per billion
    #[serde(deserialize_with = "crate::nullable::or_default")]
    pub tvoc: Measurement,
    /// Radon index
    #[serde(deserialize_with = "crate::nullable::or_default")]
    pub radon: Measurement,
    /// Battery level percentage
    #[serde(deserialize_with = "crate::nullable::or_default")]
    pub battery: Measurement,
}

impl SensorReading {
    pub fn sample_time(&self) -> f64 {
        self.timestamp.value
    }

    /// Channel names paired with their values, in a stable order.
    pub fn channels(&self) -> [(Channel, f64); 9] {
        [
            (Channel::Temperature, self.temperature.value),
            (Channel::Humidity, self.humidity.value),
            (Channel::Co2, self.co2.value),
            (Channel::Pm1, self.pm1.value),
            (Channel::Pm25, self.pm25.value),
            (Channel::Pm10, self.pm10.value),
            (Channel::Tvoc, self.tvoc.value),
            (Channel::Radon, self.radon.value),
            (Channel::Battery, self.battery.value),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    Temperature,
    Humidity,
    Co2,
    Pm1,
    Pm25,
    Pm10,
    Tvoc,
    Radon,
    Battery,
}

impl Channel {
    pub const ALL: [Channel; 9] = [
        Channel::Temperature,
        Channel::Humidity,
        Channel::Co2,
        Channel::Pm1,
        Channel::Pm25,
        Channel::Pm10,
        Channel::Tvoc,
        Channel::Radon,
        Channel::Battery,
    ];
}
