use airgauge_api::message::{HEARTBEAT, REAL_TIME_DATA};
use airgauge_api::{Envelope, Measurement, SensorReading};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use time::OffsetDateTime;

use crate::simulate::{simulated_co2, simulated_humidity, simulated_pm25, simulated_temperature, simulated_tvoc};

/// Fraction of the UTC day elapsed at `now`, in `[0, 1)`.
pub fn day_fraction(now: OffsetDateTime) -> f64 {
    let (hour, minute, second) = now.to_hms();
    let seconds = hour as u32 * 3600 + minute as u32 * 60 + second as u32;

    seconds as f64 / 86400.0
}

pub fn heartbeat(mac: &str, id: i64, now: OffsetDateTime) -> Envelope {
    Envelope {
        id,
        kind: HEARTBEAT.to_string(),
        wifi_mac: mac.to_string(),
        timestamp: now.unix_timestamp(),
        ..Default::default()
    }
}

pub fn report(mac: &str, id: i64, need_ack: bool, reading: SensorReading, now: OffsetDateTime) -> Envelope {
    Envelope {
        id,
        kind: REAL_TIME_DATA.to_string(),
        need_ack: need_ack as i64,
        mac: mac.to_string(),
        timestamp: now.unix_timestamp(),
        sensor_data: vec![reading],
        ..Default::default()
    }
}

/// Samples one reading for `now` with measurement noise. The battery drains
/// one percent every hundred reports.
pub fn sample_reading<R: Rng>(now: OffsetDateTime, sequence: u64, rng: &mut R) -> SensorReading {
    let fraction = day_fraction(now);
    let noise = |rng: &mut R, std_dev: f64| {
        Normal::new(0.0, std_dev).map(|normal| normal.sample(rng)).unwrap_or(0.0)
    };

    let pm25 = (simulated_pm25(fraction) + noise(rng, 1.0)).max(0.0).round();

    SensorReading {
        timestamp: Measurement::new(now.unix_timestamp() as f64),
        temperature: Measurement::new(((simulated_temperature(fraction) + noise(rng, 0.2)) * 10.0).round() / 10.0),
        humidity: Measurement::new((simulated_humidity(fraction) + noise(rng, 0.5)).clamp(0.0, 100.0).round()),
        co2: Measurement::new((simulated_co2(fraction) + noise(rng, 15.0)).max(400.0).round()),
        pm1: Measurement::new((pm25 * 0.7).round()),
        pm25: Measurement::new(pm25),
        pm10: Measurement::new((pm25 * 1.3).round()),
        tvoc: Measurement::new((simulated_tvoc(fraction) + noise(rng, 5.0)).max(0.0).round()),
        radon: Measurement::new(rng.random_range(1..=3) as f64),
        battery: Measurement::new(100u64.saturating_sub(sequence / 100) as f64),
    }
}

#[cfg(test)]
mod tests {
    use airgauge_api::MessageKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use time::macros::datetime;

    use super::*;

    #[test]
    fn test_day_fraction() {
        assert_eq!(day_fraction(datetime!(2024-05-01 00:00 UTC)), 0.0);
        assert_eq!(day_fraction(datetime!(2024-05-01 12:00 UTC)), 0.5);
        assert_eq!(day_fraction(datetime!(2024-05-01 18:00 UTC)), 0.75);
    }

    #[test]
    fn test_heartbeat_wire_shape() {
        let now = datetime!(2024-05-01 12:00 UTC);
        let payload = serde_json::to_vec(&heartbeat("AABBCC", 7, now)).unwrap();

        let envelope = Envelope::parse(&payload).unwrap();
        assert_eq!(envelope.message_kind(), MessageKind::Heartbeat);
        assert_eq!(envelope.device_id(), "AABBCC");
        assert_eq!(envelope.timestamp, now.unix_timestamp());
        assert!(!envelope.needs_ack());
        assert!(envelope.sensor_data.is_empty());
    }

    #[test]
    fn test_report_wire_shape() {
        let now = datetime!(2024-05-01 13:00 UTC);
        let mut rng = StdRng::seed_from_u64(1);
        let reading = sample_reading(now, 0, &mut rng);
        let payload = serde_json::to_vec(&report("AABBCC", 8, true, reading.clone(), now)).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(value["type"], "12");
        assert_eq!(value["need_ack"], 1);
        assert_eq!(value["sensorData"][0]["temperature"]["value"], reading.temperature.value);

        let envelope = Envelope::parse(&payload).unwrap();
        assert_eq!(envelope.device_id(), "AABBCC");
        assert!(envelope.needs_ack());
        assert_eq!(envelope.latest_reading(), Some(&reading));
    }

    #[test]
    fn test_sample_reading_is_plausible() {
        let mut rng = StdRng::seed_from_u64(42);

        for hour in 0..24u8 {
            let now = datetime!(2024-05-01 00:00 UTC).replace_hour(hour).unwrap();
            let reading = sample_reading(now, 250, &mut rng);

            assert!((15.0..=30.0).contains(&reading.temperature.value));
            assert!((0.0..=100.0).contains(&reading.humidity.value));
            assert!(reading.co2.value >= 400.0);
            assert!(reading.pm1.value <= reading.pm25.value);
            assert!(reading.pm25.value <= reading.pm10.value);
            assert!((1.0..=3.0).contains(&reading.radon.value));
            assert_eq!(reading.battery.value, 98.0);
        }
    }
}
