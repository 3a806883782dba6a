use std::f64::consts::PI;

pub fn simulated_temperature(day_fraction: f64) -> f64 {
    let radians = day_fraction * 2.0 * PI;

    // Coolest just before dawn, warmest mid-afternoon
    ((radians - PI * 0.75).sin() * 3.0 + 22.0).clamp(18.0, 26.0)
}

pub fn simulated_humidity(day_fraction: f64) -> f64 {
    let radians = day_fraction * 2.0 * PI;

    if (0.3..=0.7).contains(&day_fraction) {
        (55.0 - radians.sin().max(0.0) * 10.0).round()
    } else {
        (radians.cos().max(0.0) * 10.0 + 50.0).round()
    }
}

pub fn simulated_co2(day_fraction: f64) -> f64 {
    const BASELINE_PPM: f64 = 420.0;
    const OCCUPIED_PEAK_PPM: f64 = 1100.0;

    // Occupied between 08:00 and 18:00
    const OCCUPIED_START: f64 = 8.0 / 24.0;
    const OCCUPIED_END: f64 = 18.0 / 24.0;

    if (OCCUPIED_START..=OCCUPIED_END).contains(&day_fraction) {
        let progress = (day_fraction - OCCUPIED_START) / (OCCUPIED_END - OCCUPIED_START);
        (BASELINE_PPM + (progress * PI).sin() * (OCCUPIED_PEAK_PPM - BASELINE_PPM)).round()
    } else {
        BASELINE_PPM
    }
}

/// PM2.5 follows CO2 loosely; PM1 and PM10 derive from it.
pub fn simulated_pm25(day_fraction: f64) -> f64 {
    (simulated_co2(day_fraction) / 60.0).round()
}

pub fn simulated_tvoc(day_fraction: f64) -> f64 {
    (simulated_co2(day_fraction) * 0.25).round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_range() {
        for step in 0..=96 {
            let value = simulated_temperature(step as f64 / 96.0);
            assert!((18.0..=26.0).contains(&value), "{value}");
        }
        assert!(simulated_temperature(0.6) > simulated_temperature(0.2));
    }

    #[test]
    fn test_humidity_range() {
        for step in 0..=96 {
            let value = simulated_humidity(step as f64 / 96.0);
            assert!((40.0..=60.0).contains(&value), "{value}");
        }
    }

    #[test]
    fn test_co2_peaks_when_occupied() {
        assert_eq!(simulated_co2(0.1), 420.0);
        assert_eq!(simulated_co2(0.95), 420.0);
        assert_eq!(simulated_co2(13.0 / 24.0), 1100.0);
        assert!(simulated_pm25(13.0 / 24.0) > simulated_pm25(0.1));
        assert!(simulated_tvoc(13.0 / 24.0) > simulated_tvoc(0.1));
    }
}
