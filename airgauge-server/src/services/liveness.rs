use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::services::metrics::MetricsSink;

/// Missed heartbeats tolerated before a device is declared dead.
const DEAD_AFTER_HEARTBEATS: u32 = 3;
/// Sweeps per heartbeat interval.
const SWEEPS_PER_HEARTBEAT: u32 = 10;

/// Tracks when each device was last heard from and zeroes the metrics of
/// devices that fall silent.
pub struct LivenessTracker {
    /// Last time each device was heard from
    devices: Mutex<HashMap<String, Instant>>,
    heartbeat_interval: Duration,
    sink: Arc<dyn MetricsSink>,
}

impl LivenessTracker {
    pub fn new(heartbeat_interval: Duration, sink: Arc<dyn MetricsSink>) -> Self {
        Self {
            devices: Mutex::new(HashMap::new()),
            heartbeat_interval,
            sink,
        }
    }

    pub fn dead_threshold(&self) -> Duration {
        self.heartbeat_interval * DEAD_AFTER_HEARTBEATS
    }

    pub fn sweep_period(&self) -> Duration {
        (self.heartbeat_interval / SWEEPS_PER_HEARTBEAT).max(Duration::from_millis(1))
    }

    pub fn touch(&self, device_id: &str) {
        let now = Instant::now();
        let mut devices = self.lock();

        match devices.get_mut(device_id) {
            Some(last_seen) => *last_seen = now,
            None => {
                tracing::debug!(mac = device_id, "Tracking new device");
                devices.insert(device_id.to_string(), now);
            }
        }
    }

    pub fn last_seen(&self, device_id: &str) -> Option<Instant> {
        self.lock().get(device_id).copied()
    }

    pub fn tracked(&self) -> usize {
        self.lock().len()
    }

    /// Drops every device silent for longer than the dead threshold and
    /// resets its metrics. Returns the ids of the dropped devices.
    pub fn sweep(&self) -> Vec<String> {
        let now = Instant::now();
        let threshold = self.dead_threshold();
        let mut dead = Vec::new();

        let mut devices = self.lock();
        devices.retain(|device_id, last_seen| {
            if now.duration_since(*last_seen) <= threshold {
                return true;
            }

            tracing::info!(mac = %device_id, "Device is dead, resetting metrics");
            if let Err(e) = self.sink.reset_readings(device_id) {
                tracing::error!(mac = %device_id, "Failed to reset metrics: {}", e);
            }
            dead.push(device_id.clone());
            false
        });

        dead
    }

    /// Runs the periodic sweep until `cancel` fires.
    pub async fn run(self: Arc<Self>, cancel: CancellationToken) {
        let mut ticker = time::interval(self.sweep_period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("Stopping liveness sweep");
                    break;
                }
                _ = ticker.tick() => {
                    self.sweep();
                }
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Instant>> {
        self.devices.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
