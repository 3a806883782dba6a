use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use airgauge_api::AckMessage;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use serde_json::{from_slice, to_vec};
use time::OffsetDateTime;
use tokio::time::{interval, sleep};

use crate::device::{heartbeat, report, sample_reading};
use crate::settings::Settings;

mod device;
pub mod settings;
mod simulate;

/// Connects one simulated device to the broker and publishes heartbeats and
/// real-time reports until Ctrl-C.
pub async fn run(settings: &Arc<Settings>) -> Result<(), Box<dyn Error>> {
    let device = &settings.device;

    let mut options = MqttOptions::new(
        format!("airgauge-mock-{}", device.mac),
        &device.broker_host,
        settings.broker.port,
    );
    options.set_keep_alive(Duration::from_secs(5));

    let (client, event_loop) = AsyncClient::new(options, 10);

    let down_topic = device.down_topic();
    client.subscribe(&down_topic, QoS::AtLeastOnce).await?;
    tracing::debug!("subscribe topic {}", down_topic);

    tokio::spawn(poll_events(event_loop));

    let up_topic = device.up_topic();
    let mut heartbeat_interval = interval(device.heartbeat_interval());
    let mut report_interval = interval(device.report_interval());
    let mut rng = rand::rng();
    let mut sequence: u64 = 0;

    tracing::info!("Simulating device {} on {}", device.mac, up_topic);

    loop {
        let envelope = tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = heartbeat_interval.tick() => heartbeat(&device.mac, sequence as i64, OffsetDateTime::now_utc()),
            _ = report_interval.tick() => {
                let now = OffsetDateTime::now_utc();
                report(&device.mac, sequence as i64, device.need_ack, sample_reading(now, sequence, &mut rng), now)
            }
        };

        tracing::debug!("Send: type {} id {}", envelope.kind, envelope.id);
        client
            .publish(&up_topic, QoS::AtLeastOnce, false, to_vec(&envelope)?)
            .await?;

        sequence += 1;
    }

    client.disconnect().await?;
    tracing::info!("Simulator stopped");

    Ok(())
}

async fn poll_events(mut event_loop: EventLoop) {
    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::Publish(publish))) => match from_slice::<AckMessage>(&publish.payload) {
                Ok(ack) => tracing::info!("Receive ack for message {} (code {})", ack.ack_id, ack.code),
                Err(e) => tracing::warn!("Unexpected payload on {}: {}", publish.topic, e),
            },
            Ok(_) => {}
            Err(e) => {
                tracing::error!("Connection error: {}", e);
                sleep(Duration::from_secs(1)).await;
            }
        }
    }
}
