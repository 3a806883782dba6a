use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use rumqttd::local::{LinkRx, LinkTx};
use rumqttd::{Broker, Config, ConnectionSettings, Notification, RouterConfig, ServerSettings};
use tokio_util::sync::CancellationToken;

use crate::configs::Broker as BrokerSettings;
use crate::errors::{ServerError, TransportError};
use crate::services::ack::Publisher;
use crate::services::router::MessageRouter;

/// Embedded MQTT broker devices connect to.
pub struct MqttBroker {
    broker: Broker,
    settings: BrokerSettings,
}

impl MqttBroker {
    pub fn new(settings: &BrokerSettings) -> Result<Self, ServerError> {
        let listen = SocketAddr::from((settings.host.parse::<IpAddr>()?, settings.port));

        let broker = Broker::new(Config {
            id: 0,
            router: RouterConfig {
                max_connections: settings.max_connections,
                max_outgoing_packet_count: 200,
                max_segment_size: 104857600,
                max_segment_count: 10,
                custom_segment: None,
                initialized_filters: None,
                shared_subscriptions_strategy: Default::default(),
            },
            v4: Some(HashMap::from([(
                1.to_string(),
                ServerSettings {
                    name: "v4-1".to_string(),
                    listen,
                    tls: None,
                    next_connection_delay_ms: 1,
                    connections: ConnectionSettings {
                        connection_timeout_ms: 60000,
                        max_payload_size: settings.max_payload_size,
                        max_inflight_count: 100,
                        auth: None,
                        external_auth: None,
                        dynamic_filters: true,
                    },
                },
            )])),
            v5: None,
            ws: None,
            cluster: None,
            console: None,
            bridge: None,
            prometheus: None,
            metrics: None,
        });

        Ok(Self {
            broker,
            settings: settings.clone(),
        })
    }

    /// Opens an in-process link subscribed to `filter`.
    pub fn link(&self, filter: &str) -> Result<(LinkTx, LinkRx), ServerError> {
        let (mut link_tx, link_rx) = self.broker.link(&self.settings.client_id)?;
        link_tx.subscribe(filter)?;

        tracing::debug!("subscribe topic {}", filter);

        Ok((link_tx, link_rx))
    }

    /// Starts accepting device connections on a dedicated thread. The broker
    /// runs its own runtime and cannot be started from inside tokio. It has
    /// no shutdown hook, so the thread runs until the process exits.
    pub fn start(mut self) -> Result<thread::JoinHandle<()>, ServerError> {
        let address = format!("{}:{}", self.settings.host, self.settings.port);

        let handle = thread::Builder::new()
            .name("mqtt-broker".to_string())
            .spawn(move || {
                tracing::info!("MQTT broker listening on {}", address);
                if let Err(e) = self.broker.start() {
                    tracing::error!("MQTT broker stopped: {}", e);
                }
            })?;

        Ok(handle)
    }
}

/// Publishes through the broker's local link without waiting for the router.
pub struct LinkPublisher {
    link_tx: Mutex<LinkTx>,
}

impl LinkPublisher {
    pub fn new(link_tx: LinkTx) -> Self {
        Self {
            link_tx: Mutex::new(link_tx),
        }
    }
}

impl Publisher for LinkPublisher {
    fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), TransportError> {
        let mut link_tx = self.link_tx.lock().unwrap_or_else(PoisonError::into_inner);

        link_tx
            .try_publish(topic.to_string(), payload)
            .map(|_| ())
            .map_err(|e| TransportError::Rejected(e.to_string()))
    }
}

/// Feeds every publish forwarded on `link_rx` to the router until `cancel`
/// fires or the link closes.
pub async fn forward_publishes(mut link_rx: LinkRx, router: Arc<MessageRouter>, cancel: CancellationToken) {
    loop {
        let notification = tokio::select! {
            _ = cancel.cancelled() => break,
            notification = link_rx.next() => notification,
        };

        match notification {
            Ok(Some(Notification::Forward(forward))) => {
                let topic = String::from_utf8_lossy(&forward.publish.topic);
                router.handle_publish(&topic, &forward.publish.payload);
            }
            Ok(Some(v)) => tracing::trace!("{v:?}"),
            Ok(None) => continue,
            Err(e) => {
                tracing::error!("Broker link closed: {}", e);
                break;
            }
        }
    }

    tracing::debug!("Stopped forwarding broker publishes");
}
