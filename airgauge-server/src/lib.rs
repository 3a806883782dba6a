use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::app::create_app;
use crate::configs::Settings;
use crate::errors::ServerError;
use crate::services::*;

pub mod app;
pub mod configs;
pub mod errors;
pub mod handles;
pub mod services;

/// Core message pipeline shared by the broker bridge and the HTTP app.
pub struct Pipeline {
    pub sink: Arc<PrometheusSink>,
    pub liveness: Arc<LivenessTracker>,
    pub router: Arc<MessageRouter>,
}

impl Pipeline {
    pub fn new(settings: &Settings, publisher: Arc<dyn Publisher>) -> Result<Self, ServerError> {
        let sink = Arc::new(PrometheusSink::new(&settings.metrics)?);
        let liveness = Arc::new(LivenessTracker::new(
            settings.liveness.heartbeat_interval(),
            sink.clone(),
        ));
        let acks = AckSender::new(publisher, sink.clone());
        let router = Arc::new(MessageRouter::new(liveness.clone(), sink.clone(), acks));

        Ok(Self { sink, liveness, router })
    }
}

pub async fn run(settings: &Arc<Settings>) -> Result<(), ServerError> {
    let broker = MqttBroker::new(&settings.broker)?;
    let (link_tx, link_rx) = broker.link(&settings.broker.topic)?;
    let pipeline = Pipeline::new(settings, Arc::new(LinkPublisher::new(link_tx)))?;

    let broker_thread = broker.start()?;

    let cancel = CancellationToken::new();
    let bridge = tokio::spawn(forward_publishes(link_rx, pipeline.router.clone(), cancel.clone()));
    let sweep = tokio::spawn(pipeline.liveness.clone().run(cancel.clone()));

    let app = create_app(&pipeline.sink);

    let ip_addr = settings.server.host.parse::<IpAddr>()?;

    let address = SocketAddr::from((ip_addr, settings.server.port));

    let listener = TcpListener::bind(&address).await?;

    tracing::info!("listening on {:?}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await?;

    cancel.cancel();
    let (bridge, sweep) = tokio::join!(bridge, sweep);
    if let Err(e) = bridge {
        tracing::error!("Broker bridge task failed: {}", e);
    }
    if let Err(e) = sweep {
        tracing::error!("Liveness sweep task failed: {}", e);
    }

    // rumqttd has no stop hook, the broker thread ends with the process
    if broker_thread.is_finished() {
        tracing::warn!("MQTT broker thread exited before shutdown");
    }

    tracing::info!("Shutdown");

    Ok(())
}

async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
        _ = cancel.cancelled() => {},
    }

    tracing::info!("Stopping application");
    cancel.cancel();
}
