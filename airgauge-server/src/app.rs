use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::handles::*;
use crate::services::PrometheusSink;

pub fn create_app(sink: &Arc<PrometheusSink>) -> Router {
    Router::new()
        .route("/metrics", get(get_metrics))
        .route("/health", get(get_health))
        .with_state(MetricsState {
            sink: Arc::clone(sink),
        })
        .layer(TraceLayer::new_for_http())
}
