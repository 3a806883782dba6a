use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use crate::errors::ApiError;
use crate::services::PrometheusSink;

#[derive(Clone)]
pub struct MetricsState {
    pub sink: Arc<PrometheusSink>,
}

pub async fn get_metrics(State(state): State<MetricsState>) -> Result<impl IntoResponse, ApiError> {
    let body = state.sink.render()?;

    Ok(([(header::CONTENT_TYPE, state.sink.content_type())], body))
}
