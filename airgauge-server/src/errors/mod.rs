pub mod ack;
pub mod api;
pub mod metrics;
pub mod server;
pub mod transport;

pub use ack::AckError;
pub use api::ApiError;
pub use metrics::MetricsError;
pub use server::ServerError;
pub use transport::TransportError;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MetricsError(e) => {
                tracing::error!("Metrics error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": {
                "code": status.as_u16(),
                "message": self.to_string()
            }
        }));

        (status, body).into_response()
    }
}
