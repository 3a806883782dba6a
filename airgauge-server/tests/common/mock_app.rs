use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use airgauge_server::Pipeline;
use airgauge_server::app::create_app;
use airgauge_server::configs::Settings;
use airgauge_server::errors::TransportError;
use airgauge_server::services::Publisher;

const DEFAULT: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../configs/default.toml"));

#[derive(Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<(String, Vec<u8>)>>,
}

impl RecordingPublisher {
    pub fn published(&self) -> Vec<(String, Vec<u8>)> {
        self.published.lock().unwrap().clone()
    }
}

impl Publisher for RecordingPublisher {
    fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), TransportError> {
        self.published.lock().unwrap().push((topic.to_string(), payload));
        Ok(())
    }
}

pub struct MockApp {
    pub pipeline: Pipeline,
    pub publisher: Arc<RecordingPublisher>,
    pub router: Router,
}

impl MockApp {
    pub fn new() -> Self {
        Self::with_settings(test_settings())
    }

    pub fn with_settings(settings: Settings) -> Self {
        let publisher = Arc::new(RecordingPublisher::default());
        let pipeline = Pipeline::new(&settings, publisher.clone()).unwrap();
        let router = create_app(&pipeline.sink);

        Self {
            pipeline,
            publisher,
            router,
        }
    }

    pub fn publish(&self, topic: &str, payload: &str) {
        self.pipeline.router.handle_publish(topic, payload.as_bytes());
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    pub async fn metrics(&self) -> String {
        let (status, body) = self.get("/metrics").await;
        assert_eq!(status, StatusCode::OK);
        body
    }
}

pub fn test_settings() -> Settings {
    Settings::from_toml(DEFAULT).unwrap()
}

/// Value of the sample `name{...}` whose labels include every `labels` pair.
pub fn sample_value(body: &str, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
    body.lines()
        .filter(|line| line.starts_with(&format!("{name}{{")))
        .find(|line| {
            labels
                .iter()
                .all(|(key, value)| line.contains(&format!("{key}=\"{value}\"")))
        })
        .and_then(|line| line.rsplit(' ').next())
        .and_then(|value| value.parse().ok())
}
