mod settings;

pub use settings::{Broker, Liveness, Logger, Metrics, Server, Settings};
