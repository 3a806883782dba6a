pub mod message;
pub mod models;
mod nullable;

pub use message::{AckMessage, Envelope, MessageKind, ParseError};
pub use models::{Channel, Measurement, SensorReading};
