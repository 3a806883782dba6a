mod ack;
mod envelope;
mod error;

pub use ack::AckMessage;
pub use envelope::Envelope;
pub use error::ParseError;

use serde::{Deserialize, Serialize};

/// Message type code for real-time sensor reports.
pub const REAL_TIME_DATA: &str = "12";
/// Message type code for heartbeats.
pub const HEARTBEAT: &str = "13";
/// Message type code for historical (batched) sensor reports.
pub const HISTORY_DATA: &str = "17";
/// Message type code of the acknowledgment sent back to a device.
pub const ACKNOWLEDGE: &str = "18";

/// Classification of an inbound envelope by its type code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    /// Live readings, type `12`
    RealTime,
    /// Liveness signal without readings, type `13`
    Heartbeat,
    /// Buffered readings uploaded after the fact, type `17`
    History,
    /// Any other code, accepted but not processed
    Unrecognized(String),
}

impl MessageKind {
    pub fn from_code(code: &str) -> Self {
        match code {
            REAL_TIME_DATA => MessageKind::RealTime,
            HEARTBEAT => MessageKind::Heartbeat,
            HISTORY_DATA => MessageKind::History,
            other => MessageKind::Unrecognized(other.to_string()),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, MessageKind::Unrecognized(_))
    }

    pub fn carries_readings(&self) -> bool {
        matches!(self, MessageKind::RealTime | MessageKind::History)
    }
}
