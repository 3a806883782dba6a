use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::ACKNOWLEDGE;

/// Reply published to the device's `/down` topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckMessage {
    /// Always `18`
    #[serde(rename = "type")]
    pub kind: String,
    /// Echo of the acknowledged envelope id
    pub ack_id: i64,
    /// Status code, 0 for success
    pub code: i32,
    /// Server clock at send time, unix seconds
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

impl AckMessage {
    pub fn success(ack_id: i64) -> Self {
        Self::success_at(ack_id, OffsetDateTime::now_utc())
    }

    pub fn success_at(ack_id: i64, at: OffsetDateTime) -> Self {
        Self {
            kind: ACKNOWLEDGE.to_string(),
            ack_id,
            code: 0,
            timestamp: at.unix_timestamp(),
            desc: None,
        }
    }
}
