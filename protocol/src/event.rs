use chrono::DateTime;
use chrono::Local;
use serde::Deserialize;
use serde::Serialize;

/// Event type identifiers for the subset of the protocol the timeline
/// renders.
pub mod event_type {
    pub const MESSAGE: &str = "m.room.message";
}

/// Delivery state of a locally originated event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SendState {
    Pending,
    Sent,
    Failed,
}

impl SendState {
    pub fn is_sent(self) -> bool {
        matches!(self, SendState::Sent)
    }
}

/// Display identity of a message sender.
///
/// Equality covers all three fields: a changed display name or avatar is a
/// different identity for caching purposes and forces re-resolution of any
/// derived renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct SenderIdentity {
    pub user_id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl SenderIdentity {
    /// Identity for a user with no known profile: the raw id doubles as the
    /// display name.
    pub fn from_user_id(user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        Self {
            display_name: user_id.clone(),
            user_id,
            avatar_url: None,
        }
    }
}

/// Immutable snapshot of one timeline event plus its send state and the
/// originating sender's identity at the time it was read.
///
/// The surrounding sequence is owned by the caller; consumers here only ever
/// read two or three adjacent events at a time.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TimelineEvent {
    pub event_id: String,
    pub event_type: String,
    /// Origin server timestamp, milliseconds since the Unix epoch.
    pub origin_server_ts: i64,
    pub content: serde_json::Value,
    pub send_state: SendState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<SenderIdentity>,
}

impl TimelineEvent {
    /// The event's timestamp in the local timezone. Out-of-range timestamps
    /// clamp to the epoch rather than failing.
    pub fn local_date_time(&self) -> DateTime<Local> {
        DateTime::from_timestamp_millis(self.origin_server_ts)
            .unwrap_or_default()
            .with_timezone(&Local)
    }

    pub fn is_message(&self) -> bool {
        self.event_type == event_type::MESSAGE
    }
}
