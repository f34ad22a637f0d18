use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Change-feed envelope pushed to gallery subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event<T> {
    pub id: Uuid,
    pub source: String,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub data: T,
}

impl<T> Event<T> {
    pub fn new(source: impl Into<String>, event_type: impl Into<String>, data: T) -> Self {
        Self {
            id: Uuid::now_v7(),
            source: source.into(),
            event_type: event_type.into(),
            timestamp: Utc::now(),
            data,
        }
    }
}

/// Event type names, used as the SSE `event:` field.
pub mod event_types {
    pub const EMOJI_INSERTED: &str = "emoji.inserted";
    pub const LAG_WARNING: &str = "_warning";
}
