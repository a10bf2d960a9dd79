use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Author {
    Client,
    Agency,
}

/// One chat line in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub from: Author,
    pub body: String,
    /// Display time, `HH:MM`.
    pub time: Option<String>,
}

impl Message {
    /// Outgoing agency message composed locally, before the server knows it.
    pub fn outgoing(conversation_id: impl Into<String>, body: impl Into<String>, at: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            conversation_id: conversation_id.into(),
            from: Author::Agency,
            body: body.into(),
            time: Some(at.format("%H:%M").to_string()),
        }
    }
}

/// Local `HH:MM` of an RFC 3339 timestamp; anything else is shown as sent.
pub fn display_time(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match DateTime::parse_from_rfc3339(raw) {
        Ok(at) => Some(at.with_timezone(&Local).format("%H:%M").to_string()),
        Err(_) => Some(raw.to_string()),
    }
}
