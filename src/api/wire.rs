//! JSON records exchanged with the CRM API and their conversion into the
//! crate's own types. Field names drifted between API versions, so the
//! adapters accept every known spelling.

use serde::{Deserialize, Serialize};

use crate::core::contact::Contact;
use crate::core::conversation::ConversationSummary;
use crate::core::message::{Author, Message, display_time};
use crate::core::task::{Task, TaskStatus};

#[derive(Debug, Clone, Deserialize)]
pub struct Items<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationPage {
    #[serde(default)]
    pub items: Vec<ConversationSummary>,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total: u32,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteTask {
    pub id: String,
    pub conversation_id: Option<String>,
    #[serde(alias = "text")]
    pub title: Option<String>,
    #[serde(alias = "date")]
    pub due_date: Option<String>,
    pub status: Option<String>,
    pub time: Option<String>,
    pub created_by: Option<String>,
    pub created_at: Option<String>,
}

impl From<RemoteTask> for Task {
    fn from(remote: RemoteTask) -> Self {
        let time = remote
            .time
            .filter(|t| !t.trim().is_empty())
            .or_else(|| remote.due_date.as_deref().and_then(clock_suffix));
        Task {
            id: remote.id,
            date: remote.due_date.filter(|d| !d.trim().is_empty()),
            time,
            text: remote.title.unwrap_or_default(),
            conversation_id: remote.conversation_id.filter(|c| !c.is_empty()),
            status: TaskStatus::from_keyword(remote.status.as_deref().unwrap_or("")),
        }
    }
}

/// `HH:MM` from a `YYYY-MM-DDTHH:MM...` timestamp.
fn clock_suffix(raw: &str) -> Option<String> {
    let rest = raw.get(10..)?.strip_prefix('T')?;
    let clock = rest.get(..5)?;
    let bytes = clock.as_bytes();
    let well_formed = bytes[2] == b':'
        && bytes[..2].iter().chain(&bytes[3..]).all(u8::is_ascii_digit);
    well_formed.then(|| clock.to_string())
}

/// Body of `POST /api/tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub conversation_id: String,
    pub title: String,
    pub due_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate<'a> {
    pub status: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteMessage {
    pub id: String,
    #[serde(default)]
    pub author_type: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub sent_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesResponse {
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub items: Vec<RemoteMessage>,
}

impl RemoteMessage {
    pub fn into_message(self, conversation_id: &str) -> Message {
        let from = if self.author_type == "user" {
            Author::Agency
        } else {
            Author::Client
        };
        Message {
            id: self.id,
            conversation_id: conversation_id.to_string(),
            from,
            body: self.body.unwrap_or_default(),
            time: self.sent_at.as_deref().and_then(display_time),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RemoteContact {
    pub id: Option<String>,
    pub name: Option<String>,
    pub nome: Option<String>,
    pub phone: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "avatarUrl")]
    pub avatar_url_camel: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(rename = "channelLabel")]
    pub channel_label_camel: Option<String>,
    pub channel_label: Option<String>,
    pub tags: Vec<String>,
}

impl RemoteContact {
    /// `requested_id` stands in when the payload omits its own id.
    pub fn into_contact(self, requested_id: &str) -> Contact {
        Contact {
            id: self.id.unwrap_or_else(|| requested_id.to_string()),
            name: self
                .name
                .or(self.nome)
                .unwrap_or_else(|| "Contato".to_string()),
            phone: self.phone.or(self.telefone),
            email: self.email,
            avatar_url: self.avatar_url_camel.or(self.avatar_url),
            channel_label: self.channel_label_camel.or(self.channel_label),
            tags: self.tags,
        }
    }
}
