use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::quote::Quote;
use super::workspace::{Workspace, WorkspaceStore};

pub const DEFAULT_CHANNEL_LABEL: &str = "via WhatsApp";

/// A client conversation as shown in the inbox.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Conversation {
    pub id: String,
    pub name: String,
    pub workspace: Workspace,
    pub contact_id: Option<String>,
    pub last_message: Option<String>,
    pub unread_count: u32,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub channel_label: Option<String>,
    pub quotes: Vec<Quote>,
}

impl Conversation {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn has_unread(&self) -> bool {
        self.unread_count > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    Open,
    Archived,
}

impl ConversationStatus {
    pub fn as_keyword(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Archived => "archived",
        }
    }
}

/// Conversation row as listed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConversationSummary {
    pub id: String,
    pub contact_id: Option<String>,
    pub contact_name: Option<String>,
    pub last_message_preview: Option<String>,
    pub last_message_at: Option<String>,
    pub unread_count: Option<u32>,
    pub status: Option<ConversationStatus>,
    pub workspace: Option<Workspace>,
}

/// Combine the API listing with locally known conversations and the user's
/// workspace overrides.
///
/// The API decides which conversations exist and their order. Workspace
/// precedence: override, then server tag, then local tag, then inbox.
pub fn merge_conversations(
    remote: &[ConversationSummary],
    local: &[Conversation],
    store: &dyn WorkspaceStore,
) -> Vec<Conversation> {
    let local_by_id: HashMap<&str, &Conversation> =
        local.iter().map(|c| (c.id.as_str(), c)).collect();

    remote
        .iter()
        .map(|item| {
            let base = local_by_id.get(item.id.as_str()).copied();

            let name = item
                .contact_name
                .clone()
                .filter(|n| !n.is_empty())
                .or_else(|| base.map(|b| b.name.clone()).filter(|n| !n.is_empty()))
                .unwrap_or_else(|| "Sem nome".to_string());

            let workspace = store
                .get(&item.id)
                .or(item.workspace)
                .or(base.map(|b| b.workspace))
                .unwrap_or_default();

            Conversation {
                id: item.id.clone(),
                name,
                workspace,
                contact_id: item
                    .contact_id
                    .clone()
                    .or_else(|| base.and_then(|b| b.contact_id.clone())),
                last_message: item
                    .last_message_preview
                    .clone()
                    .or_else(|| base.and_then(|b| b.last_message.clone())),
                unread_count: item
                    .unread_count
                    .or(base.map(|b| b.unread_count))
                    .unwrap_or(0),
                avatar_url: base.and_then(|b| b.avatar_url.clone()),
                phone: base.and_then(|b| b.phone.clone()),
                channel_label: Some(
                    base.and_then(|b| b.channel_label.clone())
                        .unwrap_or_else(|| DEFAULT_CHANNEL_LABEL.to_string()),
                ),
                quotes: base.map(|b| b.quotes.clone()).unwrap_or_default(),
            }
        })
        .collect()
}

/// Retag one conversation and persist the choice. Returns whether the id
/// was found in `conversations`; the override is stored either way.
pub fn move_conversation_workspace(
    conversations: &mut [Conversation],
    conversation_id: &str,
    target: Workspace,
    store: &mut dyn WorkspaceStore,
) -> bool {
    log::info!(
        "Moving conversation {} to {}",
        conversation_id,
        target.as_keyword()
    );

    let mut found = false;
    for conversation in conversations.iter_mut().filter(|c| c.id == conversation_id) {
        conversation.workspace = target;
        found = true;
    }

    if let Err(e) = store.set(conversation_id, target) {
        log::warn!("Failed to persist workspace override: {}", e);
    }
    found
}

pub fn in_workspace(conversations: &[Conversation], workspace: Workspace) -> Vec<&Conversation> {
    conversations
        .iter()
        .filter(|c| c.workspace == workspace)
        .collect()
}

pub fn load_conversations(path: &Path) -> Vec<Conversation> {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => Vec::new(),
    }
}

pub fn save_conversations(path: &Path, conversations: &[Conversation]) {
    match serde_json::to_string_pretty(conversations) {
        Ok(json) => {
            if let Err(e) = std::fs::write(path, json) {
                log::error!("Failed to save conversations: {}", e);
            }
        }
        Err(e) => log::error!("Failed to serialize conversations: {}", e),
    }
}
