use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse bucket a conversation is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Workspace {
    #[default]
    #[serde(rename = "inbox")]
    Inbox,
    /// Secondary holding area for closed or parked conversations.
    #[serde(rename = "fantasma")]
    Holding,
}

impl Workspace {
    pub fn as_keyword(&self) -> &'static str {
        match self {
            Self::Inbox => "inbox",
            Self::Holding => "fantasma",
        }
    }

    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "inbox" => Some(Self::Inbox),
            "fantasma" => Some(Self::Holding),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write workspace overrides to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize workspace overrides: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Per-conversation workspace overrides chosen by the user.
pub trait WorkspaceStore {
    fn get(&self, conversation_id: &str) -> Option<Workspace>;
    fn set(&mut self, conversation_id: &str, workspace: Workspace) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryWorkspaceStore {
    overrides: HashMap<String, Workspace>,
}

impl MemoryWorkspaceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorkspaceStore for MemoryWorkspaceStore {
    fn get(&self, conversation_id: &str) -> Option<Workspace> {
        self.overrides.get(conversation_id).copied()
    }

    fn set(&mut self, conversation_id: &str, workspace: Workspace) -> Result<(), StoreError> {
        self.overrides.insert(conversation_id.to_string(), workspace);
        Ok(())
    }
}

/// Overrides kept in a JSON object file, rewritten on every `set`.
#[derive(Debug, Clone)]
pub struct JsonWorkspaceStore {
    path: PathBuf,
    overrides: HashMap<String, Workspace>,
}

impl JsonWorkspaceStore {
    /// Load overrides from `path`. A missing or corrupt file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let overrides = load_overrides(&path);
        Self { path, overrides }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    fn save(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.overrides)?;
        std::fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        log::debug!("Saved {} workspace override(s)", self.overrides.len());
        Ok(())
    }
}

impl WorkspaceStore for JsonWorkspaceStore {
    fn get(&self, conversation_id: &str) -> Option<Workspace> {
        self.overrides.get(conversation_id).copied()
    }

    fn set(&mut self, conversation_id: &str, workspace: Workspace) -> Result<(), StoreError> {
        self.overrides.insert(conversation_id.to_string(), workspace);
        self.save()
    }
}

fn load_overrides(path: &Path) -> HashMap<String, Workspace> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
        Err(e) => {
            log::warn!("Failed to read workspace overrides {}: {}", path.display(), e);
            return HashMap::new();
        }
    };
    match serde_json::from_str(&content) {
        Ok(map) => map,
        Err(e) => {
            log::warn!("Ignoring corrupt workspace overrides {}: {}", path.display(), e);
            HashMap::new()
        }
    }
}
