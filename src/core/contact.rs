use serde::{Deserialize, Serialize};

/// Contact details shown in the side panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub channel_label: Option<String>,
    pub tags: Vec<String>,
}

impl Contact {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phone: None,
            email: None,
            avatar_url: None,
            channel_label: None,
            tags: Vec::new(),
        }
    }

    /// Up to two initials for an avatar placeholder.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_from_name() {
        assert_eq!(Contact::new("1", "joão silva").initials(), "JS");
        assert_eq!(Contact::new("2", "Maria").initials(), "M");
        assert_eq!(Contact::new("3", "").initials(), "");
    }
}
