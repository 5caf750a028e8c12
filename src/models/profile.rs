//! Author profile

use serde::{Deserialize, Serialize};

/// Public profile of a post author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique username (what `@mentions` refer to)
    pub username: String,
    /// Optional display name
    #[serde(default)]
    pub display_name: Option<String>,
    /// Avatar URL
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl Profile {
    /// Display name, falling back to the username
    pub fn display_label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.username)
    }

    /// Handle with the leading `@`
    pub fn handle(&self) -> String {
        format!("@{}", self.username)
    }
}
