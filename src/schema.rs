use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A piece of retrieved text and where it came from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// The document's content
    pub page_content: String,

    /// Metadata associated with the document (source path, page number, ...)
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Document {
    /// Create a new document with the given content
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: HashMap::new(),
        }
    }

    /// Add a metadata entry to the document
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The first `max_chars` characters of the content, with `...` appended
    pub fn snippet(&self, max_chars: usize) -> String {
        let mut snippet: String = self.page_content.chars().take(max_chars).collect();
        snippet.push_str("...");
        snippet
    }
}

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A chat message, containing content and a role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// The message role
    pub role: MessageRole,

    /// The message content
    pub content: String,

    /// Optional ID for the message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Message {
    /// Create a new message
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            id: Some(Uuid::new_v4().to_string()),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}
