use super::role::Role;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single chat turn. Fields other than `role` and `content` (e.g. `name`)
/// are kept in `extra` and forwarded unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    pub fn new<S: Into<String>>(role: Role, content: S) -> Self {
        Message {
            role,
            content: content.into(),
            extra: Map::new(),
        }
    }

    pub fn system<S: Into<String>>(content: S) -> Self {
        Message::new(Role::System, content)
    }

    pub fn user<S: Into<String>>(content: S) -> Self {
        Message::new(Role::User, content)
    }

    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Message::new(Role::Assistant, content)
    }
}

/// Inbound chat completion body.
///
/// Only `messages` is interpreted; everything else (model, temperature, stream, ...)
/// is collected into `extra` and forwarded to the completion backend unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        ChatRequest {
            messages,
            extra: Map::new(),
        }
    }

    /// Content of the most recent user message, if any
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|message| message.role == Role::User)
            .map(|message| message.content.as_str())
    }
}
