//! Display-layer chat message.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single line of the conversation as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }

    pub fn is_from_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Bot,
    User,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::Bot => f.write_str("bot"),
            Sender::User => f.write_str("user"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_serializes_lowercase() {
        let json = serde_json::to_value(Message::bot("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"sender": "bot", "text": "hi"}));

        let msg: Message = serde_json::from_str(r#"{"sender":"user","text":"hello"}"#).unwrap();
        assert_eq!(msg, Message::user("hello"));
        assert!(!msg.is_from_bot());
    }
}
