//! LLM conversation types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".into(), content: content.into() }
    }
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into() }
    }
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: "assistant".into(), content: content.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Question,
    Action,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedItem {
    pub kind: ItemKind,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("streaming error: {message}")]
    StreamError { message: String },
}

/// The system prompt instructing the model to emit only line-prefixed output.
pub const SYSTEM_PROMPT: &str = "You are a meeting assistant. Given a new fragment of \
transcript, reply with zero or more lines, each starting with exactly `QUESTION: ` for a \
question raised in the fragment, or `ACTION: ` for an action item mentioned in the fragment. \
If the fragment contains neither, reply with exactly `RIEN`. Never reply with anything else.";
