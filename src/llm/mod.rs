//! LLM Conversation Worker module (C6): streams transcript fragments through
//! a persistent chat session against an OpenAI-compatible local LLM server,
//! extracting questions and action items as they are said.

pub mod client;
pub mod types;
pub mod worker;

pub use client::LlmClient;
pub use types::*;
