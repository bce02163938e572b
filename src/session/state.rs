//! Session state (C7): the accumulated transcript, questions, and actions for
//! one live session, plus the snapshot shape pushed to clients.

use crate::segmenter::Sentence;
use serde::Serialize;

/// Owned exclusively by the orchestrating task; no worker touches this directly.
#[derive(Debug, Default)]
pub struct SessionState {
    pub sentences: Vec<Sentence>,
    pub full_text: String,
    pub questions: Vec<String>,
    pub actions: Vec<String>,
    pub last_sent_idx: usize,
    pub llm_url: String,
}

impl SessionState {
    pub fn new(llm_url: impl Into<String>) -> Self {
        Self { llm_url: llm_url.into(), ..Default::default() }
    }

    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.full_text.is_empty() {
            self.full_text.push(' ');
        }
        self.full_text.push_str(text);
    }

    pub fn push_question(&mut self, text: String) {
        if !self.questions.contains(&text) {
            self.questions.push(text);
        }
    }

    pub fn push_action(&mut self, text: String) {
        if !self.actions.contains(&text) {
            self.actions.push(text);
        }
    }

    /// The sentences not yet sent to the LLM, joined into one fragment.
    pub fn pending_fragment(&self) -> Option<String> {
        let new_sentences = &self.sentences[self.last_sent_idx..];
        if new_sentences.is_empty() {
            return None;
        }
        Some(new_sentences.iter().map(|s| s.text.as_str()).collect::<Vec<_>>().join(" "))
    }

    pub fn mark_sent(&mut self) {
        self.last_sent_idx = self.sentences.len();
    }

    pub fn snapshot(&self, is_final: bool) -> SessionSnapshot {
        SessionSnapshot {
            sentences: self.sentences.clone(),
            full_text: self.full_text.clone(),
            questions: self.questions.clone(),
            actions: self.actions.clone(),
            is_final,
        }
    }
}

/// Everything pushed to a client at one point in time.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub sentences: Vec<Sentence>,
    pub full_text: String,
    pub questions: Vec<String>,
    pub actions: Vec<String>,
    pub is_final: bool,
}
