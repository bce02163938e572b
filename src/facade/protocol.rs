//! Wire protocol for the streaming server facade (C8).

use crate::segmenter::Sentence;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum InboundMessage {
    #[serde(rename = "config")]
    Config { #[serde(rename = "sampleRate")] sample_rate: u32 },
    #[serde(rename = "stop")]
    Stop,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum OutboundMessage {
    #[serde(rename = "transcript")]
    Transcript {
        sentences: Vec<WireSentence>,
        #[serde(rename = "fullText")]
        full_text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        questions: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        actions: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(rename = "final")]
        is_final: Option<bool>,
    },
}

#[derive(Debug, Serialize)]
pub struct WireSentence {
    pub start: String,
    pub end: String,
    pub segment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
}

impl From<&Sentence> for WireSentence {
    fn from(s: &Sentence) -> Self {
        Self {
            start: format!("{:.2}", s.start_s),
            end: format!("{:.2}", s.end_s),
            segment: s.text.clone(),
            speaker: s.speaker.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_ready: bool,
}
