//! OpenAI-compatible streaming chat client used to talk to a local LLM server
//! (e.g. LM Studio). Mirrors the request/stream shape of an OpenAI chat
//! completion endpoint closely enough to work against any compatible server.

use crate::llm::types::{ChatTurn, LlmError};
use futures_util::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Serialize)]
struct ChatRequestBody<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
}

#[derive(Deserialize)]
struct StreamChunk {
    choices: Option<Vec<StreamChoice>>,
}

#[derive(Deserialize)]
struct StreamChoice {
    delta: Option<StreamDelta>,
}

#[derive(Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

pub struct LlmClient {
    http: Client,
    base_url: String,
    model_id: String,
}

impl LlmClient {
    /// Connects to `base_url` and resolves the first available model ID,
    /// falling back to `"local-model"` if the server reports none.
    pub async fn connect(base_url: &str) -> Result<Self, LlmError> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| LlmError::ConnectionFailed { message: e.to_string() })?;

        let url = format!("{}/models", base_url.trim_end_matches('/'));
        let model_id = match http.get(&url).send().await {
            Ok(res) => match res.json::<ModelList>().await {
                Ok(list) => list.data.into_iter().next().map(|m| m.id).unwrap_or_else(|| "local-model".into()),
                Err(_) => "local-model".into(),
            },
            Err(_) => "local-model".into(),
        };

        Ok(Self { http, base_url: base_url.to_string(), model_id })
    }

    /// Streams a chat completion over `history`, invoking `on_token` for each
    /// content delta as it arrives. Returns the concatenated full response.
    /// Checked between tokens, `stop` aborts the in-flight completion and
    /// returns whatever was accumulated so far.
    pub async fn stream_chat<F>(
        &self,
        history: &[ChatTurn],
        stop: &AtomicBool,
        mut on_token: F,
    ) -> Result<String, LlmError>
    where
        F: FnMut(&str),
    {
        let body = ChatRequestBody {
            model: &self.model_id,
            messages: history,
            temperature: 0.1,
            max_tokens: 512,
            stream: true,
        };

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let res = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ConnectionFailed { message: e.to_string() })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(LlmError::StreamError { message: format!("{}: {}", status, text) });
        }

        let mut full_response = String::new();
        let mut buffer = String::new();
        let mut stream = res.bytes_stream();

        while let Some(chunk) = stream.next().await {
            if stop.load(Ordering::Relaxed) {
                break;
            }
            let chunk = chunk.map_err(|e| LlmError::StreamError { message: e.to_string() })?;
            if let Ok(s) = std::str::from_utf8(&chunk) {
                buffer.push_str(s);
            }
            while let Some(line_end) = buffer.find('\n') {
                let line = buffer[..line_end].trim().to_string();
                buffer = buffer[line_end + 1..].to_string();
                let data = line.strip_prefix("data: ").unwrap_or("");
                if data.is_empty() || data == "[DONE]" {
                    continue;
                }
                let parsed: StreamChunk = match serde_json::from_str(data) {
                    Ok(c) => c,
                    Err(_) => continue,
                };
                let Some(choices) = parsed.choices else { continue };
                let Some(choice) = choices.into_iter().next() else { continue };
                let Some(delta) = choice.delta else { continue };
                if let Some(token) = delta.content {
                    if !token.is_empty() {
                        full_response.push_str(&token);
                        on_token(&token);
                    }
                }
            }
        }

        Ok(full_response)
    }
}
