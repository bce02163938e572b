//! LLM Conversation Worker (C6): maintains one persistent chat history per
//! session and streams each new transcript fragment through it, emitting
//! questions and action items as they are parsed out of the model's reply.
//!
//! Runs on a dedicated OS thread carrying its own single-threaded Tokio
//! runtime, mirroring the blocking `llm_worker` thread it is grounded on —
//! the rest of the pipeline uses `std::thread::spawn` + `std::sync::mpsc` for
//! the same reason the ASR worker does: the unit of work here is a whole
//! streamed completion, not a short-lived async task worth cooperatively
//! scheduling on the shared runtime.

use crate::llm::client::LlmClient;
use crate::llm::types::{ChatTurn, ExtractedItem, ItemKind, SYSTEM_PROMPT};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{info, warn};

/// One fragment of newly-completed transcript, or a poison value signalling
/// end-of-session.
pub type LlmTask = Option<String>;

/// Spawns the worker thread. The caller is responsible for publishing the
/// poison value on `task_tx` and joining with a bound once sending it. `stop`
/// is checked between streamed tokens so a mid-stream completion can be
/// aborted without waiting for the HTTP client's own timeout.
pub fn spawn(
    base_url: String,
    task_rx: Receiver<LlmTask>,
    result_tx: Sender<ExtractedItem>,
    stop: Arc<AtomicBool>,
) -> JoinHandle<()> {
    std::thread::spawn(move || run(base_url, task_rx, result_tx, stop))
}

fn run(base_url: String, task_rx: Receiver<LlmTask>, result_tx: Sender<ExtractedItem>, stop: Arc<AtomicBool>) {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            warn!(error = %e, "failed to start LLM worker runtime");
            return;
        }
    };

    let mut history = vec![ChatTurn::system(SYSTEM_PROMPT)];
    let mut client: Option<LlmClient> = None;

    while let Ok(task) = task_rx.recv() {
        let fragment = match task {
            None => break,
            Some(f) => f,
        };

        if client.is_none() {
            match runtime.block_on(LlmClient::connect(&base_url)) {
                Ok(c) => client = Some(c),
                Err(e) => {
                    warn!(error = %e, url = %base_url, "LLM connection failed, dropping fragment");
                    continue;
                }
            }
        }
        let Some(active_client) = client.as_ref() else { continue };

        history.push(ChatTurn::user(fragment));

        let mut line_buffer = String::new();
        let on_token = |token: &str| {
            line_buffer.push_str(token);
            while let Some(idx) = line_buffer.find('\n') {
                let line: String = line_buffer.drain(..=idx).collect();
                emit_line(line.trim(), &result_tx);
            }
        };

        match runtime.block_on(active_client.stream_chat(&history, &stop, on_token)) {
            Ok(full_response) => {
                emit_line(line_buffer.trim(), &result_tx);
                if !full_response.is_empty() {
                    history.push(ChatTurn::assistant(full_response));
                }
            }
            Err(e) => {
                warn!(error = %e, "LLM streaming failed, leaving history as-is");
            }
        }
    }

    info!("LLM worker exiting");
}

fn emit_line(line: &str, result_tx: &Sender<ExtractedItem>) {
    if let Some(text) = line.to_uppercase().strip_prefix("QUESTION:").map(|_| line[9..].trim().to_string()) {
        if !text.is_empty() {
            let _ = result_tx.send(ExtractedItem { kind: ItemKind::Question, text });
        }
    } else if let Some(text) = line.to_uppercase().strip_prefix("ACTION:").map(|_| line[7..].trim().to_string()) {
        if !text.is_empty() {
            let _ = result_tx.send(ExtractedItem { kind: ItemKind::Action, text });
        }
    }
}
