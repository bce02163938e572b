//! Streaming Server Facade (C8): the axum HTTP/WebSocket surface. Each
//! accepted connection spawns a cooperative task that owns one
//! `SessionOrchestrator` for the lifetime of the connection; the orchestrator
//! in turn owns the dedicated OS-thread ASR and LLM workers.

use crate::asr::AsrEngine;
use crate::audio::normalizer::TARGET_SAMPLE_RATE;
use crate::audio::types::AudioFrame;
use crate::config::Config;
use crate::diarization::{DiarizationEngine, EmbeddingModel};
use crate::facade::protocol::{HealthResponse, InboundMessage, OutboundMessage, WireSentence};
use crate::session::SessionOrchestrator;
use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::IntoResponse,
    routing::{get, Router},
    Json,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{info, warn};

const PUSH_INTERVAL_MS: u64 = 100;

#[derive(Clone)]
pub struct AppState {
    pub asr_engine: Arc<dyn AsrEngine>,
    pub diarization: Option<(Arc<dyn DiarizationEngine>, Arc<dyn EmbeddingModel>)>,
    pub config: Arc<Config>,
    pub model_ready: Arc<AtomicBool>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ws/transcribe", get(ws_upgrade))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse { status: "ok", model_ready: state.model_ready.load(Ordering::Relaxed) })
}

async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let mut orchestrator = SessionOrchestrator::new(
        state.asr_engine.clone(),
        state.diarization.clone(),
        state.config.default_llm_url.clone(),
        state.config.chunk_seconds,
    );

    let mut sample_rate = TARGET_SAMPLE_RATE;
    let mut ticker = interval(Duration::from_millis(PUSH_INTERVAL_MS));
    let mut dirty = false;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if dirty {
                    let snapshot = orchestrator.drain();
                    push_snapshot(&mut socket, &snapshot.sentences, &snapshot.full_text, &snapshot.questions, &snapshot.actions, false).await;
                    dirty = false;
                }
            }
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        match serde_json::from_str::<InboundMessage>(&text) {
                            Ok(InboundMessage::Config { sample_rate: sr }) => sample_rate = sr,
                            Ok(InboundMessage::Stop) => {
                                let (snapshot, _exports) = match orchestrator.finalize() {
                                    Ok(r) => r,
                                    Err(e) => {
                                        warn!(error = %e, "session finalize failed");
                                        break;
                                    }
                                };
                                push_snapshot(&mut socket, &snapshot.sentences, &snapshot.full_text, &snapshot.questions, &snapshot.actions, true).await;
                                break;
                            }
                            Err(e) => warn!(error = %e, "malformed config message"),
                        }
                    }
                    Message::Binary(bytes) => {
                        let samples = decode_pcm_f32le(&bytes);
                        if samples.is_empty() {
                            continue;
                        }
                        let frame = AudioFrame { samples, sample_rate, channels: 1 };
                        match orchestrator.on_audio(&frame) {
                            Ok(_) => dirty = true,
                            Err(e) => warn!(error = %e, "audio normalisation failed"),
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    }

    info!("websocket session ended");
}

fn decode_pcm_f32le(bytes: &[u8]) -> Vec<f32> {
    bytes.chunks_exact(4).map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]])).collect()
}

async fn push_snapshot(
    socket: &mut WebSocket,
    sentences: &[crate::segmenter::Sentence],
    full_text: &str,
    questions: &[String],
    actions: &[String],
    is_final: bool,
) {
    let payload = OutboundMessage::Transcript {
        sentences: sentences.iter().map(WireSentence::from).collect(),
        full_text: full_text.to_string(),
        questions: if questions.is_empty() { None } else { Some(questions.to_vec()) },
        actions: if actions.is_empty() { None } else { Some(actions.to_vec()) },
        is_final: if is_final { Some(true) } else { None },
    };
    if let Ok(text) = serde_json::to_string(&payload) {
        let _ = socket.send(Message::Text(text)).await;
    }
}
