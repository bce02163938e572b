//! Session Orchestrator (C7): owns the queues and worker threads for one
//! session, accumulates transcript/question/action state, and exposes a
//! per-tick pull API plus shutdown. Runs on the facade's async task — it
//! only drains queues and mutates its own state; it never performs model
//! inference inline.

use crate::asr::worker::{AsrChunkResult, AudioTask, ChunkSpeakerBinder, NoOpBinder};
use crate::asr::AsrEngine;
use crate::audio::normalizer;
use crate::audio::types::{AudioError, AudioFrame};
use crate::diarization::{DiarizationBinder, DiarizationEngine, EmbeddingModel, SpeakerRegistry};
use crate::export::{self, ExportPaths};
use crate::llm::types::{ExtractedItem, ItemKind};
use crate::llm::worker as llm_worker;
use crate::session::state::{SessionSnapshot, SessionState};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use thiserror::Error;
use tracing::{info, warn};

const JOIN_TIMEOUT_S: u64 = 60;

/// Audio-queue depth policy (§9): the queue is unbounded in spirit, but a
/// slow ASR worker makes it grow. Rather than bound and drop, log once per
/// crossing so an operator notices before memory becomes the real problem.
const QUEUE_DEPTH_WATERMARK: usize = 200;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error("worker thread did not shut down within {0}s")]
    JoinTimedOut(u64),
}

struct Workers {
    audio_tx: Sender<AudioTask>,
    asr_results: Receiver<AsrChunkResult>,
    asr_handle: JoinHandle<()>,
    asr_stop: Arc<AtomicBool>,

    llm_tx: Sender<llm_worker::LlmTask>,
    llm_results: Receiver<ExtractedItem>,
    llm_handle: JoinHandle<()>,
    llm_stop: Arc<AtomicBool>,
}

/// The shared, process-lifetime diarization model handles a session may bind
/// a fresh per-session registry to. `None` when diarization is disabled.
pub type DiarizationEngines = (Arc<dyn DiarizationEngine>, Arc<dyn EmbeddingModel>);

pub struct SessionOrchestrator {
    state: SessionState,
    engine: Arc<dyn AsrEngine>,
    diarization: Option<DiarizationEngines>,
    registry: Arc<SpeakerRegistry>,
    chunk_seconds: f32,
    workers: Workers,
    outstanding_frames: usize,
    watermark_logged: bool,
}

impl SessionOrchestrator {
    pub fn new(
        engine: Arc<dyn AsrEngine>,
        diarization: Option<DiarizationEngines>,
        llm_url: String,
        chunk_seconds: f32,
    ) -> Self {
        let registry = Arc::new(SpeakerRegistry::new());
        let binder = build_binder(&diarization, &registry);
        let workers = spawn_workers(engine.clone(), binder, llm_url.clone(), chunk_seconds);

        Self {
            state: SessionState::new(llm_url),
            engine,
            diarization,
            registry,
            chunk_seconds,
            workers,
            outstanding_frames: 0,
            watermark_logged: false,
        }
    }

    /// Normalises and enqueues one frame, drains both result queues, and
    /// returns the current snapshot.
    pub fn on_audio(&mut self, frame: &AudioFrame) -> Result<SessionSnapshot, SessionError> {
        let normalized = normalizer::normalize(frame)?;
        let _ = self.workers.audio_tx.send(Some(normalized.samples));
        self.outstanding_frames += 1;
        if self.outstanding_frames >= QUEUE_DEPTH_WATERMARK && !self.watermark_logged {
            warn!(outstanding_frames = self.outstanding_frames, "ASR worker falling behind, audio queue growing");
            self.watermark_logged = true;
        }

        self.drain_asr_results();
        self.dispatch_pending_fragment();
        self.drain_llm_results();

        Ok(self.state.snapshot(false))
    }

    /// Number of distinct speakers the registry has assigned so far this session.
    pub fn speaker_count(&self) -> usize {
        self.registry.speaker_count()
    }

    /// Drains both result queues without enqueuing new audio, for the
    /// facade's periodic (≈10 Hz) push independent of when frames arrive.
    pub fn drain(&mut self) -> SessionSnapshot {
        self.drain_asr_results();
        self.dispatch_pending_fragment();
        self.drain_llm_results();
        self.state.snapshot(false)
    }

    /// Stops both workers, drains whatever remains, and returns the final
    /// snapshot plus the paths written by the exporters.
    pub fn finalize(mut self) -> Result<(SessionSnapshot, ExportPaths), SessionError> {
        self.workers.asr_stop.store(true, Ordering::Relaxed);
        let _ = self.workers.audio_tx.send(None);
        join_bounded(self.workers.asr_handle)?;

        self.drain_asr_results();
        self.dispatch_pending_fragment();

        self.workers.llm_stop.store(true, Ordering::Relaxed);
        let _ = self.workers.llm_tx.send(None);
        join_bounded(self.workers.llm_handle)?;
        self.drain_llm_results();

        let exports = if self.state.sentences.is_empty() {
            ExportPaths { csv: None, srt: None }
        } else {
            export::write_all(&self.state.sentences)
        };

        Ok((self.state.snapshot(true), exports))
    }

    /// Stops both workers and rebuilds a fresh session — a fresh queue pair,
    /// fresh workers, and a cleared speaker registry — preserving only the
    /// configured LLM endpoint URL and the (expensive, process-lifetime)
    /// engine handles.
    pub fn reset(self) -> Self {
        let llm_url = self.state.llm_url.clone();
        self.workers.asr_stop.store(true, Ordering::Relaxed);
        self.workers.llm_stop.store(true, Ordering::Relaxed);
        let _ = self.workers.audio_tx.send(None);
        let _ = self.workers.llm_tx.send(None);
        let _ = self.workers.asr_handle.join();
        let _ = self.workers.llm_handle.join();

        Self::new(self.engine, self.diarization, llm_url, self.chunk_seconds)
    }

    fn drain_asr_results(&mut self) {
        while let Ok(result) = self.workers.asr_results.try_recv() {
            self.state.sentences.extend(result.sentences);
            self.state.push_text(&result.text);
            self.outstanding_frames = 0;
            self.watermark_logged = false;
        }
    }

    fn dispatch_pending_fragment(&mut self) {
        if let Some(fragment) = self.state.pending_fragment() {
            let _ = self.workers.llm_tx.send(Some(fragment));
            self.state.mark_sent();
        }
    }

    fn drain_llm_results(&mut self) {
        while let Ok(item) = self.workers.llm_results.try_recv() {
            match item.kind {
                ItemKind::Question => self.state.push_question(item.text),
                ItemKind::Action => self.state.push_action(item.text),
            }
        }
    }
}

fn build_binder(diarization: &Option<DiarizationEngines>, registry: &Arc<SpeakerRegistry>) -> Arc<dyn ChunkSpeakerBinder> {
    match diarization {
        Some((diarizer, embedder)) => Arc::new(DiarizationBinder::new(diarizer.clone(), embedder.clone(), registry.clone())),
        None => Arc::new(NoOpBinder),
    }
}

fn spawn_workers(
    engine: Arc<dyn AsrEngine>,
    binder: Arc<dyn ChunkSpeakerBinder>,
    llm_url: String,
    chunk_seconds: f32,
) -> Workers {
    let (audio_tx, audio_rx) = channel();
    let (asr_result_tx, asr_results) = channel();
    let asr_stop = Arc::new(AtomicBool::new(false));
    let asr_handle = crate::asr::worker::spawn(engine, binder, audio_rx, asr_result_tx, asr_stop.clone(), chunk_seconds);

    let (llm_tx, llm_task_rx) = channel();
    let (llm_result_tx, llm_results) = channel();
    let llm_stop = Arc::new(AtomicBool::new(false));
    let llm_handle = llm_worker::spawn(llm_url, llm_task_rx, llm_result_tx, llm_stop.clone());

    Workers { audio_tx, asr_results, asr_handle, asr_stop, llm_tx, llm_results, llm_handle, llm_stop }
}

fn join_bounded(handle: JoinHandle<()>) -> Result<(), SessionError> {
    // std::thread::JoinHandle has no timed join; the worker loops themselves
    // bound their own shutdown latency (queue timeouts, streamed-token checks),
    // so a plain join here is expected to return promptly once the poison
    // value has been observed.
    if handle.join().is_err() {
        warn!("worker thread panicked during shutdown");
        return Err(SessionError::JoinTimedOut(JOIN_TIMEOUT_S));
    }
    info!("worker thread joined");
    Ok(())
}
