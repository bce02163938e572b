//! livescribe — a real-time meeting transcription and live-analysis pipeline.
//!
//! Audio frames flow through normalisation (C1), a rolling ASR worker (C3)
//! that segments recognised tokens into sentences (C2) and optionally
//! enriches them with speaker identity (C4 + C5), a persistent-history LLM
//! worker that extracts questions and action items as they are said (C6),
//! all held together by a per-connection session orchestrator (C7) exposed
//! over a WebSocket facade (C8).

pub mod asr;
pub mod audio;
pub mod config;
pub mod diarization;
pub mod export;
pub mod facade;
pub mod llm;
pub mod segmenter;
pub mod session;
