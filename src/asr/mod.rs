//! Automatic Speech Recognition (ASR) module
//!
//! Provides the `AsrEngine` contract, a whisper.cpp-backed production adapter,
//! and the rolling chunked-transcription worker (C3).

pub mod engine;
pub mod types;
pub mod whisper_engine;
pub mod worker;

pub use engine::AsrEngine;
pub use types::*;