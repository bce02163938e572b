//! ASR-related type definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Model accuracy/speed tier, mirroring whisper.cpp's model family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ModelTier {
    Standard,
    HighAccuracy,
    Turbo,
}

/// Processing device selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Device {
    Cpu,
    Metal,
    Auto,
}

/// ASR processing errors.
#[derive(Debug, Error)]
pub enum AsrError {
    #[error("model not found at path: {path}")]
    ModelNotFound { path: String },

    #[error("model loading failed: {message}")]
    ModelLoadFailed { message: String },

    #[error("transcription failed: {message}")]
    TranscriptionFailed { message: String },

    #[error("invalid audio format: {message}")]
    InvalidAudioFormat { message: String },
}
