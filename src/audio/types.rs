//! Audio-related type definitions
//!
//! Common types used throughout the audio ingestion pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A mono or multi-channel audio buffer at a declared sample rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFrame {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u8,
}

impl AudioFrame {
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / (self.sample_rate * self.channels as u32) as f32
    }
}

/// Audio processing errors.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(u32),

    #[error("invalid channel count: {0}")]
    InvalidChannelCount(u8),

    #[error("audio processing failed: {message}")]
    ProcessingFailed { message: String },
}
