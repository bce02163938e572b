//! Speaker diarization type definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A 512-dimensional speaker embedding extracted from one audio segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakerEmbedding {
    pub vector: Vec<f32>,
}

impl SpeakerEmbedding {
    /// Cosine similarity. Returns 0.0 on dimension mismatch or zero magnitude.
    pub fn similarity(&self, other: &SpeakerEmbedding) -> f32 {
        if self.vector.len() != other.vector.len() {
            return 0.0;
        }

        let dot: f32 = self.vector.iter().zip(other.vector.iter()).map(|(a, b)| a * b).sum();
        let norm_a: f32 = self.vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = other.vector.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        dot / (norm_a * norm_b)
    }
}

/// One local speaker turn produced by the diarization pipeline for a chunk,
/// times relative to the start of that chunk.
#[derive(Debug, Clone)]
pub struct SpeakerTurn {
    pub start_s: f32,
    pub end_s: f32,
    pub local_label: String,
}

#[derive(Debug, Error)]
pub enum DiarizationError {
    #[error("model loading failed: {message}")]
    ModelLoadError { message: String },

    #[error("processing error: {message}")]
    ProcessingError { message: String },

    #[error("insufficient audio for processing")]
    InsufficientAudio,
}
