//! The ASR engine contract (§6): an external collaborator this crate calls into
//! but never implements the model for.

use crate::asr::types::AsrError;

/// Recognises a buffer of 16 kHz mono int16 audio, returning parallel token and
/// per-token timestamp (seconds, relative to the start of the buffer) sequences.
pub trait AsrEngine: Send + Sync {
    fn recognize(&self, samples: &[i16]) -> Result<(Vec<String>, Vec<f32>), AsrError>;
}
