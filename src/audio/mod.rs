//! Audio processing module
//!
//! Normalises wire-delivered audio frames into the mono 16 kHz float32 / int16
//! formats the ASR engine consumes.

pub mod normalizer;
pub mod types;

pub use types::*;