//! Speaker Diarization Module
//!
//! Identifies distinct speakers across chunked audio and assigns stable,
//! session-scoped global speaker IDs to transcript sentences (C4 + C5).
//!
//! Engines and the registry are explicit handles owned by the session, never
//! process-global singletons — concurrent sessions must not share speaker
//! identity state.

pub mod binder;
pub mod engine;
pub mod registry;
pub mod types;

pub use binder::DiarizationBinder;
pub use engine::{DiarizationEngine, EmbeddingModel};
pub use registry::SpeakerRegistry;
pub use types::*;