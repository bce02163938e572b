//! Session Orchestrator module (C7): per-session queues, workers, and
//! accumulated transcript/question/action state.

pub mod orchestrator;
pub mod state;

pub use orchestrator::{SessionError, SessionOrchestrator};
pub use state::{SessionSnapshot, SessionState};
