//! Streaming Server Facade module (C8): the WebSocket + HTTP surface clients
//! speak to.

pub mod protocol;
pub mod server;

pub use server::{router, AppState};
