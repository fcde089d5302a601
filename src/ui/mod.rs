//! UI layer: HTTP/WebSocket endpoints, per-connection sessions, and
//! server lifecycle.

pub mod handler;
mod runner;
mod signal;
pub mod session;
pub mod state;

pub use runner::{build_router, run_server};
