//! Real-time delivery server for direct messages and account notifications
//! over persistent per-user WebSocket connections.
//!
//! Each user's live connections are bound to a named delivery group; an
//! inbound message fans out to the sender's and receiver's groups, and a
//! per-connection polling loop pushes new notifications for the lifetime
//! of the session.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logger;
pub mod time;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use ui::run_server;
