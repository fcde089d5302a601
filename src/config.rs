//! Server configuration.

use std::time::Duration;

use clap::Parser;

/// Command-line configuration for the delivery server.
#[derive(Debug, Clone, Parser)]
#[command(name = "minato-server", about = "Real-time chat and notification delivery server")]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Seconds between notification polls on a live connection
    #[arg(long, default_value_t = 20)]
    pub poll_interval_secs: u64,
}

impl ServerConfig {
    /// The notification re-poll cadence as a Duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}
