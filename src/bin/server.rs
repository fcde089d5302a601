//! Real-time chat and notification delivery server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin minato-server
//! ```

use clap::Parser;

use minato::{ServerConfig, logger::setup_logger};

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger("debug");

    // Run the server
    if let Err(e) = minato::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
