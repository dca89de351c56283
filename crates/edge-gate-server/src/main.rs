// crates/edge-gate-server/src/main.rs
// ============================================================================
// Module: Gateway Server Binary
// Description: Entry point wiring config, state, and the HTTP listener.
// Purpose: Run the Edge Gate HTTP server.
// Dependencies: edge-gate-config, edge-gate-server, tokio, tracing-subscriber
// ============================================================================

//! ## Overview
//! Loads the optional TOML config given as the first argument, builds the
//! gateway state, and serves the HTTP API on the configured bind address.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use edge_gate_config::EdgeGateConfig;
use edge_gate_server::build_router;
use edge_gate_server::build_server_state;
use tokio::net::TcpListener;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Runs the gateway server.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = EdgeGateConfig::load(config_path.as_deref())?;
    let state = build_server_state(&config)?;
    let app = build_router(state);

    let listener = TcpListener::bind(&config.server.bind).await?;
    tracing::info!(bind = %config.server.bind, "edge gate listening");
    axum::serve(listener, app).await?;
    Ok(())
}
