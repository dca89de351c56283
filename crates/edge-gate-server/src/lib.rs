// crates/edge-gate-server/src/lib.rs
// ============================================================================
// Module: Edge Gate Server
// Description: HTTP surface for the Zero-Trust packet gateway.
// Purpose: Expose ingest, admin, health, and metrics endpoints.
// Dependencies: axum, edge-gate-config, edge-gate-core, edge-gate-scoring,
//               edge-gate-store-sqlite, tokio, tracing
// ============================================================================

//! ## Overview
//! This crate hosts the gateway over HTTP: packet ingest through the
//! validate-then-route pipeline, admin endpoints for policies and device
//! keys, a health probe, and Prometheus text metrics. State construction is
//! driven by [`edge_gate_config::EdgeGateConfig`]; handlers are plain
//! functions over shared state so they can be exercised without a socket.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod server;
pub mod telemetry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use server::RouteResponse;
pub use server::SIGNATURE_HEADER;
pub use server::ServerError;
pub use server::ServerState;
pub use server::build_router;
pub use server::build_server_state;
pub use telemetry::GatewayMetrics;
pub use telemetry::IngestMetricEvent;
pub use telemetry::IngestOutcome;
pub use telemetry::NoopMetrics;
