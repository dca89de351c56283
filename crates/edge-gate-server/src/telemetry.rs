// crates/edge-gate-server/src/telemetry.rs
// ============================================================================
// Module: Server Telemetry
// Description: Observability hooks for packet ingest and admin handling.
// Purpose: Provide metric events without binding to an exporter.
// Dependencies: edge-gate-core
// ============================================================================

//! ## Overview
//! This module exposes a thin metrics interface for ingest request counters.
//! It is intentionally dependency-light so downstream deployments can plug in
//! Prometheus or OpenTelemetry without redesign; the built-in `/metrics`
//! endpoint renders the core domain counters independently of this sink.
//! Security posture: telemetry must avoid leaking packet payloads or key
//! material and treat labels as untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use edge_gate_core::Domain;
use edge_gate_core::Environment;

// ============================================================================
// SECTION: Metric Labels
// ============================================================================

/// Ingest request outcome classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum IngestOutcome {
    /// Packet passed the gate and received a routing decision.
    Routed,
    /// Packet was blocked at the entry gate.
    Blocked,
    /// Request was malformed before reaching the gate.
    Rejected,
}

impl IngestOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Routed => "routed",
            Self::Blocked => "blocked",
            Self::Rejected => "rejected",
        }
    }
}

/// Ingest metric event payload.
///
/// # Invariants
/// - Optional fields are `None` when the metadata is unavailable.
#[derive(Debug, Clone)]
pub struct IngestMetricEvent {
    /// Packet domain when the packet parsed.
    pub domain: Option<Domain>,
    /// Packet environment when the packet parsed.
    pub env: Option<Environment>,
    /// Request outcome.
    pub outcome: IngestOutcome,
    /// Normalized block reason label when blocked.
    pub block_reason: Option<&'static str>,
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Metrics sink for ingest requests.
pub trait GatewayMetrics: Send + Sync {
    /// Records one ingest request event.
    fn record_ingest(&self, event: IngestMetricEvent);
}

/// No-op metrics sink.
///
/// # Invariants
/// - Metrics are intentionally discarded.
pub struct NoopMetrics;

impl GatewayMetrics for NoopMetrics {
    fn record_ingest(&self, _event: IngestMetricEvent) {}
}
