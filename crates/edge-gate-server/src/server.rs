// crates/edge-gate-server/src/server.rs
// ============================================================================
// Module: Gateway HTTP Server
// Description: Axum routes for packet ingest, admin, and metrics.
// Purpose: Expose the validate-then-route pipeline over HTTP.
// Dependencies: axum, edge-gate-config, edge-gate-core, edge-gate-scoring,
//               edge-gate-store-sqlite, serde, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! This module wires the gateway pipeline into an HTTP surface: one ingest
//! endpoint that validates and routes packets, admin endpoints for policies
//! and device keys, a health probe, and a Prometheus text metrics endpoint.
//! Packets the router holds instead of forwarding are buffered in the
//! offline cache when one is configured.
//!
//! Security posture: every request body is untrusted; signatures arrive as a
//! hex header and malformed values are rejected before the gate runs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Router;
use axum::extract::Path;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Json;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use edge_gate_config::EdgeGateConfig;
use edge_gate_core::BlockReason;
use edge_gate_core::DeviceKey;
use edge_gate_core::DeviceKeyStore;
use edge_gate_core::DomainTrafficMetrics;
use edge_gate_core::EntryValidationResult;
use edge_gate_core::KeyStoreError;
use edge_gate_core::Packet;
use edge_gate_core::PacketSignature;
use edge_gate_core::Policy;
use edge_gate_core::PolicyStore;
use edge_gate_core::PolicyStoreError;
use edge_gate_core::RoutingDecision;
use edge_gate_core::runtime::EntryValidator;
use edge_gate_core::runtime::Gateway;
use edge_gate_core::runtime::GatewayOutcome;
use edge_gate_core::runtime::HybridRouter;
use edge_gate_core::runtime::InMemoryDeviceKeyStore;
use edge_gate_core::runtime::InMemoryPolicyStore;
use edge_gate_core::runtime::RiskEngine;
use edge_gate_scoring::HeuristicRiskScorer;
use edge_gate_store_sqlite::CacheError;
use edge_gate_store_sqlite::SqliteCacheConfig;
use edge_gate_store_sqlite::SqliteOfflineCache;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::telemetry::GatewayMetrics;
use crate::telemetry::IngestMetricEvent;
use crate::telemetry::IngestOutcome;
use crate::telemetry::NoopMetrics;


// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header carrying the hex-encoded packet signature.
pub const SIGNATURE_HEADER: &str = "x-edge-gate-signature";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Server construction errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Offline cache could not be opened.
    #[error("offline cache error: {0}")]
    Cache(#[from] CacheError),
}

// ============================================================================
// SECTION: State
// ============================================================================

/// Shared state behind every handler.
///
/// # Invariants
/// - `key_store` and `policy_store` are the same instances the gateway's
///   validator and router read; admin writes are visible to the next ingest.
pub struct ServerState {
    /// Validate-then-route pipeline.
    gateway: Gateway,
    /// Device key store, shared with the gateway's validator.
    key_store: Arc<dyn DeviceKeyStore>,
    /// Policy store, shared with the gateway's router.
    policy_store: Arc<dyn PolicyStore>,
    /// Durable buffer for held packets, when configured.
    cache: Option<Arc<SqliteOfflineCache>>,
    /// Pluggable metrics sink for ingest events.
    metrics_sink: Arc<dyn GatewayMetrics>,
    /// Whether `/metrics` is exposed.
    metrics_enabled: bool,
}

impl ServerState {
    /// Returns the offline cache, when configured.
    #[must_use]
    pub fn cache(&self) -> Option<&Arc<SqliteOfflineCache>> {
        self.cache.as_ref()
    }
}

/// Builds the shared server state from a validated configuration.
///
/// # Errors
///
/// Returns [`ServerError::Cache`] when the offline cache cannot be opened.
pub fn build_server_state(config: &EdgeGateConfig) -> Result<Arc<ServerState>, ServerError> {
    let key_store: Arc<InMemoryDeviceKeyStore> =
        Arc::new(InMemoryDeviceKeyStore::with_registration(config.keys.registration));
    let policy_store: Arc<InMemoryPolicyStore> = Arc::new(InMemoryPolicyStore::new());

    let mut validator = EntryValidator::new(Arc::clone(&key_store) as Arc<dyn DeviceKeyStore>)
        .with_config(config.risk.validator_config());
    if config.risk.enabled {
        validator = validator.with_risk_engine(RiskEngine::with_thresholds(
            Arc::new(HeuristicRiskScorer::new()),
            config.risk.block_threshold,
            config.risk.audit_threshold,
        ));
    }

    let router = HybridRouter::new(Arc::clone(&policy_store) as Arc<dyn PolicyStore>);
    let gateway = Gateway::new(validator, router, Arc::new(DomainTrafficMetrics::new()));

    let cache = if config.cache.enabled {
        let cache_config = SqliteCacheConfig::new(config.cache.path.clone());
        Some(Arc::new(SqliteOfflineCache::new(&cache_config)?))
    } else {
        None
    };

    Ok(Arc::new(ServerState {
        gateway,
        key_store,
        policy_store,
        cache,
        metrics_sink: Arc::new(NoopMetrics),
        metrics_enabled: config.server.metrics,
    }))
}

/// Builds the ingest/admin HTTP router over `state`.
///
/// The `/metrics` route is only mounted when the configuration enables it.
#[must_use]
pub fn build_router(state: Arc<ServerState>) -> Router {
    let mut router = Router::new();
    if state.metrics_enabled {
        router = router.route("/metrics", get(handle_metrics));
    }
    router
        .route("/health", get(handle_health))
        .route("/v1/packets/route", post(handle_route_packet))
        .route("/v1/policies", post(handle_add_policy).get(handle_list_policies))
        .route("/v1/policies/{policy_id}", axum::routing::delete(handle_remove_policy))
        .route("/v1/keys", post(handle_register_key))
        .route("/v1/keys/{device_id}", axum::routing::delete(handle_revoke_key))
        .with_state(state)
}

// ============================================================================
// SECTION: Ingest
// ============================================================================

/// Successful ingest response body.
///
/// # Invariants
/// - `validation.blocked` is always `false`; blocked packets answer 403 with
///   the validation result alone.
#[derive(Debug, Clone, Serialize)]
pub struct RouteResponse {
    /// Entry gate outcome.
    pub validation: EntryValidationResult,
    /// Total routing decision.
    pub decision: RoutingDecision,
}

/// Validates and routes one packet.
///
/// The optional signature arrives hex-encoded in [`SIGNATURE_HEADER`]. A
/// malformed header is a 400 before the gate runs; a blocked packet is a 403
/// carrying the validation result; a routed packet answers 200 with the
/// decision, after buffering held packets in the offline cache.
pub async fn handle_route_packet(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Json(packet): Json<Packet>,
) -> Response {
    let signature = match parse_signature_header(&headers) {
        Ok(signature) => signature,
        Err(message) => {
            state.metrics_sink.record_ingest(IngestMetricEvent {
                domain: Some(packet.domain),
                env: Some(packet.env),
                outcome: IngestOutcome::Rejected,
                block_reason: None,
            });
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
                .into_response();
        }
    };

    match state.gateway.process(&packet, signature.as_ref()) {
        GatewayOutcome::Blocked(validation) => {
            let reason = validation.reason.map(BlockReason::as_str);
            tracing::warn!(
                packet_id = %packet.packet_id,
                device_id = %packet.device_id,
                reason = reason.unwrap_or("unknown"),
                "packet blocked at entry gate"
            );
            state.metrics_sink.record_ingest(IngestMetricEvent {
                domain: Some(packet.domain),
                env: Some(packet.env),
                outcome: IngestOutcome::Blocked,
                block_reason: reason,
            });
            (StatusCode::FORBIDDEN, Json(validation)).into_response()
        }
        GatewayOutcome::Routed {
            validation,
            decision,
        } => {
            if !decision.should_forward {
                buffer_held_packet(&state, &packet);
            }
            state.metrics_sink.record_ingest(IngestMetricEvent {
                domain: Some(packet.domain),
                env: Some(packet.env),
                outcome: IngestOutcome::Routed,
                block_reason: None,
            });
            (
                StatusCode::OK,
                Json(RouteResponse {
                    validation,
                    decision,
                }),
            )
                .into_response()
        }
    }
}

/// Enqueues a held packet into the offline cache, when configured.
fn buffer_held_packet(state: &ServerState, packet: &Packet) {
    let Some(cache) = state.cache.as_ref() else {
        return;
    };
    if let Err(error) = cache.enqueue(packet) {
        // The routing decision stands; losing the buffer copy is logged, not
        // surfaced to the producer.
        tracing::error!(
            packet_id = %packet.packet_id,
            error = %error,
            "failed to buffer held packet"
        );
    }
}

/// Parses the optional signature header.
///
/// # Errors
///
/// Returns a message for non-ASCII header values and for values that are not
/// exactly 64 hex characters.
fn parse_signature_header(headers: &HeaderMap) -> Result<Option<PacketSignature>, String> {
    let Some(value) = headers.get(SIGNATURE_HEADER) else {
        return Ok(None);
    };
    let text = value
        .to_str()
        .map_err(|_| format!("{SIGNATURE_HEADER} header must be ascii hex"))?;
    PacketSignature::from_hex(text)
        .map(Some)
        .ok_or_else(|| format!("{SIGNATURE_HEADER} header must be 64 hex characters"))
}

// ============================================================================
// SECTION: Admin
// ============================================================================

/// Appends a routing policy; 409 when the identifier is already present.
///
/// The store checks and inserts atomically, so concurrent adds of one
/// identifier yield exactly one 201. Replacing a policy is remove-then-add;
/// silent in-place replacement would reorder the first-match scan
/// unpredictably.
pub async fn handle_add_policy(
    State(state): State<Arc<ServerState>>,
    Json(policy): Json<Policy>,
) -> Response {
    let policy_id = policy.policy_id.clone();
    match state.policy_store.add(policy) {
        Ok(()) => {
            tracing::info!(policy_id = %policy_id, "policy added");
            StatusCode::CREATED.into_response()
        }
        Err(error @ PolicyStoreError::DuplicatePolicy { .. }) => {
            (StatusCode::CONFLICT, Json(json!({ "error": error.to_string() }))).into_response()
        }
        Err(error @ PolicyStoreError::Store(_)) => {
            tracing::error!(error = %error, "policy add failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": error.to_string() })),
            )
                .into_response()
        }
    }
}

/// Lists policies in registration order.
pub async fn handle_list_policies(State(state): State<Arc<ServerState>>) -> Json<Vec<Policy>> {
    Json(state.policy_store.all())
}

/// Removes a policy by identifier; 404 when unknown.
pub async fn handle_remove_policy(
    State(state): State<Arc<ServerState>>,
    Path(policy_id): Path<String>,
) -> StatusCode {
    if state.policy_store.remove(&policy_id.into()) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Registers a device key; 409 when the device already holds an active key.
pub async fn handle_register_key(
    State(state): State<Arc<ServerState>>,
    Json(key): Json<DeviceKey>,
) -> Response {
    match state.key_store.register(key) {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(error @ KeyStoreError::DuplicateActiveKey { .. }) => {
            (StatusCode::CONFLICT, Json(json!({ "error": error.to_string() }))).into_response()
        }
        Err(error @ KeyStoreError::Store(_)) => {
            tracing::error!(error = %error, "key registration failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": error.to_string() })),
            )
                .into_response()
        }
    }
}

/// Revokes the active key for a device; idempotent.
pub async fn handle_revoke_key(
    State(state): State<Arc<ServerState>>,
    Path(device_id): Path<String>,
) -> StatusCode {
    state.key_store.revoke(&device_id.into());
    StatusCode::NO_CONTENT
}

// ============================================================================
// SECTION: Health and Metrics
// ============================================================================

/// Liveness probe.
pub async fn handle_health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Renders the domain traffic counters in Prometheus text format.
pub async fn handle_metrics(State(state): State<Arc<ServerState>>) -> Response {
    let body = state.gateway.metrics().render_prometheus_text();
    ([("content-type", "text/plain; version=0.0.4")], body).into_response()
}
