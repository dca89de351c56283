// crates/edge-gate-core/src/runtime/router.rs
// ============================================================================
// Module: Hybrid Router
// Description: Policy-driven routing with type-keyed default fallback.
// Purpose: Produce a total routing decision for every validated packet.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The router is two-tier: explicit policy first, else a default keyed by
//! packet type. Routing is total: every validated packet gets a decision,
//! never an error, and behavior degrades predictably in the absence of
//! configuration. Fallback decisions never forward; only an explicit policy
//! with a non-empty endpoint sets `should_forward`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::core::packet::Packet;
use crate::core::packet::PacketType;
use crate::core::policy::RoutingDecision;
use crate::core::validation::EntryValidationResult;
use crate::interfaces::PolicyStore;

// ============================================================================
// SECTION: Hybrid Router
// ============================================================================

/// Policy-consulting router for validated packets.
pub struct HybridRouter {
    /// Ordered policy collection.
    policy_store: Arc<dyn PolicyStore>,
}

impl HybridRouter {
    /// Creates a router over `policy_store`.
    #[must_use]
    pub fn new(policy_store: Arc<dyn PolicyStore>) -> Self {
        Self {
            policy_store,
        }
    }

    /// Returns the backing policy store.
    #[must_use]
    pub fn policy_store(&self) -> &Arc<dyn PolicyStore> {
        &self.policy_store
    }

    /// Routes one validated packet.
    ///
    /// Callers must halt on blocked validations; blocked packets never reach
    /// routing. The validation result only contributes audit context here
    /// (a `strict_audit` carry-forward reason), never the outcome.
    #[must_use]
    pub fn route(
        &self,
        packet: &Packet,
        validation: &EntryValidationResult,
    ) -> RoutingDecision {
        let mut reasons = Vec::new();
        if validation.strict_audit {
            reasons.push("strict_audit".to_string());
        }

        if let Some(policy) = self.policy_store.match_for_packet(packet) {
            reasons.push(format!("matched_policy:{}", policy.policy_id));
            let target_endpoint =
                policy.target_endpoint.clone().filter(|endpoint| !endpoint.is_empty());
            let should_forward = target_endpoint.is_some();
            return RoutingDecision {
                target_endpoint,
                store_in_timeseries: policy.store_in_timeseries,
                store_in_object_storage: policy.store_in_object_storage,
                should_forward,
                policy: Some(policy),
                reasons,
            };
        }

        // Type-keyed defaults: telemetry-shaped traffic lands in the
        // time-series sink, alerts additionally in object storage, control
        // packets store nowhere.
        reasons.push("no_matching_policy".to_string());
        let store_in_timeseries = matches!(
            packet.packet_type,
            PacketType::Telemetry | PacketType::Heartbeat | PacketType::Alert
        );
        let store_in_object_storage = packet.packet_type == PacketType::Alert;

        RoutingDecision {
            policy: None,
            target_endpoint: None,
            store_in_timeseries,
            store_in_object_storage,
            should_forward: false,
            reasons,
        }
    }
}
