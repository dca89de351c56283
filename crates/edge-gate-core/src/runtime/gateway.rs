// crates/edge-gate-core/src/runtime/gateway.rs
// ============================================================================
// Module: Gateway Pipeline
// Description: Validate-then-route pipeline with metrics observation.
// Purpose: Compose the entry gate, router, and metrics into one call.
// Dependencies: crate::core, crate::runtime::{router, validator}
// ============================================================================

//! ## Overview
//! The gateway is the transport-facing composition: one call validates a
//! packet, routes it when the gate passes, and records the outcome in the
//! domain metrics. Blocked packets never reach the router. The gateway holds
//! no per-packet state; concurrent calls only share the stores and counters.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::core::integrity::PacketSignature;
use crate::core::metrics::DomainTrafficMetrics;
use crate::core::packet::Packet;
use crate::core::policy::RoutingDecision;
use crate::core::validation::EntryValidationResult;
use crate::runtime::router::HybridRouter;
use crate::runtime::validator::EntryValidator;

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Result of one gateway pass.
///
/// # Invariants
/// - `Routed` carries an ok validation; `Blocked` carries a blocked one.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayOutcome {
    /// The entry gate blocked the packet; no routing was attempted.
    Blocked(EntryValidationResult),
    /// The packet passed the gate and received a routing decision.
    Routed {
        /// Gate outcome, including risk score and audit flags.
        validation: EntryValidationResult,
        /// Total routing decision.
        decision: RoutingDecision,
    },
}

// ============================================================================
// SECTION: Gateway
// ============================================================================

/// Validate-then-route pipeline.
pub struct Gateway {
    /// Zero-Trust entry gate.
    validator: EntryValidator,
    /// Policy router.
    router: HybridRouter,
    /// Domain traffic counters.
    metrics: Arc<DomainTrafficMetrics>,
}

impl Gateway {
    /// Composes a gateway from its parts.
    #[must_use]
    pub fn new(
        validator: EntryValidator,
        router: HybridRouter,
        metrics: Arc<DomainTrafficMetrics>,
    ) -> Self {
        Self {
            validator,
            router,
            metrics,
        }
    }

    /// Returns the shared metrics collector.
    #[must_use]
    pub fn metrics(&self) -> &Arc<DomainTrafficMetrics> {
        &self.metrics
    }

    /// Returns the router, for admin access to the policy store.
    #[must_use]
    pub fn router(&self) -> &HybridRouter {
        &self.router
    }

    /// Processes one packet end to end.
    ///
    /// Validation blocks halt the pass before routing; routed outcomes are
    /// recorded in the domain metrics.
    #[must_use]
    pub fn process(
        &self,
        packet: &Packet,
        signature: Option<&PacketSignature>,
    ) -> GatewayOutcome {
        let validation = self.validator.validate_packet_entry(packet, signature);
        if validation.blocked {
            return GatewayOutcome::Blocked(validation);
        }

        let decision = self.router.route(packet, &validation);
        self.metrics.record_decision(packet.domain, packet.env, &decision);

        GatewayOutcome::Routed {
            validation,
            decision,
        }
    }
}
