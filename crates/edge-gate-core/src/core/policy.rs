// crates/edge-gate-core/src/core/policy.rs
// ============================================================================
// Module: Edge Gate Policy Model
// Description: Routing policies and routing decisions.
// Purpose: Define the declarative rules the hybrid router evaluates.
// Dependencies: crate::core::{identifiers, packet}, serde
// ============================================================================

//! ## Overview
//! A policy is an immutable routing rule: an optional environment/domain
//! filter plus a priority floor, and the forwarding/storage outcome to apply
//! when it matches. Policies are evaluated first-match-wins in insertion
//! order; replacing a policy is remove-then-add.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::PolicyId;
use crate::core::packet::Domain;
use crate::core::packet::Environment;
use crate::core::packet::Packet;
use crate::core::packet::Priority;

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Declarative routing/storage rule matched against packet attributes.
///
/// # Invariants
/// - Immutable once added to a store.
/// - Absent match fields match everything; `min_priority = None` imposes no floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Policy identifier.
    pub policy_id: PolicyId,
    /// Human-readable policy name.
    pub name: String,
    /// Only match packets from this environment when set.
    #[serde(default)]
    pub match_environment: Option<Environment>,
    /// Only match packets from this domain when set.
    #[serde(default)]
    pub match_domain: Option<Domain>,
    /// Packet priority must be >= this floor when set.
    #[serde(default)]
    pub min_priority: Option<Priority>,
    /// Destination endpoint (URL or broker address) for forwarding.
    #[serde(default)]
    pub target_endpoint: Option<String>,
    /// Store matched packets in the time-series sink.
    pub store_in_timeseries: bool,
    /// Store matched packets in the object-storage sink.
    pub store_in_object_storage: bool,
    /// Require device authentication (consumed by outer gateway layers).
    pub require_auth: bool,
    /// Require packet integrity verification (consumed by outer gateway layers).
    pub require_integrity_check: bool,
    /// Require an encrypted channel (consumed by outer gateway layers).
    pub require_encryption: bool,
}

impl Policy {
    /// Returns whether the policy predicate matches `packet`.
    ///
    /// Absent filters match everything; the priority floor compares with the
    /// total order Low < Normal < High < Critical.
    #[must_use]
    pub fn matches(&self, packet: &Packet) -> bool {
        if self.match_environment.is_some_and(|env| env != packet.env) {
            return false;
        }
        if self.match_domain.is_some_and(|domain| domain != packet.domain) {
            return false;
        }
        if self.min_priority.is_some_and(|floor| packet.priority < floor) {
            return false;
        }
        true
    }
}

// ============================================================================
// SECTION: Routing Decision
// ============================================================================

/// Outcome of one routing pass; produced per packet and never persisted.
///
/// # Invariants
/// - `should_forward` is `true` only when `target_endpoint` is a non-empty
///   endpoint supplied by a matched policy; fallback decisions never forward.
/// - `reasons` is an append-only audit trail of decision factors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// Matched policy, or `None` when type-keyed defaults applied.
    pub policy: Option<Policy>,
    /// Destination endpoint when forwarding.
    pub target_endpoint: Option<String>,
    /// Store the packet in the time-series sink.
    pub store_in_timeseries: bool,
    /// Store the packet in the object-storage sink.
    pub store_in_object_storage: bool,
    /// Forward now (`true`) or defer to the offline buffer (`false`).
    pub should_forward: bool,
    /// Human-readable decision factors for audit.
    pub reasons: Vec<String>,
}
