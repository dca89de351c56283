// crates/edge-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Edge Gate Interfaces
// Description: Backend-agnostic interfaces for keys, policies, and risk scoring.
// Purpose: Define the contract surfaces the validator and router depend on.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Interfaces define how Edge Gate integrates with external backends (KMS,
//! config services, ML scoring) without embedding backend-specific details.
//! The in-memory reference implementations live in [`crate::runtime`];
//! external implementations are drop-in replacements as long as they honor
//! the same ordering and atomicity contracts.
//!
//! Security posture: interface implementations consume untrusted inputs and
//! must fail closed on missing or invalid data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::DeviceId;
use crate::core::identifiers::PolicyId;
use crate::core::keys::DeviceKey;
use crate::core::packet::Packet;
use crate::core::policy::Policy;

// ============================================================================
// SECTION: Device Key Store
// ============================================================================

/// Key store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum KeyStoreError {
    /// An active key already exists for the device and the registration
    /// mode rejects silent replacement.
    #[error("active key already registered for device {device_id}")]
    DuplicateActiveKey {
        /// Device that already holds an active key.
        device_id: DeviceId,
    },
    /// Backend store reported an error.
    #[error("key store error: {0}")]
    Store(String),
}

/// Mapping of device identity to the active signing key.
///
/// # Invariants
/// - At most one active key per device at any time.
/// - Reads are safe under concurrent writers; writes serialize per device so
///   two concurrent registrations never both believe they installed the
///   active key.
pub trait DeviceKeyStore: Send + Sync {
    /// Installs `key` as the active key for `key.device_id`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyStoreError::DuplicateActiveKey`] when an active key
    /// exists and the store's registration mode rejects replacement, or
    /// [`KeyStoreError::Store`] for backend failures. Failed registrations
    /// are never applied partially.
    fn register(&self, key: DeviceKey) -> Result<(), KeyStoreError>;

    /// Returns the single active key for `device_id`, or `None`.
    ///
    /// Never returns a default or guessed key.
    fn get_active_key(&self, device_id: &DeviceId) -> Option<DeviceKey>;

    /// Marks the active key for `device_id` inactive.
    ///
    /// Idempotent: revoking an already-revoked or unknown device is not an
    /// error. Subsequent [`DeviceKeyStore::get_active_key`] calls return `None`.
    fn revoke(&self, device_id: &DeviceId);
}

// ============================================================================
// SECTION: Policy Store
// ============================================================================

/// Policy store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum PolicyStoreError {
    /// A policy with the same identifier is already present.
    #[error("policy {policy_id} already exists")]
    DuplicatePolicy {
        /// Identifier that is already present.
        policy_id: PolicyId,
    },
    /// Backend store reported an error.
    #[error("policy store error: {0}")]
    Store(String),
}

/// Ordered collection of routing policies.
///
/// # Invariants
/// - Insertion order is preserved and significant: matching is
///   first-match-wins, not best-match.
/// - Reads never observe a partially applied `add`.
/// - Policy identifiers are unique; `add` checks and inserts atomically, so
///   two concurrent adds of one identifier never both succeed.
pub trait PolicyStore: Send + Sync {
    /// Appends `policy` to the ordered collection.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyStoreError::DuplicatePolicy`] when the identifier is
    /// already present (replacing a policy is remove-then-add), or
    /// [`PolicyStoreError::Store`] for backend failures. Failed adds are
    /// never applied partially or silently dropped.
    fn add(&self, policy: Policy) -> Result<(), PolicyStoreError>;

    /// Removes the policy with `policy_id`.
    ///
    /// Returns `false` (a no-op) when no such policy exists.
    fn remove(&self, policy_id: &PolicyId) -> bool;

    /// Returns a read-only snapshot in insertion order.
    fn all(&self) -> Vec<Policy>;

    /// Returns the first policy (in insertion order) matching `packet`.
    ///
    /// First-match-wins is deliberate: operator-predictable ordering beats
    /// specificity scoring.
    fn match_for_packet(&self, packet: &Packet) -> Option<Policy>;
}

// ============================================================================
// SECTION: Risk Scoring
// ============================================================================

/// Risk scoring errors, including degraded-dependency conditions.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - `Timeout` and `Unavailable` trigger the validator's configured fail
///   mode; they are never treated as a silent pass.
#[derive(Debug, Error)]
pub enum RiskError {
    /// The engine did not answer within its caller-supplied deadline.
    #[error("risk engine timed out")]
    Timeout,
    /// The engine is unreachable or failed internally.
    #[error("risk engine unavailable: {0}")]
    Unavailable(String),
}

/// Categorical risk label attached to an assessment.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLabel {
    /// Score below the medium band.
    Low,
    /// Score in the medium band.
    Medium,
    /// Score in the high band.
    High,
}

impl RiskLabel {
    /// Returns a stable label for metrics and audit logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of scoring one packet.
///
/// # Invariants
/// - `score` lies in `[0.0, 1.0]`.
/// - `reasons` lists the factors behind the score for audit/explainability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Risk score in `[0.0, 1.0]`.
    pub score: f64,
    /// Categorical label derived from the score.
    pub label: RiskLabel,
    /// Factors behind the score.
    pub reasons: Vec<String>,
}

/// Backend-agnostic packet risk scorer.
///
/// Implementations own their transport and timeout: a slow external model
/// must surface [`RiskError::Timeout`] rather than stall the gate.
pub trait RiskScorer: Send + Sync {
    /// Scores one packet.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError`] when the engine is degraded; the validator maps
    /// the failure through its configured fail mode.
    fn score(&self, packet: &Packet) -> Result<RiskAssessment, RiskError>;
}
