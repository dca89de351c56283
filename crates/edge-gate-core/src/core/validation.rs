// crates/edge-gate-core/src/core/validation.rs
// ============================================================================
// Module: Edge Gate Validation Results
// Description: Entry-gate outcome values and block reasons.
// Purpose: Represent accept/block decisions as first-class results.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Validation blocks are not errors: every gate outcome is a structured
//! result reported to the caller and to audit/metrics, never silently
//! dropped. `ok` and `blocked` are mutually exclusive by construction.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Block Reasons
// ============================================================================

/// Reason a packet was blocked at the entry gate.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    /// No active key is registered for the packet's device.
    UnknownDevice,
    /// A supplied signature failed verification.
    InvalidSignature,
    /// The risk engine blocked the packet.
    RiskBlock,
    /// The risk engine was unavailable and the fail mode is closed.
    RiskUnavailable,
}

impl BlockReason {
    /// Returns a stable label for metrics and audit logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnknownDevice => "unknown_device",
            Self::InvalidSignature => "invalid_signature",
            Self::RiskBlock => "ml_risk_block",
            Self::RiskUnavailable => "risk_unavailable",
        }
    }
}

// ============================================================================
// SECTION: Entry Validation Result
// ============================================================================

/// Outcome of the Zero-Trust entry gate for one packet.
///
/// # Invariants
/// - `blocked == reason.is_some()`; an ok result carries no reason.
/// - `strict_audit` never lowers once set during a validation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryValidationResult {
    /// Whether the packet was blocked.
    pub blocked: bool,
    /// Block reason; `None` exactly when the packet passed.
    pub reason: Option<BlockReason>,
    /// Risk score reported by the engine, when one ran.
    pub risk_score: Option<f64>,
    /// Whether downstream layers must apply strict audit treatment.
    pub strict_audit: bool,
}

impl EntryValidationResult {
    /// Builds a passing result.
    #[must_use]
    pub const fn ok(risk_score: Option<f64>, strict_audit: bool) -> Self {
        Self {
            blocked: false,
            reason: None,
            risk_score,
            strict_audit,
        }
    }

    /// Builds a blocking result.
    #[must_use]
    pub const fn blocked(
        reason: BlockReason,
        risk_score: Option<f64>,
        strict_audit: bool,
    ) -> Self {
        Self {
            blocked: true,
            reason: Some(reason),
            risk_score,
            strict_audit,
        }
    }

    /// Returns whether the packet passed the gate.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        !self.blocked
    }
}
