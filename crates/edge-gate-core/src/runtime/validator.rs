// crates/edge-gate-core/src/runtime/validator.rs
// ============================================================================
// Module: Entry Validator
// Description: Zero-Trust entry gate ahead of routing.
// Purpose: Combine key lookup, integrity verification, and risk scoring.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The entry validator is a pure function of the packet, the optional
//! signature, and the key-store/risk-engine state. It never mutates the
//! packet and recovers every block or degraded outcome into an
//! [`EntryValidationResult`]; nothing throws across the gate boundary.
//!
//! Step order is fixed: key lookup, then signature verification, then risk
//! scoring. Earlier blocks short-circuit later steps. Elevated-security
//! domains (medical, body, water, agriculture) never lower `strict_audit`
//! once any step sets it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::core::integrity::PacketSignature;
use crate::core::integrity::verify_packet;
use crate::core::packet::Packet;
use crate::core::validation::BlockReason;
use crate::core::validation::EntryValidationResult;
use crate::interfaces::DeviceKeyStore;
use crate::interfaces::RiskAssessment;
use crate::interfaces::RiskError;
use crate::interfaces::RiskScorer;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default score at or above which the risk engine blocks.
pub const DEFAULT_BLOCK_THRESHOLD: f64 = 0.9;
/// Default score at or above which the risk engine demands strict audit.
pub const DEFAULT_AUDIT_THRESHOLD: f64 = 0.7;

// ============================================================================
// SECTION: Fail Mode
// ============================================================================

/// Outcome policy when the risk engine is unavailable.
///
/// # Invariants
/// - `Closed` blocks; `Open` passes with `strict_audit` forced on.
///   Neither is ever a silent ok.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailMode {
    /// Block the packet when the engine is degraded.
    Closed,
    /// Pass the packet with strict audit when the engine is degraded.
    Open,
}

/// Validator configuration.
///
/// # Invariants
/// - `elevated_fail_mode` applies to elevated-security domains and defaults
///   to fail-closed; `fail_mode` covers everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Degraded-engine outcome for standard domains.
    pub fail_mode: FailMode,
    /// Degraded-engine outcome for elevated-security domains.
    pub elevated_fail_mode: FailMode,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            fail_mode: FailMode::Open,
            elevated_fail_mode: FailMode::Closed,
        }
    }
}

// ============================================================================
// SECTION: Risk Engine
// ============================================================================

/// Verdict derived from a risk assessment against configured thresholds.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskVerdict {
    /// Score below the audit threshold.
    Allow,
    /// Score at or above the audit threshold but below the block threshold.
    Audit,
    /// Score at or above the block threshold.
    Block,
}

/// Risk engine wrapping a scorer with block/audit thresholds.
///
/// # Invariants
/// - `block_threshold >= audit_threshold`; both lie in `[0.0, 1.0]`.
pub struct RiskEngine {
    /// Injected scorer backend.
    scorer: Arc<dyn RiskScorer>,
    /// Score at or above which packets block.
    block_threshold: f64,
    /// Score at or above which packets demand strict audit.
    audit_threshold: f64,
}

impl RiskEngine {
    /// Creates an engine with the default thresholds (0.9 block, 0.7 audit).
    #[must_use]
    pub fn new(scorer: Arc<dyn RiskScorer>) -> Self {
        Self::with_thresholds(scorer, DEFAULT_BLOCK_THRESHOLD, DEFAULT_AUDIT_THRESHOLD)
    }

    /// Creates an engine with explicit thresholds.
    #[must_use]
    pub fn with_thresholds(
        scorer: Arc<dyn RiskScorer>,
        block_threshold: f64,
        audit_threshold: f64,
    ) -> Self {
        Self {
            scorer,
            block_threshold,
            audit_threshold,
        }
    }

    /// Scores `packet` and derives the threshold verdict.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError`] when the scorer is degraded.
    pub fn evaluate(&self, packet: &Packet) -> Result<(RiskAssessment, RiskVerdict), RiskError> {
        let assessment = self.scorer.score(packet)?;
        let verdict = if assessment.score >= self.block_threshold {
            RiskVerdict::Block
        } else if assessment.score >= self.audit_threshold {
            RiskVerdict::Audit
        } else {
            RiskVerdict::Allow
        };
        Ok((assessment, verdict))
    }
}

// ============================================================================
// SECTION: Entry Validator
// ============================================================================

/// Zero-Trust entry gate consulted before any routing decision.
pub struct EntryValidator {
    /// Key store resolving device identity.
    key_store: Arc<dyn DeviceKeyStore>,
    /// Optional risk engine; absent means the risk step is skipped.
    risk_engine: Option<RiskEngine>,
    /// Degraded-mode configuration.
    config: ValidatorConfig,
}

impl EntryValidator {
    /// Creates a validator without a risk engine.
    #[must_use]
    pub fn new(key_store: Arc<dyn DeviceKeyStore>) -> Self {
        Self {
            key_store,
            risk_engine: None,
            config: ValidatorConfig::default(),
        }
    }

    /// Attaches a risk engine.
    #[must_use]
    pub fn with_risk_engine(mut self, engine: RiskEngine) -> Self {
        self.risk_engine = Some(engine);
        self
    }

    /// Overrides the degraded-mode configuration.
    #[must_use]
    pub const fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Validates one packet at the gate.
    ///
    /// Steps, each short-circuiting the rest on block:
    /// 1. Resolve the active device key; absent blocks as `UnknownDevice`.
    /// 2. Verify a supplied signature; failure blocks as `InvalidSignature`
    ///    with `strict_audit` forced on regardless of domain.
    /// 3. Consult the risk engine when configured; a block verdict blocks as
    ///    `RiskBlock`, and a degraded engine resolves through the configured
    ///    fail mode.
    ///
    /// A missing signature on an elevated-security domain passes with
    /// `strict_audit` set: a soft warning carried forward, not a block.
    #[must_use]
    pub fn validate_packet_entry(
        &self,
        packet: &Packet,
        signature: Option<&PacketSignature>,
    ) -> EntryValidationResult {
        let elevated = packet.domain.is_elevated_security();

        let Some(key) = self.key_store.get_active_key(&packet.device_id) else {
            return EntryValidationResult::blocked(BlockReason::UnknownDevice, None, elevated);
        };

        if let Some(signature) = signature
            && !verify_packet(packet, signature, &key)
        {
            // A failed signature always demands strict audit.
            return EntryValidationResult::blocked(BlockReason::InvalidSignature, None, true);
        }

        let mut strict_audit = elevated && signature.is_none();
        let mut risk_score = None;

        if let Some(engine) = &self.risk_engine {
            match engine.evaluate(packet) {
                Ok((assessment, verdict)) => {
                    risk_score = Some(assessment.score);
                    match verdict {
                        RiskVerdict::Block => {
                            return EntryValidationResult::blocked(
                                BlockReason::RiskBlock,
                                risk_score,
                                true,
                            );
                        }
                        RiskVerdict::Audit => strict_audit = true,
                        RiskVerdict::Allow => {}
                    }
                }
                Err(_) => {
                    let mode = if elevated {
                        self.config.elevated_fail_mode
                    } else {
                        self.config.fail_mode
                    };
                    match mode {
                        FailMode::Closed => {
                            return EntryValidationResult::blocked(
                                BlockReason::RiskUnavailable,
                                None,
                                true,
                            );
                        }
                        // Fail-open is never a silent ok: strict audit is
                        // forced on.
                        FailMode::Open => strict_audit = true,
                    }
                }
            }
        }

        EntryValidationResult::ok(risk_score, strict_audit)
    }
}
