// crates/edge-gate-scoring/src/fixed.rs
// ============================================================================
// Module: Fixed and Failing Scorers
// Description: Constant-score and always-degraded scorer fixtures.
// Purpose: Support configuration pinning and degraded-mode drills.
// Dependencies: edge-gate-core
// ============================================================================

//! ## Overview
//! `FixedRiskScorer` returns a constant assessment; deployments pin it via
//! configuration to force a verdict band, and tests use it to drive the
//! validator's thresholds. `FailingRiskScorer` always reports a degraded
//! engine, exercising the fail-open/fail-closed paths end to end.

// ============================================================================
// SECTION: Imports
// ============================================================================

use edge_gate_core::Packet;
use edge_gate_core::RiskAssessment;
use edge_gate_core::RiskError;
use edge_gate_core::RiskLabel;
use edge_gate_core::RiskScorer;

// ============================================================================
// SECTION: Fixed Scorer
// ============================================================================

/// Scorer returning a constant score for every packet.
///
/// # Invariants
/// - The configured score is clamped to `[0.0, 1.0]` at construction.
#[derive(Debug, Clone, Copy)]
pub struct FixedRiskScorer {
    /// Constant score returned for every packet.
    score: f64,
}

impl FixedRiskScorer {
    /// Creates a scorer that always returns `score`, clamped to `[0.0, 1.0]`.
    #[must_use]
    pub fn new(score: f64) -> Self {
        Self {
            score: score.clamp(0.0, 1.0),
        }
    }
}

impl RiskScorer for FixedRiskScorer {
    fn score(&self, _packet: &Packet) -> Result<RiskAssessment, RiskError> {
        let label = if self.score >= 0.7 {
            RiskLabel::High
        } else if self.score >= 0.4 {
            RiskLabel::Medium
        } else {
            RiskLabel::Low
        };
        Ok(RiskAssessment {
            score: self.score,
            label,
            reasons: vec!["fixed_score".to_string()],
        })
    }
}

// ============================================================================
// SECTION: Failing Scorer
// ============================================================================

/// Scorer that always reports a degraded engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingRiskScorer;

impl FailingRiskScorer {
    /// Creates the scorer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl RiskScorer for FailingRiskScorer {
    fn score(&self, _packet: &Packet) -> Result<RiskAssessment, RiskError> {
        Err(RiskError::Unavailable("failing scorer".to_string()))
    }
}
