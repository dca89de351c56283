// crates/edge-gate-scoring/src/heuristic.rs
// ============================================================================
// Module: Heuristic Risk Scorer
// Description: Deterministic risk scoring from packet shape.
// Purpose: Score packets without a model: domain, priority, payload size.
// Dependencies: edge-gate-core, serde_json
// ============================================================================

//! ## Overview
//! The heuristic scorer assigns additive weights per risk factor and clamps
//! the sum to `[0.0, 1.0]`. Elevated-impact domains and urgent priorities
//! weigh more; oversized payloads add a fixed bump. Every contributing
//! factor is recorded as a reason string so audit trails can explain the
//! score without re-running the scorer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use edge_gate_core::Domain;
use edge_gate_core::Packet;
use edge_gate_core::Priority;
use edge_gate_core::RiskAssessment;
use edge_gate_core::RiskError;
use edge_gate_core::RiskLabel;
use edge_gate_core::RiskScorer;

// ============================================================================
// SECTION: Weights
// ============================================================================

/// Payload size above which the oversize bump applies, in bytes.
const OVERSIZE_PAYLOAD_BYTES: usize = 1024 * 1024;

/// Additive weight for payloads above [`OVERSIZE_PAYLOAD_BYTES`].
const OVERSIZE_WEIGHT: f64 = 0.2;

/// Score floor for the `High` label.
const HIGH_LABEL_FLOOR: f64 = 0.7;

/// Score floor for the `Medium` label.
const MEDIUM_LABEL_FLOOR: f64 = 0.4;

/// Returns the additive weight for a packet's domain.
const fn domain_weight(domain: Domain) -> f64 {
    match domain {
        Domain::Body => 0.4,
        Domain::Medical => 0.3,
        Domain::Water | Domain::Transport => 0.2,
        Domain::Agriculture => 0.1,
        Domain::SmartCity | Domain::Industrial | Domain::Other => 0.0,
    }
}

/// Returns the additive weight for a packet's priority.
const fn priority_weight(priority: Priority) -> f64 {
    match priority {
        Priority::Critical => 0.5,
        Priority::High => 0.3,
        Priority::Normal => 0.1,
        Priority::Low => 0.0,
    }
}

// ============================================================================
// SECTION: Scorer
// ============================================================================

/// Deterministic additive-weight risk scorer.
///
/// # Invariants
/// - Scoring is a pure function of the packet; equal packets score equally.
/// - The returned score is clamped to `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicRiskScorer;

impl HeuristicRiskScorer {
    /// Creates the scorer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl RiskScorer for HeuristicRiskScorer {
    fn score(&self, packet: &Packet) -> Result<RiskAssessment, RiskError> {
        let mut score = 0.0;
        let mut reasons = Vec::new();

        let domain = domain_weight(packet.domain);
        if domain > 0.0 {
            score += domain;
            reasons.push(format!("domain:{}", packet.domain));
        }

        let priority = priority_weight(packet.priority);
        if priority > 0.0 {
            score += priority;
            reasons.push(format!("priority:{}", packet.priority));
        }

        let payload_bytes = serde_json::to_vec(&packet.data).map_or(0, |bytes| bytes.len());
        if payload_bytes > OVERSIZE_PAYLOAD_BYTES {
            score += OVERSIZE_WEIGHT;
            reasons.push("size:>1MiB".to_string());
        }

        let score = score.clamp(0.0, 1.0);
        let label = if score >= HIGH_LABEL_FLOOR {
            RiskLabel::High
        } else if score >= MEDIUM_LABEL_FLOOR {
            RiskLabel::Medium
        } else {
            RiskLabel::Low
        };
        reasons.push(format!("label:{label}"));

        Ok(RiskAssessment {
            score,
            label,
            reasons,
        })
    }
}
