// crates/edge-gate-scoring/src/lib.rs
// ============================================================================
// Module: Edge Gate Scoring
// Description: Built-in risk scorers for the Zero-Trust entry gate.
// Purpose: Provide zero-config risk scoring aligned with Edge Gate core.
// Dependencies: edge-gate-core, serde_json
// ============================================================================

//! ## Overview
//! This crate ships built-in implementations of the core
//! [`RiskScorer`](edge_gate_core::RiskScorer) trait: a deterministic
//! heuristic scorer driven by domain, priority, and payload size, plus fixed
//! and failing scorers for configuration fixtures and degraded-mode drills.
//! Invariants:
//! - Scores are clamped to `[0.0, 1.0]` before labeling.
//! - Scorers never inspect raw payload content; only serialized size counts.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod fixed;
pub mod heuristic;

#[cfg(test)]
mod tests;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use fixed::FailingRiskScorer;
pub use fixed::FixedRiskScorer;
pub use heuristic::HeuristicRiskScorer;
