// crates/edge-gate-scoring/src/tests.rs
// ============================================================================
// Module: Scoring Tests
// Description: Unit tests for the built-in risk scorers.
// Purpose: Pin scorer weights, labels, and reason strings.
// Dependencies: edge-gate-core, serde_json
// ============================================================================

//! ## Overview
//! Unit tests for the heuristic, fixed, and failing scorers.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::float_cmp,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::BTreeMap;

use edge_gate_core::Domain;
use edge_gate_core::Environment;
use edge_gate_core::Packet;
use edge_gate_core::PacketType;
use edge_gate_core::Priority;
use edge_gate_core::RiskError;
use edge_gate_core::RiskLabel;
use edge_gate_core::RiskScorer;
use serde_json::Map;
use serde_json::Value;

use crate::FailingRiskScorer;
use crate::FixedRiskScorer;
use crate::HeuristicRiskScorer;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

fn packet(domain: Domain, priority: Priority) -> Packet {
    Packet {
        packet_id: "pkt-1".into(),
        device_id: "d1".into(),
        env: Environment::Ground,
        domain,
        packet_type: PacketType::Telemetry,
        priority,
        data: Map::new(),
        metadata: BTreeMap::new(),
        trace_id: None,
    }
}

// ============================================================================
// SECTION: Heuristic Scorer
// ============================================================================

#[test]
fn quiet_packet_scores_zero_with_low_label() {
    let assessment =
        HeuristicRiskScorer::new().score(&packet(Domain::Other, Priority::Low)).expect("score");

    assert_eq!(assessment.score, 0.0);
    assert_eq!(assessment.label, RiskLabel::Low);
    assert_eq!(assessment.reasons, vec!["label:low".to_string()]);
}

#[test]
fn domain_and_priority_weights_add_up() {
    // Body (0.4) + Critical (0.5) = 0.9.
    let assessment =
        HeuristicRiskScorer::new().score(&packet(Domain::Body, Priority::Critical)).expect("score");

    assert!((assessment.score - 0.9).abs() < 1e-9);
    assert_eq!(assessment.label, RiskLabel::High);
    assert!(assessment.reasons.contains(&"domain:body".to_string()));
    assert!(assessment.reasons.contains(&"priority:critical".to_string()));
    assert!(assessment.reasons.contains(&"label:high".to_string()));
}

#[test]
fn medium_band_packets_label_medium() {
    // Medical (0.3) + High (0.3) = 0.6.
    let assessment =
        HeuristicRiskScorer::new().score(&packet(Domain::Medical, Priority::High)).expect("score");

    assert!((assessment.score - 0.6).abs() < 1e-9);
    assert_eq!(assessment.label, RiskLabel::Medium);
}

#[test]
fn oversize_payload_adds_the_size_bump() {
    let mut pkt = packet(Domain::Other, Priority::Low);
    // A single string value larger than 1 MiB once serialized.
    let blob = "x".repeat(1024 * 1024 + 64);
    pkt.data.insert("blob".to_string(), Value::String(blob));

    let assessment = HeuristicRiskScorer::new().score(&pkt).expect("score");
    assert!((assessment.score - 0.2).abs() < 1e-9);
    assert!(assessment.reasons.contains(&"size:>1MiB".to_string()));
}

#[test]
fn score_clamps_at_one() {
    let mut pkt = packet(Domain::Body, Priority::Critical);
    let blob = "x".repeat(1024 * 1024 + 64);
    pkt.data.insert("blob".to_string(), Value::String(blob));

    // 0.4 + 0.5 + 0.2 clamps to 1.0.
    let assessment = HeuristicRiskScorer::new().score(&pkt).expect("score");
    assert_eq!(assessment.score, 1.0);
    assert_eq!(assessment.label, RiskLabel::High);
}

#[test]
fn scoring_is_deterministic() {
    let pkt = packet(Domain::Water, Priority::Normal);
    let a = HeuristicRiskScorer::new().score(&pkt).expect("score");
    let b = HeuristicRiskScorer::new().score(&pkt).expect("score");
    assert_eq!(a, b);
}

// ============================================================================
// SECTION: Fixed and Failing Scorers
// ============================================================================

#[test]
fn fixed_scorer_returns_its_clamped_score() {
    let pkt = packet(Domain::Other, Priority::Low);

    let high = FixedRiskScorer::new(1.5).score(&pkt).expect("score");
    assert_eq!(high.score, 1.0);
    assert_eq!(high.label, RiskLabel::High);

    let medium = FixedRiskScorer::new(0.5).score(&pkt).expect("score");
    assert_eq!(medium.score, 0.5);
    assert_eq!(medium.label, RiskLabel::Medium);

    let low = FixedRiskScorer::new(-0.5).score(&pkt).expect("score");
    assert_eq!(low.score, 0.0);
    assert_eq!(low.label, RiskLabel::Low);
}

#[test]
fn failing_scorer_always_reports_unavailable() {
    let result = FailingRiskScorer::new().score(&packet(Domain::Other, Priority::Low));
    assert!(matches!(result, Err(RiskError::Unavailable(_))));
}
