// crates/edge-gate-core/tests/metrics.rs
// ============================================================================
// Module: Domain Traffic Metrics Tests
// Description: Validate per-domain counters and the Prometheus text render.
// Purpose: Ensure counters track routing decisions and render deterministically.
// ============================================================================

//! ## Overview
//! Exercises the domain traffic counters: attribution by domain and
//! environment, counter semantics per routing decision, and the Prometheus
//! exposition text.

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
    reason = "Test-only output and panic-based assertions are permitted."
)]

use edge_gate_core::Domain;
use edge_gate_core::DomainTrafficMetrics;
use edge_gate_core::Environment;
use edge_gate_core::RoutingDecision;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

fn forwarded_decision() -> RoutingDecision {
    RoutingDecision {
        policy: None,
        target_endpoint: Some("mqtt://x".to_string()),
        store_in_timeseries: true,
        store_in_object_storage: false,
        should_forward: true,
        reasons: Vec::new(),
    }
}

fn offline_decision() -> RoutingDecision {
    RoutingDecision {
        policy: None,
        target_endpoint: None,
        store_in_timeseries: true,
        store_in_object_storage: true,
        should_forward: false,
        reasons: Vec::new(),
    }
}

// ============================================================================
// SECTION: Counters
// ============================================================================

#[test]
fn forwarded_decision_increments_total_and_routed() {
    let metrics = DomainTrafficMetrics::new();
    metrics.record_decision(Domain::Industrial, Environment::Ground, &forwarded_decision());

    let counters = metrics.counters_for(Domain::Industrial, Environment::Ground);
    assert_eq!(counters.total, 1);
    assert_eq!(counters.routed, 1);
    assert_eq!(counters.offline, 0);
    assert_eq!(counters.ts_stored, 1);
    assert_eq!(counters.obj_stored, 0);
}

#[test]
fn held_decision_increments_offline() {
    let metrics = DomainTrafficMetrics::new();
    metrics.record_decision(Domain::Water, Environment::Air, &offline_decision());

    let counters = metrics.counters_for(Domain::Water, Environment::Air);
    assert_eq!(counters.total, 1);
    assert_eq!(counters.routed, 0);
    assert_eq!(counters.offline, 1);
    assert_eq!(counters.ts_stored, 1);
    assert_eq!(counters.obj_stored, 1);
}

#[test]
fn counters_are_keyed_by_domain_and_environment() {
    let metrics = DomainTrafficMetrics::new();
    metrics.record_decision(Domain::Medical, Environment::Ground, &forwarded_decision());
    metrics.record_decision(Domain::Medical, Environment::Orbit, &forwarded_decision());
    metrics.record_decision(Domain::Medical, Environment::Ground, &offline_decision());

    assert_eq!(metrics.counters_for(Domain::Medical, Environment::Ground).total, 2);
    assert_eq!(metrics.counters_for(Domain::Medical, Environment::Orbit).total, 1);
    assert_eq!(metrics.counters_for(Domain::Medical, Environment::Air).total, 0);
}

// ============================================================================
// SECTION: Prometheus Text
// ============================================================================

#[test]
fn render_emits_every_series_for_a_recorded_key() {
    let metrics = DomainTrafficMetrics::new();
    metrics.record_decision(Domain::Transport, Environment::Ground, &forwarded_decision());

    let text = metrics.render_prometheus_text();
    assert!(text.contains("edge_gate_packets_total{domain=\"transport\",env=\"ground\"} 1"));
    assert!(text.contains("edge_gate_packets_routed_total{domain=\"transport\",env=\"ground\"} 1"));
    assert!(text.contains("edge_gate_packets_offline_total{domain=\"transport\",env=\"ground\"} 0"));
    assert!(
        text.contains("edge_gate_packets_ts_stored_total{domain=\"transport\",env=\"ground\"} 1")
    );
    assert!(
        text.contains("edge_gate_packets_obj_stored_total{domain=\"transport\",env=\"ground\"} 0")
    );
}

#[test]
fn render_is_deterministic_across_insertion_orders() {
    let forward = forwarded_decision();

    let a = DomainTrafficMetrics::new();
    a.record_decision(Domain::Water, Environment::Ground, &forward);
    a.record_decision(Domain::Body, Environment::Air, &forward);

    let b = DomainTrafficMetrics::new();
    b.record_decision(Domain::Body, Environment::Air, &forward);
    b.record_decision(Domain::Water, Environment::Ground, &forward);

    assert_eq!(a.render_prometheus_text(), b.render_prometheus_text());
}

#[test]
fn render_of_empty_metrics_is_empty() {
    let metrics = DomainTrafficMetrics::new();
    assert!(metrics.render_prometheus_text().is_empty());
}
