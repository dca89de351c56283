// crates/edge-gate-core/tests/gateway.rs
// ============================================================================
// Module: Gateway Pipeline Tests
// Description: End-to-end validate-then-route checks.
// Purpose: Ensure blocks halt routing and routed passes feed the metrics.
// ============================================================================

//! ## Overview
//! Exercises the full gateway pass: signed packets flowing through policy
//! routing, blocked packets never reaching the router, and metrics
//! attribution for completed passes.

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

use std::collections::BTreeMap;
use std::sync::Arc;

use edge_gate_core::BlockReason;
use edge_gate_core::DeviceKey;
use edge_gate_core::DeviceKeyStore;
use edge_gate_core::Domain;
use edge_gate_core::DomainTrafficMetrics;
use edge_gate_core::Environment;
use edge_gate_core::KeyAlgorithm;
use edge_gate_core::Packet;
use edge_gate_core::PacketType;
use edge_gate_core::Policy;
use edge_gate_core::PolicyStore;
use edge_gate_core::Priority;
use edge_gate_core::runtime::EntryValidator;
use edge_gate_core::runtime::Gateway;
use edge_gate_core::runtime::GatewayOutcome;
use edge_gate_core::runtime::HybridRouter;
use edge_gate_core::runtime::InMemoryDeviceKeyStore;
use edge_gate_core::runtime::InMemoryPolicyStore;
use edge_gate_core::sign_packet;
use serde_json::Map;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

fn device_key() -> DeviceKey {
    DeviceKey {
        device_id: "sensor-7".into(),
        key_id: "k1".into(),
        secret: b"attested-secret".to_vec(),
        algorithm: KeyAlgorithm::HmacSha256,
    }
}

fn packet(domain: Domain, packet_type: PacketType, priority: Priority) -> Packet {
    Packet {
        packet_id: "pkt-1".into(),
        device_id: "sensor-7".into(),
        env: Environment::Ground,
        domain,
        packet_type,
        priority,
        data: Map::new(),
        metadata: BTreeMap::new(),
        trace_id: None,
    }
}

fn gateway_with_policies(policies: Vec<Policy>) -> Gateway {
    let keys = Arc::new(InMemoryDeviceKeyStore::new());
    keys.register(device_key()).expect("register");
    let store = Arc::new(InMemoryPolicyStore::new());
    for p in policies {
        store.add(p).expect("add policy");
    }
    Gateway::new(
        EntryValidator::new(keys),
        HybridRouter::new(store),
        Arc::new(DomainTrafficMetrics::new()),
    )
}

fn forwarding_policy(id: &str, domain: Domain) -> Policy {
    Policy {
        policy_id: id.into(),
        name: id.to_string(),
        match_environment: None,
        match_domain: Some(domain),
        min_priority: None,
        target_endpoint: Some("mqtt://sink".to_string()),
        store_in_timeseries: true,
        store_in_object_storage: false,
        require_auth: true,
        require_integrity_check: true,
        require_encryption: false,
    }
}

// ============================================================================
// SECTION: End-to-End Passes
// ============================================================================

#[test]
fn signed_packet_routes_through_a_matching_policy() {
    let gateway =
        gateway_with_policies(vec![forwarding_policy("industrial", Domain::Industrial)]);
    let pkt = packet(Domain::Industrial, PacketType::Telemetry, Priority::High);
    let signature = sign_packet(&pkt, &device_key()).expect("sign");

    let outcome = gateway.process(&pkt, Some(&signature));
    let GatewayOutcome::Routed {
        validation,
        decision,
    } = outcome
    else {
        panic!("expected routed outcome, got {outcome:?}");
    };
    assert!(validation.is_ok());
    assert!(decision.should_forward);
    assert_eq!(decision.target_endpoint.as_deref(), Some("mqtt://sink"));
}

#[test]
fn unsigned_packet_from_registered_device_falls_back_when_no_policy_matches() {
    let gateway = gateway_with_policies(Vec::new());
    let pkt = packet(Domain::Industrial, PacketType::Telemetry, Priority::Normal);

    let outcome = gateway.process(&pkt, None);
    let GatewayOutcome::Routed { decision, .. } = outcome else {
        panic!("expected routed outcome, got {outcome:?}");
    };
    assert!(!decision.should_forward);
    assert!(decision.store_in_timeseries);
}

// ============================================================================
// SECTION: Blocking
// ============================================================================

#[test]
fn blocked_packet_never_touches_the_metrics() {
    let gateway = gateway_with_policies(Vec::new());
    let mut pkt = packet(Domain::Medical, PacketType::Alert, Priority::Critical);
    pkt.device_id = "ghost".into();

    let outcome = gateway.process(&pkt, None);
    let GatewayOutcome::Blocked(validation) = outcome else {
        panic!("expected blocked outcome, got {outcome:?}");
    };
    assert_eq!(validation.reason, Some(BlockReason::UnknownDevice));

    let counters = gateway.metrics().counters_for(Domain::Medical, Environment::Ground);
    assert_eq!(counters.total, 0);
}

#[test]
fn tampered_signature_blocks_before_routing() {
    let gateway =
        gateway_with_policies(vec![forwarding_policy("industrial", Domain::Industrial)]);
    let pkt = packet(Domain::Industrial, PacketType::Telemetry, Priority::High);
    let signature = sign_packet(&pkt, &device_key()).expect("sign");

    let mut tampered = pkt.clone();
    tampered.priority = Priority::Critical;
    let outcome = gateway.process(&tampered, Some(&signature));
    let GatewayOutcome::Blocked(validation) = outcome else {
        panic!("expected blocked outcome, got {outcome:?}");
    };
    assert_eq!(validation.reason, Some(BlockReason::InvalidSignature));
}

// ============================================================================
// SECTION: Metrics Attribution
// ============================================================================

#[test]
fn routed_passes_accumulate_in_the_domain_counters() {
    let gateway =
        gateway_with_policies(vec![forwarding_policy("industrial", Domain::Industrial)]);

    let routed = packet(Domain::Industrial, PacketType::Telemetry, Priority::High);
    let held = packet(Domain::Water, PacketType::Control, Priority::Normal);

    let _ = gateway.process(&routed, None);
    let _ = gateway.process(&routed, None);
    let _ = gateway.process(&held, None);

    let industrial = gateway.metrics().counters_for(Domain::Industrial, Environment::Ground);
    assert_eq!(industrial.total, 2);
    assert_eq!(industrial.routed, 2);

    let water = gateway.metrics().counters_for(Domain::Water, Environment::Ground);
    assert_eq!(water.total, 1);
    assert_eq!(water.offline, 1);
}
