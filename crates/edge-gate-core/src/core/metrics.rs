// crates/edge-gate-core/src/core/metrics.rs
// ============================================================================
// Module: Edge Gate Domain Metrics
// Description: Per-(domain, environment) traffic counters.
// Purpose: Observe routing outcomes without binding to an exporter.
// Dependencies: crate::core::{packet, policy}
// ============================================================================

//! ## Overview
//! The collector counts completed routing passes keyed by `(domain, env)`:
//! total, routed vs. offline, and per-sink storage. Rendering uses the
//! Prometheus text exposition shape so pull-based scrapers can consume it
//! directly, but nothing here depends on an exporter library; deployments
//! can bridge the counters into their own pipeline without redesign.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Mutex;

use crate::core::packet::Domain;
use crate::core::packet::Environment;
use crate::core::policy::RoutingDecision;

// ============================================================================
// SECTION: Counters
// ============================================================================

/// Counter set for one `(domain, env)` pair.
///
/// # Invariants
/// - `total == routed + offline` for every completed routing pass recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomainCounters {
    /// Completed routing passes.
    pub total: u64,
    /// Decisions with `should_forward == true`.
    pub routed: u64,
    /// Decisions deferred to the offline buffer.
    pub offline: u64,
    /// Decisions storing into the time-series sink.
    pub ts_stored: u64,
    /// Decisions storing into the object-storage sink.
    pub obj_stored: u64,
}

// ============================================================================
// SECTION: Collector
// ============================================================================

/// Thread-safe per-(domain, environment) traffic metrics.
///
/// # Invariants
/// - Counter keys iterate in a deterministic order (`BTreeMap`), so rendered
///   exposition text is stable for equal counter states.
#[derive(Debug, Default)]
pub struct DomainTrafficMetrics {
    /// Counters keyed by `(domain, env)`.
    counters: Mutex<BTreeMap<(Domain, Environment), DomainCounters>>,
}

impl DomainTrafficMetrics {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one completed routing pass.
    pub fn record_decision(
        &self,
        domain: Domain,
        env: Environment,
        decision: &RoutingDecision,
    ) {
        let Ok(mut counters) = self.counters.lock() else {
            // A poisoned lock means a panic elsewhere; drop the observation
            // rather than propagate.
            return;
        };
        let entry = counters.entry((domain, env)).or_default();
        entry.total += 1;
        if decision.should_forward {
            entry.routed += 1;
        } else {
            entry.offline += 1;
        }
        if decision.store_in_timeseries {
            entry.ts_stored += 1;
        }
        if decision.store_in_object_storage {
            entry.obj_stored += 1;
        }
    }

    /// Returns a snapshot of the counters for one `(domain, env)` pair.
    #[must_use]
    pub fn counters_for(&self, domain: Domain, env: Environment) -> DomainCounters {
        self.counters
            .lock()
            .ok()
            .and_then(|counters| counters.get(&(domain, env)).copied())
            .unwrap_or_default()
    }

    /// Renders the counters in Prometheus text exposition format.
    ///
    /// Output order is deterministic: series sort by `(domain, env)` key.
    #[must_use]
    pub fn render_prometheus_text(&self) -> String {
        let Ok(counters) = self.counters.lock() else {
            return String::new();
        };
        let mut out = String::new();
        for ((domain, env), c) in counters.iter() {
            let labels = format!("domain=\"{domain}\",env=\"{env}\"");
            let _ = writeln!(out, "edge_gate_packets_total{{{labels}}} {}", c.total);
            let _ = writeln!(out, "edge_gate_packets_routed_total{{{labels}}} {}", c.routed);
            let _ = writeln!(out, "edge_gate_packets_offline_total{{{labels}}} {}", c.offline);
            let _ = writeln!(out, "edge_gate_packets_ts_stored_total{{{labels}}} {}", c.ts_stored);
            let _ =
                writeln!(out, "edge_gate_packets_obj_stored_total{{{labels}}} {}", c.obj_stored);
        }
        out
    }
}
