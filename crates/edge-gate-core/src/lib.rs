// crates/edge-gate-core/src/lib.rs
// ============================================================================
// Module: Edge Gate Core
// Description: Routing-and-validation pipeline for IoT/edge telemetry.
// Purpose: Provide the Zero-Trust entry gate and policy router.
// Dependencies: serde, serde_json, serde_jcs, hmac, sha2, subtle, hex, thiserror
// ============================================================================

//! ## Overview
//! Edge Gate routes telemetry/control packets from heterogeneous edge
//! devices to downstream sinks according to domain- and environment-aware
//! policies, enforcing a Zero-Trust entry gate (device identity, packet
//! integrity, optional risk scoring) before any routing decision.
//!
//! The crate splits into:
//! - [`core`]: value types for packets, keys, policies, signatures, and outcomes.
//! - [`interfaces`]: backend-agnostic traits for key stores, policy stores,
//!   and risk scorers.
//! - [`runtime`]: the entry validator, hybrid router, gateway pipeline, and
//!   in-memory reference stores.
//!
//! Security posture: packets, signatures, and admin inputs are untrusted;
//! every gate outcome is a structured result and verification fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::identifiers::DeviceId;
pub use crate::core::identifiers::KeyId;
pub use crate::core::identifiers::PacketId;
pub use crate::core::identifiers::PolicyId;
pub use crate::core::identifiers::TraceId;
pub use crate::core::integrity::IntegrityError;
pub use crate::core::integrity::PacketSignature;
pub use crate::core::integrity::SIGNATURE_LEN;
pub use crate::core::integrity::canonical_packet_bytes;
pub use crate::core::integrity::sign_packet;
pub use crate::core::integrity::verify_packet;
pub use crate::core::keys::DeviceKey;
pub use crate::core::keys::KeyAlgorithm;
pub use crate::core::keys::KeyRegistration;
pub use crate::core::metrics::DomainCounters;
pub use crate::core::metrics::DomainTrafficMetrics;
pub use crate::core::packet::Domain;
pub use crate::core::packet::Environment;
pub use crate::core::packet::Packet;
pub use crate::core::packet::PacketType;
pub use crate::core::packet::Priority;
pub use crate::core::policy::Policy;
pub use crate::core::policy::RoutingDecision;
pub use crate::core::validation::BlockReason;
pub use crate::core::validation::EntryValidationResult;
pub use crate::interfaces::DeviceKeyStore;
pub use crate::interfaces::KeyStoreError;
pub use crate::interfaces::PolicyStore;
pub use crate::interfaces::PolicyStoreError;
pub use crate::interfaces::RiskAssessment;
pub use crate::interfaces::RiskError;
pub use crate::interfaces::RiskLabel;
pub use crate::interfaces::RiskScorer;
