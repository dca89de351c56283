// crates/edge-gate-core/src/core/integrity.rs
// ============================================================================
// Module: Edge Gate Packet Integrity
// Description: Canonical packet serialization and HMAC sign/verify.
// Purpose: Provide the bit-exact signing contract shared by devices and the gate.
// Dependencies: crate::core::{keys, packet}, serde, serde_jcs, hmac, sha2, subtle, hex
// ============================================================================

//! ## Overview
//! The canonical form produced here is the only thing ever signed. Signed
//! fields are projected into a JSON object and serialized with RFC 8785
//! canonical JSON (JCS): object keys sort lexicographically, numbers
//! normalize, and the output is byte-identical for semantically equal
//! packets. Any change to a signed field changes the output.
//!
//! Verification recomputes the MAC and compares in constant time. It reports
//! `bool`, never an error: a malformed signature, a key for an unsupported
//! algorithm, or a canonicalization failure all verify as `false`, and the
//! caller decides escalation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use hmac::Hmac;
use hmac::Mac;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde_json::Map;
use serde_json::Value;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::core::identifiers::DeviceId;
use crate::core::identifiers::PacketId;
use crate::core::keys::DeviceKey;
use crate::core::keys::KeyAlgorithm;
use crate::core::packet::Domain;
use crate::core::packet::Environment;
use crate::core::packet::Packet;
use crate::core::packet::PacketType;
use crate::core::packet::Priority;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// MAC output length in bytes for all supported algorithms.
pub const SIGNATURE_LEN: usize = 32;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Integrity errors surfaced to signing callers.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Verification never returns these; only signing and canonicalization do.
#[derive(Debug, Error)]
pub enum IntegrityError {
    /// Canonical serialization failed.
    #[error("packet canonicalization failed: {0}")]
    Canonicalization(String),
    /// MAC construction failed for the supplied key material.
    #[error("mac construction failed: {0}")]
    Mac(String),
}

// ============================================================================
// SECTION: Packet Signature
// ============================================================================

/// MAC over the canonical bytes of a packet.
///
/// # Invariants
/// - Always exactly [`SIGNATURE_LEN`] bytes.
/// - Wire form is lower-case hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketSignature([u8; SIGNATURE_LEN]);

impl PacketSignature {
    /// Wraps raw MAC bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    /// Parses a lower- or upper-case hex signature.
    ///
    /// Returns `None` for any string that is not exactly
    /// [`SIGNATURE_LEN`] bytes of hex.
    #[must_use]
    pub fn from_hex(hex_str: &str) -> Option<Self> {
        let decoded = hex::decode(hex_str).ok()?;
        let bytes: [u8; SIGNATURE_LEN] = decoded.try_into().ok()?;
        Some(Self(bytes))
    }

    /// Returns the raw MAC bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    /// Returns the lower-case hex wire form.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for PacketSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for PacketSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PacketSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text)
            .ok_or_else(|| serde::de::Error::custom("signature must be 32 bytes of hex"))
    }
}

// ============================================================================
// SECTION: Canonical Form
// ============================================================================

/// Projection of the signed packet fields.
///
/// # Invariants
/// - Contains exactly the signed fields; `trace_id` and any future
///   transport metadata stay out.
#[derive(Serialize)]
struct SignedFields<'a> {
    /// Packet identifier.
    packet_id: &'a PacketId,
    /// Originating device identifier.
    device_id: &'a DeviceId,
    /// Physical delivery medium.
    env: Environment,
    /// Industry vertical.
    domain: Domain,
    /// Event class.
    packet_type: PacketType,
    /// Processing priority.
    priority: Priority,
    /// String annotations with stable (lexicographic) key order.
    metadata: &'a BTreeMap<String, String>,
    /// Structured payload.
    data: &'a Map<String, Value>,
}

/// Produces the canonical byte form of a packet's signed fields.
///
/// Two calls on semantically equal packets always produce identical bytes;
/// any change to a signed field changes the output. This is the sole input
/// to [`sign_packet`] and [`verify_packet`] and must stay stable across
/// versions of the system and across transports.
///
/// # Errors
///
/// Returns [`IntegrityError::Canonicalization`] when the payload cannot be
/// represented in canonical JSON.
pub fn canonical_packet_bytes(packet: &Packet) -> Result<Vec<u8>, IntegrityError> {
    let view = SignedFields {
        packet_id: &packet.packet_id,
        device_id: &packet.device_id,
        env: packet.env,
        domain: packet.domain,
        packet_type: packet.packet_type,
        priority: packet.priority,
        metadata: &packet.metadata,
        data: &packet.data,
    };
    serde_jcs::to_vec(&view).map_err(|err| IntegrityError::Canonicalization(err.to_string()))
}

// ============================================================================
// SECTION: Sign / Verify
// ============================================================================

/// Computes the MAC over the canonical bytes of `packet` under `key`.
///
/// Deterministic for fixed inputs.
///
/// # Errors
///
/// Returns [`IntegrityError`] when canonicalization fails or the key
/// material is unusable for the key's algorithm.
pub fn sign_packet(packet: &Packet, key: &DeviceKey) -> Result<PacketSignature, IntegrityError> {
    let message = canonical_packet_bytes(packet)?;
    match key.algorithm {
        KeyAlgorithm::HmacSha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(&key.secret)
                .map_err(|err| IntegrityError::Mac(err.to_string()))?;
            mac.update(&message);
            let digest = mac.finalize().into_bytes();
            let mut out = [0_u8; SIGNATURE_LEN];
            out.copy_from_slice(&digest[..SIGNATURE_LEN]);
            Ok(PacketSignature(out))
        }
    }
}

/// Verifies `signature` against the recomputed MAC in constant time.
///
/// Returns `false` on any mismatch, malformed key material, or
/// canonicalization failure. Never panics and never surfaces an error to the
/// caller; escalation is a caller decision.
#[must_use]
pub fn verify_packet(packet: &Packet, signature: &PacketSignature, key: &DeviceKey) -> bool {
    match sign_packet(packet, key) {
        Ok(expected) => bool::from(expected.0.ct_eq(&signature.0)),
        Err(_) => false,
    }
}
