// crates/edge-gate-core/src/core/keys.rs
// ============================================================================
// Module: Edge Gate Device Keys
// Description: Device signing key model and registration modes.
// Purpose: Define the key material resolved by the entry validator.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! A device key binds a device identifier to the secret used for packet MAC
//! verification. Exactly one key per device is active at any time; stores may
//! retain retired keys for audit, but lookups return at most one active key.
//!
//! Security posture: key secrets are sensitive material. `DeviceKey` redacts
//! the secret from `Debug` output and is deliberately not `Serialize` so it
//! never leaks through response bodies or logs by accident.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::DeviceId;
use crate::core::identifiers::KeyId;

// ============================================================================
// SECTION: Key Algorithm
// ============================================================================

/// MAC algorithm for packet signing.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
/// - Verification fails closed (returns `false`) for any algorithm a
///   verifier does not support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAlgorithm {
    /// HMAC with SHA-256.
    HmacSha256,
}

impl KeyAlgorithm {
    /// Returns a stable label for logs and admin responses.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HmacSha256 => "hmac_sha256",
        }
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Device Key
// ============================================================================

/// Active signing key for one device.
///
/// # Invariants
/// - `device_id` scopes the key; a store holds at most one active key per device.
/// - `secret` is raw MAC key material and never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceKey {
    /// Device the key belongs to.
    pub device_id: DeviceId,
    /// Identifier distinguishing successive keys for the device.
    pub key_id: KeyId,
    /// Raw secret bytes for MAC computation.
    pub secret: Vec<u8>,
    /// MAC algorithm the secret is used with.
    pub algorithm: KeyAlgorithm,
}

impl fmt::Debug for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceKey")
            .field("device_id", &self.device_id)
            .field("key_id", &self.key_id)
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm.as_str())
            .finish()
    }
}

// ============================================================================
// SECTION: Registration Mode
// ============================================================================

/// Behavior when registering a key for a device that already has an active key.
///
/// # Invariants
/// - `Reject` is the default; duplicate registration is a reported failure.
/// - `Replace` supersedes the prior key atomically; the prior key becomes
///   inactive in the same write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyRegistration {
    /// Fail with `DuplicateActiveKey` when an active key already exists.
    #[default]
    Reject,
    /// Supersede the existing active key.
    Replace,
}
