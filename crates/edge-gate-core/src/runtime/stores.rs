// crates/edge-gate-core/src/runtime/stores.rs
// ============================================================================
// Module: In-Memory Reference Stores
// Description: RwLock-backed device key and policy stores.
// Purpose: Provide the concurrency-correct reference implementations.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Reference implementations of [`DeviceKeyStore`] and [`PolicyStore`]
//! backed by `RwLock` collections: concurrent reads, serialized writes, and
//! no partially applied mutation visible to readers. External backends
//! (database, distributed config service) replace these behind the same
//! traits.
//!
//! Revoked keys are retained inactive for audit; only registration and
//! lookup consult the active flag.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::RwLock;

use crate::core::identifiers::DeviceId;
use crate::core::identifiers::PolicyId;
use crate::core::keys::DeviceKey;
use crate::core::keys::KeyRegistration;
use crate::core::packet::Packet;
use crate::core::policy::Policy;
use crate::interfaces::DeviceKeyStore;
use crate::interfaces::KeyStoreError;
use crate::interfaces::PolicyStore;
use crate::interfaces::PolicyStoreError;

// ============================================================================
// SECTION: Device Key Store
// ============================================================================

/// Key slot retaining revoked keys for audit.
#[derive(Debug, Clone)]
struct KeySlot {
    /// The registered key.
    key: DeviceKey,
    /// Whether the key is currently active.
    active: bool,
}

/// In-memory device key store.
///
/// # Invariants
/// - At most one slot per device; the slot's `active` flag gates lookups.
/// - Writes take the exclusive lock, so concurrent registrations for one
///   device serialize and exactly one observes the prior state.
#[derive(Debug)]
pub struct InMemoryDeviceKeyStore {
    /// Key slots by device.
    slots: RwLock<HashMap<DeviceId, KeySlot>>,
    /// Behavior for duplicate active registrations.
    registration: KeyRegistration,
}

impl InMemoryDeviceKeyStore {
    /// Creates a store with the default reject-duplicates registration mode.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registration(KeyRegistration::Reject)
    }

    /// Creates a store with an explicit registration mode.
    #[must_use]
    pub fn with_registration(registration: KeyRegistration) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            registration,
        }
    }
}

impl Default for InMemoryDeviceKeyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceKeyStore for InMemoryDeviceKeyStore {
    fn register(&self, key: DeviceKey) -> Result<(), KeyStoreError> {
        let mut slots =
            self.slots.write().map_err(|_| KeyStoreError::Store("lock poisoned".to_string()))?;
        if let Some(slot) = slots.get(&key.device_id)
            && slot.active
            && self.registration == KeyRegistration::Reject
        {
            return Err(KeyStoreError::DuplicateActiveKey {
                device_id: key.device_id.clone(),
            });
        }
        let device_id = key.device_id.clone();
        slots.insert(
            device_id,
            KeySlot {
                key,
                active: true,
            },
        );
        Ok(())
    }

    fn get_active_key(&self, device_id: &DeviceId) -> Option<DeviceKey> {
        let slots = self.slots.read().ok()?;
        slots.get(device_id).filter(|slot| slot.active).map(|slot| slot.key.clone())
    }

    fn revoke(&self, device_id: &DeviceId) {
        if let Ok(mut slots) = self.slots.write()
            && let Some(slot) = slots.get_mut(device_id)
        {
            slot.active = false;
        }
    }
}

// ============================================================================
// SECTION: Policy Store
// ============================================================================

/// In-memory ordered policy store.
///
/// # Invariants
/// - The backing `Vec` preserves insertion order; matching scans it front
///   to back (first-match-wins).
/// - `add` holds the exclusive lock across the duplicate check and the
///   append, so readers never observe a partially applied policy and two
///   concurrent adds of one identifier never both succeed.
#[derive(Debug, Default)]
pub struct InMemoryPolicyStore {
    /// Policies in insertion order.
    policies: RwLock<Vec<Policy>>,
}

impl InMemoryPolicyStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PolicyStore for InMemoryPolicyStore {
    fn add(&self, policy: Policy) -> Result<(), PolicyStoreError> {
        let mut policies = self
            .policies
            .write()
            .map_err(|_| PolicyStoreError::Store("lock poisoned".to_string()))?;
        // Check and insert under one write lock so concurrent adds of the
        // same identifier serialize.
        if policies.iter().any(|existing| existing.policy_id == policy.policy_id) {
            return Err(PolicyStoreError::DuplicatePolicy {
                policy_id: policy.policy_id.clone(),
            });
        }
        policies.push(policy);
        Ok(())
    }

    fn remove(&self, policy_id: &PolicyId) -> bool {
        let Ok(mut policies) = self.policies.write() else {
            return false;
        };
        let before = policies.len();
        policies.retain(|policy| policy.policy_id != *policy_id);
        policies.len() != before
    }

    fn all(&self) -> Vec<Policy> {
        self.policies.read().map(|policies| policies.clone()).unwrap_or_default()
    }

    fn match_for_packet(&self, packet: &Packet) -> Option<Policy> {
        let policies = self.policies.read().ok()?;
        policies.iter().find(|policy| policy.matches(packet)).cloned()
    }
}
