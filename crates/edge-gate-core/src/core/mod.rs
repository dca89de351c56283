// crates/edge-gate-core/src/core/mod.rs
// ============================================================================
// Module: Edge Gate Core Types
// Description: Domain model for packets, keys, policies, and outcomes.
// Purpose: Group the value types shared by the validator and router.
// Dependencies: serde, serde_jcs, hmac, sha2, subtle, hex
// ============================================================================

//! ## Overview
//! The core modules define the value types of the routing-and-validation
//! pipeline. They carry no orchestration logic; the entry validator, router,
//! and gateway composition live in [`crate::runtime`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod identifiers;
pub mod integrity;
pub mod keys;
pub mod metrics;
pub mod packet;
pub mod policy;
pub mod validation;
