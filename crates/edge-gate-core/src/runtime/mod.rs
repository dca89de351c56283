// crates/edge-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Edge Gate Runtime
// Description: Entry validator, hybrid router, gateway, and reference stores.
// Purpose: Orchestrate core types into the routing-and-validation pipeline.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Runtime components compose the core value types: the in-memory reference
//! stores, the Zero-Trust entry validator, the hybrid router, and the
//! gateway pipeline binding them together with metrics.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod gateway;
pub mod router;
pub mod stores;
pub mod validator;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use gateway::Gateway;
pub use gateway::GatewayOutcome;
pub use router::HybridRouter;
pub use stores::InMemoryDeviceKeyStore;
pub use stores::InMemoryPolicyStore;
pub use validator::DEFAULT_AUDIT_THRESHOLD;
pub use validator::DEFAULT_BLOCK_THRESHOLD;
pub use validator::EntryValidator;
pub use validator::FailMode;
pub use validator::RiskEngine;
pub use validator::RiskVerdict;
pub use validator::ValidatorConfig;
