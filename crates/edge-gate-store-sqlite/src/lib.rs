// crates/edge-gate-store-sqlite/src/lib.rs
// ============================================================================
// Module: Edge Gate SQLite Store
// Description: Durable offline packet cache backed by SQLite WAL.
// Purpose: Buffer undeliverable packets across restarts and uplink outages.
// Dependencies: edge-gate-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This crate provides the durable offline buffer for packets the router
//! holds instead of forwarding. Packets are stored as JSON rows keyed by a
//! monotonic rowid, so drain order matches arrival order and acknowledged
//! rows can be deleted individually after a successful replay.
//!
//! Security posture: database contents are untrusted; loads fail closed on
//! rows that no longer deserialize.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod cache;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use cache::CacheError;
pub use cache::CachedPacket;
pub use cache::MAX_PACKET_BYTES;
pub use cache::SqliteCacheConfig;
pub use cache::SqliteCacheMode;
pub use cache::SqliteOfflineCache;
