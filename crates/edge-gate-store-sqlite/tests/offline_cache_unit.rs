// crates/edge-gate-store-sqlite/tests/offline_cache_unit.rs
// ============================================================================
// Module: Offline Cache Unit Tests
// Description: Targeted integrity tests for the SQLite offline packet cache.
// Purpose: Validate path safety, FIFO order, acknowledgement semantics, and
//          corruption detection.
// ============================================================================

//! ## Overview
//! Unit-level tests for the offline cache invariants:
//! - Path safety checks (length/component/directory rejection)
//! - Schema version validation
//! - FIFO drain order by rowid
//! - Two-phase drain: non-destructive reads, delete-on-acknowledge
//! - Fail-closed handling of corrupt rows

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
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use edge_gate_core::Domain;
use edge_gate_core::Environment;
use edge_gate_core::Packet;
use edge_gate_core::PacketType;
use edge_gate_core::Priority;
use edge_gate_store_sqlite::CacheError;
use edge_gate_store_sqlite::MAX_PACKET_BYTES;
use edge_gate_store_sqlite::SqliteCacheConfig;
use edge_gate_store_sqlite::SqliteOfflineCache;
use rusqlite::Connection;
use rusqlite::params;
use serde_json::Map;
use serde_json::Value;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn sample_packet(id: &str) -> Packet {
    Packet {
        packet_id: id.into(),
        device_id: "d1".into(),
        env: Environment::Ground,
        domain: Domain::Industrial,
        packet_type: PacketType::Telemetry,
        priority: Priority::Normal,
        data: Map::new(),
        metadata: BTreeMap::new(),
        trace_id: None,
    }
}

fn open_cache(dir: &TempDir) -> SqliteOfflineCache {
    let config = SqliteCacheConfig::new(dir.path().join("cache.db"));
    SqliteOfflineCache::new(&config).expect("open cache")
}

// ============================================================================
// SECTION: Path Safety
// ============================================================================

#[test]
fn rejects_empty_path() {
    let config = SqliteCacheConfig::new(PathBuf::new());
    let result = SqliteOfflineCache::new(&config);
    assert!(matches!(result, Err(CacheError::Invalid(_))));
}

#[test]
fn rejects_directory_path() {
    let dir = TempDir::new().expect("tempdir");
    let config = SqliteCacheConfig::new(dir.path());
    let result = SqliteOfflineCache::new(&config);
    assert!(matches!(result, Err(CacheError::Invalid(_))));
}

#[test]
fn rejects_overlong_path_component() {
    let dir = TempDir::new().expect("tempdir");
    let config = SqliteCacheConfig::new(dir.path().join("x".repeat(300)));
    let result = SqliteOfflineCache::new(&config);
    assert!(matches!(result, Err(CacheError::Invalid(_))));
}

// ============================================================================
// SECTION: Schema Version
// ============================================================================

#[test]
fn rejects_unknown_schema_version() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("cache.db");
    {
        let connection = Connection::open(&path).expect("open raw");
        connection
            .execute_batch(
                "CREATE TABLE cache_meta (version INTEGER NOT NULL);
                 INSERT INTO cache_meta (version) VALUES (99);",
            )
            .expect("seed meta");
    }
    let result = SqliteOfflineCache::new(&SqliteCacheConfig::new(path));
    assert!(matches!(result, Err(CacheError::VersionMismatch(_))));
}

// ============================================================================
// SECTION: FIFO Order and Acknowledgement
// ============================================================================

#[test]
fn round_trips_packets_in_fifo_order() {
    let dir = TempDir::new().expect("tempdir");
    let cache = open_cache(&dir);

    cache.enqueue(&sample_packet("pkt-1")).expect("enqueue");
    cache.enqueue(&sample_packet("pkt-2")).expect("enqueue");
    cache.enqueue(&sample_packet("pkt-3")).expect("enqueue");

    let batch = cache.dequeue_batch(10).expect("dequeue");
    let ids: Vec<&str> = batch.iter().map(|row| row.packet.packet_id.as_str()).collect();
    assert_eq!(ids, vec!["pkt-1", "pkt-2", "pkt-3"]);
    assert!(batch.windows(2).all(|pair| pair[0].rowid < pair[1].rowid));
}

#[test]
fn dequeue_is_non_destructive() {
    let dir = TempDir::new().expect("tempdir");
    let cache = open_cache(&dir);
    cache.enqueue(&sample_packet("pkt-1")).expect("enqueue");

    let first = cache.dequeue_batch(10).expect("dequeue");
    let second = cache.dequeue_batch(10).expect("dequeue");
    assert_eq!(first, second);
    assert_eq!(cache.count().expect("count"), 1);
}

#[test]
fn dequeue_respects_the_limit() {
    let dir = TempDir::new().expect("tempdir");
    let cache = open_cache(&dir);
    for index in 0 .. 5 {
        cache.enqueue(&sample_packet(&format!("pkt-{index}"))).expect("enqueue");
    }

    let batch = cache.dequeue_batch(2).expect("dequeue");
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0].packet.packet_id.as_str(), "pkt-0");
}

#[test]
fn dequeue_rejects_zero_limit() {
    let dir = TempDir::new().expect("tempdir");
    let cache = open_cache(&dir);
    assert!(matches!(cache.dequeue_batch(0), Err(CacheError::Invalid(_))));
}

#[test]
fn delete_many_removes_only_acknowledged_rows() {
    let dir = TempDir::new().expect("tempdir");
    let cache = open_cache(&dir);
    cache.enqueue(&sample_packet("pkt-1")).expect("enqueue");
    cache.enqueue(&sample_packet("pkt-2")).expect("enqueue");
    cache.enqueue(&sample_packet("pkt-3")).expect("enqueue");

    let batch = cache.dequeue_batch(2).expect("dequeue");
    let acknowledged: Vec<i64> = batch.iter().map(|row| row.rowid).collect();
    let deleted = cache.delete_many(&acknowledged).expect("delete");
    assert_eq!(deleted, 2);

    let remaining = cache.dequeue_batch(10).expect("dequeue");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].packet.packet_id.as_str(), "pkt-3");
}

#[test]
fn delete_many_skips_unknown_rowids() {
    let dir = TempDir::new().expect("tempdir");
    let cache = open_cache(&dir);
    cache.enqueue(&sample_packet("pkt-1")).expect("enqueue");

    let deleted = cache.delete_many(&[9_999]).expect("delete");
    assert_eq!(deleted, 0);
    assert_eq!(cache.count().expect("count"), 1);
}

#[test]
fn clear_empties_the_cache() {
    let dir = TempDir::new().expect("tempdir");
    let cache = open_cache(&dir);
    cache.enqueue(&sample_packet("pkt-1")).expect("enqueue");
    cache.enqueue(&sample_packet("pkt-2")).expect("enqueue");

    cache.clear().expect("clear");
    assert_eq!(cache.count().expect("count"), 0);
    assert!(cache.dequeue_batch(10).expect("dequeue").is_empty());
}

// ============================================================================
// SECTION: Durability and Limits
// ============================================================================

#[test]
fn packets_survive_reopening_the_database() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("cache.db");
    {
        let cache =
            SqliteOfflineCache::new(&SqliteCacheConfig::new(&path)).expect("open cache");
        cache.enqueue(&sample_packet("pkt-1")).expect("enqueue");
    }

    let reopened = SqliteOfflineCache::new(&SqliteCacheConfig::new(&path)).expect("reopen");
    let batch = reopened.dequeue_batch(10).expect("dequeue");
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].packet.packet_id.as_str(), "pkt-1");
}

#[test]
fn rejects_oversize_packets() {
    let dir = TempDir::new().expect("tempdir");
    let cache = open_cache(&dir);

    let mut oversized = sample_packet("pkt-big");
    oversized
        .data
        .insert("blob".to_string(), Value::String("x".repeat(MAX_PACKET_BYTES + 1)));
    let result = cache.enqueue(&oversized);
    assert!(matches!(result, Err(CacheError::TooLarge { .. })));
    assert_eq!(cache.count().expect("count"), 0);
}

#[test]
fn corrupt_rows_fail_closed_on_dequeue() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("cache.db");
    let cache = SqliteOfflineCache::new(&SqliteCacheConfig::new(&path)).expect("open cache");
    cache.enqueue(&sample_packet("pkt-1")).expect("enqueue");
    drop(cache);

    {
        let connection = Connection::open(&path).expect("open raw");
        connection
            .execute(
                "UPDATE offline_packets SET packet_json = ?1",
                params![b"not json".to_vec()],
            )
            .expect("corrupt row");
    }

    let reopened = SqliteOfflineCache::new(&SqliteCacheConfig::new(&path)).expect("reopen");
    let result = reopened.dequeue_batch(10);
    assert!(matches!(result, Err(CacheError::Corrupt(_))));
}
