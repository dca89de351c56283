// crates/edge-gate-store-sqlite/src/cache.rs
// ============================================================================
// Module: SQLite Offline Cache
// Description: FIFO packet buffer persisted in an SQLite WAL database.
// Purpose: Hold undelivered packets until an uplink drains and acknowledges them.
// Dependencies: edge-gate-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This module implements the durable offline cache. Enqueued packets are
//! serialized to JSON and appended to a single table; `rowid` assignment
//! preserves arrival order, so `dequeue_batch` always returns the oldest
//! packets first. Draining is two-phase: a non-destructive read followed by
//! `delete_many` once the uplink acknowledges delivery, so a crash between
//! the two never loses packets, only redelivers them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use edge_gate_core::Packet;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the cache.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum serialized packet size accepted by the cache.
pub const MAX_PACKET_BYTES: usize = 4 * 1024 * 1024;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteCacheMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteCacheMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// Configuration for the `SQLite` offline cache.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteCacheConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteCacheMode,
}

impl SqliteCacheConfig {
    /// Returns a configuration with default timeouts for `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteCacheMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Offline cache errors.
///
/// # Invariants
/// - Error messages avoid embedding raw packet payloads.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Cache I/O error.
    #[error("offline cache io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("offline cache db error: {0}")]
    Db(String),
    /// A stored row no longer deserializes into a packet.
    #[error("offline cache corruption: {0}")]
    Corrupt(String),
    /// Cache schema version mismatch.
    #[error("offline cache version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid cache data or configuration.
    #[error("offline cache invalid data: {0}")]
    Invalid(String),
    /// Serialized packet exceeded the cache size limit.
    #[error("offline cache packet too large: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual payload size in bytes.
        actual_bytes: usize,
    },
}

// ============================================================================
// SECTION: Cached Packet
// ============================================================================

/// One buffered packet together with its acknowledgement handle.
///
/// # Invariants
/// - `rowid` is unique for the lifetime of the row and strictly increases
///   with arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedPacket {
    /// Row identifier used to acknowledge delivery via
    /// [`SqliteOfflineCache::delete_many`].
    pub rowid: i64,
    /// The buffered packet.
    pub packet: Packet,
}

// ============================================================================
// SECTION: Cache
// ============================================================================

/// `SQLite`-backed FIFO offline packet cache.
///
/// # Invariants
/// - `dequeue_batch` is non-destructive; rows leave the cache only through
///   [`SqliteOfflineCache::delete_many`] or [`SqliteOfflineCache::clear`].
/// - Connection access is serialized through a mutex.
pub struct SqliteOfflineCache {
    /// Shared connection guarded by a mutex.
    connection: Mutex<Connection>,
}

impl SqliteOfflineCache {
    /// Opens an `SQLite`-backed offline cache.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the database cannot be opened or its
    /// schema does not match [`SCHEMA_VERSION`].
    pub fn new(config: &SqliteCacheConfig) -> Result<Self, CacheError> {
        validate_cache_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    /// Appends `packet` to the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::TooLarge`] when the serialized packet exceeds
    /// [`MAX_PACKET_BYTES`], or [`CacheError::Db`] for engine failures.
    pub fn enqueue(&self, packet: &Packet) -> Result<(), CacheError> {
        let packet_json =
            serde_json::to_vec(packet).map_err(|err| CacheError::Invalid(err.to_string()))?;
        if packet_json.len() > MAX_PACKET_BYTES {
            return Err(CacheError::TooLarge {
                max_bytes: MAX_PACKET_BYTES,
                actual_bytes: packet_json.len(),
            });
        }
        let guard = self.lock_connection()?;
        guard
            .execute(
                "INSERT INTO offline_packets (packet_json, enqueued_at) VALUES (?1, ?2)",
                params![packet_json, unix_millis()],
            )
            .map_err(|err| CacheError::Db(err.to_string()))?;
        Ok(())
    }

    /// Returns up to `limit` of the oldest buffered packets without
    /// removing them.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Invalid`] when `limit` is zero,
    /// [`CacheError::Corrupt`] when a stored row no longer deserializes, or
    /// [`CacheError::Db`] for engine failures.
    pub fn dequeue_batch(&self, limit: usize) -> Result<Vec<CachedPacket>, CacheError> {
        if limit == 0 {
            return Err(CacheError::Invalid("dequeue limit must be greater than zero".to_string()));
        }
        let limit = i64::try_from(limit)
            .map_err(|_| CacheError::Invalid("dequeue limit too large".to_string()))?;
        let guard = self.lock_connection()?;
        let mut stmt = guard
            .prepare(
                "SELECT rowid, packet_json FROM offline_packets ORDER BY rowid ASC LIMIT ?1",
            )
            .map_err(|err| CacheError::Db(err.to_string()))?;
        let rows = stmt
            .query_map(params![limit], |row| {
                let rowid: i64 = row.get(0)?;
                let packet_json: Vec<u8> = row.get(1)?;
                Ok((rowid, packet_json))
            })
            .map_err(|err| CacheError::Db(err.to_string()))?;
        let mut results = Vec::new();
        for row in rows {
            let (rowid, packet_json) = row.map_err(|err| CacheError::Db(err.to_string()))?;
            let packet: Packet = serde_json::from_slice(&packet_json).map_err(|err| {
                CacheError::Corrupt(format!("row {rowid} failed to deserialize: {err}"))
            })?;
            results.push(CachedPacket {
                rowid,
                packet,
            });
        }
        Ok(results)
    }

    /// Deletes acknowledged rows by their `rowid`s.
    ///
    /// Unknown rowids are skipped; only existing rows count toward the
    /// returned total.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Db`] for engine failures.
    pub fn delete_many(&self, rowids: &[i64]) -> Result<usize, CacheError> {
        if rowids.is_empty() {
            return Ok(0);
        }
        let mut guard = self.lock_connection()?;
        let tx = guard.transaction().map_err(|err| CacheError::Db(err.to_string()))?;
        let mut deleted = 0usize;
        for rowid in rowids {
            deleted += tx
                .execute("DELETE FROM offline_packets WHERE rowid = ?1", params![rowid])
                .map_err(|err| CacheError::Db(err.to_string()))?;
        }
        tx.commit().map_err(|err| CacheError::Db(err.to_string()))?;
        Ok(deleted)
    }

    /// Returns the number of buffered packets.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Db`] for engine failures.
    pub fn count(&self) -> Result<u64, CacheError> {
        let guard = self.lock_connection()?;
        let count: i64 = guard
            .query_row("SELECT COUNT(*) FROM offline_packets", params![], |row| row.get(0))
            .map_err(|err| CacheError::Db(err.to_string()))?;
        u64::try_from(count).map_err(|_| CacheError::Db("negative row count".to_string()))
    }

    /// Removes every buffered packet.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Db`] for engine failures.
    pub fn clear(&self) -> Result<(), CacheError> {
        let guard = self.lock_connection()?;
        guard
            .execute("DELETE FROM offline_packets", params![])
            .map_err(|err| CacheError::Db(err.to_string()))?;
        Ok(())
    }

    /// Locks the shared connection.
    fn lock_connection(&self) -> Result<std::sync::MutexGuard<'_, Connection>, CacheError> {
        self.connection.lock().map_err(|_| CacheError::Db("cache mutex poisoned".to_string()))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Creates the parent directory for the cache path when missing.
fn ensure_parent_dir(path: &Path) -> Result<(), CacheError> {
    let Some(parent) = path.parent() else {
        return Err(CacheError::Io("cache path missing parent directory".to_string()));
    };
    std::fs::create_dir_all(parent).map_err(|err| CacheError::Io(err.to_string()))
}

/// Validates cache paths for safety limits.
fn validate_cache_path(path: &Path) -> Result<(), CacheError> {
    if path.as_os_str().is_empty() {
        return Err(CacheError::Invalid("cache path must not be empty".to_string()));
    }
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(CacheError::Invalid("cache path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(CacheError::Invalid(
                "cache path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(CacheError::Invalid(
            "cache path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteCacheConfig) -> Result<Connection, CacheError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| CacheError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| CacheError::Db(err.to_string()))?;
    connection
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| CacheError::Db(err.to_string()))?;
    Ok(connection)
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), CacheError> {
    let tx = connection.transaction().map_err(|err| CacheError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS cache_meta (version INTEGER NOT NULL);")
        .map_err(|err| CacheError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM cache_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| CacheError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO cache_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| CacheError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS offline_packets (
                    packet_json BLOB NOT NULL,
                    enqueued_at INTEGER NOT NULL
                );",
            )
            .map_err(|err| CacheError::Db(err.to_string()))?;
        }
        Some(found) if found == SCHEMA_VERSION => {}
        Some(found) => {
            return Err(CacheError::VersionMismatch(format!(
                "expected schema version {SCHEMA_VERSION}, found {found}"
            )));
        }
    }
    tx.commit().map_err(|err| CacheError::Db(err.to_string()))
}

/// Returns the current unix timestamp in milliseconds.
fn unix_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}
