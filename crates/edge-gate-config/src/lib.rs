// crates/edge-gate-config/src/lib.rs
// ============================================================================
// Module: Edge Gate Config
// Description: Canonical TOML configuration model and validation.
// Purpose: Load and validate gateway settings with fail-closed guards.
// Dependencies: edge-gate-core, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! This crate defines the gateway configuration model. `load` reads a TOML
//! file with strict guards (path length, file size, UTF-8) and `validate`
//! enforces value constraints such as risk threshold bounds and ordering.
//! Every field has a working default, so an absent or empty config yields a
//! runnable in-memory gateway.
//!
//! Security posture: config files are untrusted input; loads fail closed on
//! oversized, non-UTF-8, or unparsable content.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;

use edge_gate_core::KeyRegistration;
use edge_gate_core::runtime::DEFAULT_AUDIT_THRESHOLD;
use edge_gate_core::runtime::DEFAULT_BLOCK_THRESHOLD;
use edge_gate_core::runtime::FailMode;
use edge_gate_core::runtime::ValidatorConfig;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum total config path length.
const MAX_CONFIG_PATH_LENGTH: usize = 4096;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum config file size in bytes.
const MAX_CONFIG_FILE_BYTES: u64 = 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - Error messages avoid embedding config file contents.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file I/O error.
    #[error("config io error: {0}")]
    Io(String),
    /// Config content failed TOML parsing.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Config content failed validation.
    #[error("config invalid: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Sections
// ============================================================================

/// Risk engine configuration (`[risk]`).
///
/// # Invariants
/// - Thresholds lie in `[0.0, 1.0]` with `block_threshold >= audit_threshold`
///   after [`EdgeGateConfig::validate`].
#[derive(Debug, Clone, Deserialize)]
pub struct RiskConfig {
    /// Whether the risk engine participates in entry validation.
    #[serde(default = "default_risk_enabled")]
    pub enabled: bool,
    /// Score at or above which packets are blocked.
    #[serde(default = "default_block_threshold")]
    pub block_threshold: f64,
    /// Score at or above which packets pass with strict audit.
    #[serde(default = "default_audit_threshold")]
    pub audit_threshold: f64,
    /// Degraded-engine outcome for standard domains.
    #[serde(default = "default_fail_mode")]
    pub fail_mode: FailMode,
    /// Degraded-engine outcome for elevated-security domains.
    #[serde(default = "default_elevated_fail_mode")]
    pub elevated_fail_mode: FailMode,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            enabled: default_risk_enabled(),
            block_threshold: default_block_threshold(),
            audit_threshold: default_audit_threshold(),
            fail_mode: default_fail_mode(),
            elevated_fail_mode: default_elevated_fail_mode(),
        }
    }
}

impl RiskConfig {
    /// Maps the risk section onto the validator's fail-mode configuration.
    #[must_use]
    pub const fn validator_config(&self) -> ValidatorConfig {
        ValidatorConfig {
            fail_mode: self.fail_mode,
            elevated_fail_mode: self.elevated_fail_mode,
        }
    }
}

/// Key store configuration (`[keys]`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeysConfig {
    /// Behavior when a device already holds an active key.
    #[serde(default)]
    pub registration: KeyRegistration,
}

/// HTTP server configuration (`[server]`).
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address the admin/ingest API binds to.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Whether the `/metrics` text endpoint is exposed.
    #[serde(default = "default_metrics_enabled")]
    pub metrics: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            metrics: default_metrics_enabled(),
        }
    }
}

/// Offline cache configuration (`[cache]`).
#[derive(Debug, Clone, Deserialize)]
pub struct OfflineCacheConfig {
    /// Whether held packets are buffered durably.
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    /// Path to the `SQLite` database file.
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
}

impl Default for OfflineCacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            path: default_cache_path(),
        }
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Returns whether the risk engine is enabled by default.
const fn default_risk_enabled() -> bool {
    true
}

/// Returns the default block threshold.
const fn default_block_threshold() -> f64 {
    DEFAULT_BLOCK_THRESHOLD
}

/// Returns the default audit threshold.
const fn default_audit_threshold() -> f64 {
    DEFAULT_AUDIT_THRESHOLD
}

/// Returns the default fail mode for standard domains.
const fn default_fail_mode() -> FailMode {
    FailMode::Open
}

/// Returns the default fail mode for elevated-security domains.
const fn default_elevated_fail_mode() -> FailMode {
    FailMode::Closed
}

/// Returns the default server bind address.
fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

/// Returns whether the `/metrics` endpoint is enabled by default.
const fn default_metrics_enabled() -> bool {
    true
}

/// Returns whether the offline cache is enabled by default.
const fn default_cache_enabled() -> bool {
    true
}

/// Returns the default offline cache path.
fn default_cache_path() -> PathBuf {
    PathBuf::from("edge-gate-cache.db")
}

// ============================================================================
// SECTION: Config
// ============================================================================

/// Top-level gateway configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EdgeGateConfig {
    /// Risk engine settings.
    #[serde(default)]
    pub risk: RiskConfig,
    /// Key store settings.
    #[serde(default)]
    pub keys: KeysConfig,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Offline cache settings.
    #[serde(default)]
    pub cache: OfflineCacheConfig,
}

impl EdgeGateConfig {
    /// Loads and validates a configuration.
    ///
    /// With `path == None`, the built-in defaults are returned (already
    /// validated by construction).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the path violates safety limits, the
    /// file is oversized or non-UTF-8, parsing fails, or values fail
    /// [`EdgeGateConfig::validate`].
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        validate_config_path(path)?;
        let metadata = std::fs::metadata(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if metadata.len() > MAX_CONFIG_FILE_BYTES {
            return Err(ConfigError::Invalid(format!(
                "config file exceeds size limit: {} bytes (max {MAX_CONFIG_FILE_BYTES})",
                metadata.len()
            )));
        }
        let bytes = std::fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        let content = String::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates value constraints across all sections.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("risk.block_threshold", self.risk.block_threshold),
            ("risk.audit_threshold", self.risk.audit_threshold),
        ] {
            if !value.is_finite() || !(0.0 ..= 1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must lie in [0.0, 1.0], got {value}"
                )));
            }
        }
        if self.risk.block_threshold < self.risk.audit_threshold {
            return Err(ConfigError::Invalid(format!(
                "risk.block_threshold ({}) must be >= risk.audit_threshold ({})",
                self.risk.block_threshold, self.risk.audit_threshold
            )));
        }
        if self.server.bind.trim().is_empty() {
            return Err(ConfigError::Invalid("server.bind must be non-empty".to_string()));
        }
        if self.cache.enabled && self.cache.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "cache.path must be non-empty when the cache is enabled".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates config paths for safety limits.
fn validate_config_path(path: &Path) -> Result<(), ConfigError> {
    let path_string = path.display().to_string();
    if path_string.len() > MAX_CONFIG_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}
