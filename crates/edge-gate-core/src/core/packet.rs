// crates/edge-gate-core/src/core/packet.rs
// ============================================================================
// Module: Edge Gate Packet Model
// Description: Packet, environment, domain, type, and priority value types.
// Purpose: Define the routing context attached to every telemetry/control packet.
// Dependencies: crate::core::identifiers, serde, serde_json
// ============================================================================

//! ## Overview
//! The packet is the unit of routing. Its identity fields (`packet_id`,
//! `device_id`, `env`, `domain`, `packet_type`, `priority`, `data`) are
//! immutable for the lifetime of one routing pass: the core takes `&Packet`
//! everywhere and never mutates in flight between validation and routing.
//!
//! Environments and domains are closed enums so that adding a variant forces
//! every consumer (validator, router, metrics) to be revisited deliberately.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::core::identifiers::DeviceId;
use crate::core::identifiers::PacketId;
use crate::core::identifiers::TraceId;

// ============================================================================
// SECTION: Environment
// ============================================================================

/// Physical delivery medium a device operates in.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Terrestrial deployments: cities, plants, rail.
    Ground,
    /// Airborne deployments: light aviation, civil UAV.
    Air,
    /// Orbital deployments: satellite-relayed sensor constellations.
    Orbit,
}

impl Environment {
    /// Returns a stable label for metrics and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ground => "ground",
            Self::Air => "air",
            Self::Orbit => "orbit",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Domain
// ============================================================================

/// Logical industry vertical a device belongs to.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
/// - Elevated-security membership is fixed per variant; see
///   [`Domain::is_elevated_security`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Clinical and hospital infrastructure.
    Medical,
    /// Wearable and implanted body sensors.
    Body,
    /// Municipal smart-city infrastructure.
    SmartCity,
    /// Rail, fleet, and logistics transport.
    Transport,
    /// Industrial plant and process automation.
    Industrial,
    /// Hydro-engineering and water supply.
    Water,
    /// Agricultural sensing and actuation.
    Agriculture,
    /// Unclassified devices.
    Other,
}

impl Domain {
    /// Returns whether the domain is tagged elevated-security.
    ///
    /// Elevated-security domains tighten default audit requirements in the
    /// entry validator: any block sets `strict_audit` and degraded risk
    /// engines default to fail-closed.
    #[must_use]
    pub const fn is_elevated_security(self) -> bool {
        matches!(self, Self::Medical | Self::Body | Self::Water | Self::Agriculture)
    }

    /// Returns a stable label for metrics and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Medical => "medical",
            Self::Body => "body",
            Self::SmartCity => "smart_city",
            Self::Transport => "transport",
            Self::Industrial => "industrial",
            Self::Water => "water",
            Self::Agriculture => "agriculture",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Packet Type and Priority
// ============================================================================

/// Class of event carried by a packet.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacketType {
    /// Periodic sensor readings.
    Telemetry,
    /// Anomaly or threshold alerts.
    Alert,
    /// Control commands toward a device.
    Control,
    /// Liveness heartbeats.
    Heartbeat,
}

impl PacketType {
    /// Returns a stable label for metrics and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Telemetry => "telemetry",
            Self::Alert => "alert",
            Self::Control => "control",
            Self::Heartbeat => "heartbeat",
        }
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Processing priority, totally ordered from [`Priority::Low`] to
/// [`Priority::Critical`].
///
/// # Invariants
/// - Derived `Ord` follows declaration order: Low < Normal < High < Critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Best-effort traffic.
    Low,
    /// Default priority.
    Normal,
    /// Expedited traffic.
    High,
    /// Emergency traffic.
    Critical,
}

impl Priority {
    /// Returns a stable label for metrics and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Packet
// ============================================================================

/// Telemetry/control packet routed by Edge Gate.
///
/// # Invariants
/// - Identity fields are immutable for the lifetime of one routing pass; the
///   core never mutates a packet between validation and routing.
/// - `trace_id` is opaque correlation metadata and is excluded from the
///   canonical signing bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    /// Unique packet identifier assigned by the producer.
    pub packet_id: PacketId,
    /// Originating device identifier.
    pub device_id: DeviceId,
    /// Physical delivery medium.
    pub env: Environment,
    /// Industry vertical.
    pub domain: Domain,
    /// Event class.
    pub packet_type: PacketType,
    /// Processing priority.
    pub priority: Priority,
    /// Opaque structured payload; contents depend on the device profile.
    pub data: Map<String, Value>,
    /// Optional string-to-string annotations (location, shift, pseudonymized
    /// patient identifiers, and similar).
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// Optional cross-system correlation identifier; not interpreted by the core.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<TraceId>,
}
