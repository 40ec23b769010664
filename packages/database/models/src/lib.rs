#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Database row types and new-entity input definitions.
//!
//! Row types mirror the table columns one-to-one; input types carry the
//! fields a caller supplies on create/update. Ids and timestamps are always
//! server-assigned, so inputs never contain them. Timestamps are stored and
//! returned as RFC 3339 strings.

use resitrack_relief_models::{HouseholdStatus, IncidentPhase, IncidentSeverity};
use serde::{Deserialize, Serialize};

/// A row in the `households` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdRow {
    /// Server-assigned UUID.
    pub id: String,
    /// Name of the household head.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Phone number or email, if provided.
    pub contact: Option<String>,
    /// Elderly, pregnant, disabled residents, etc.
    pub special_needs: Option<String>,
    /// Current safety status.
    pub status: HouseholdStatus,
    /// Creation time (RFC 3339).
    pub created_at: String,
    /// Last mutation time (RFC 3339).
    pub updated_at: String,
}

/// Validated fields for creating or fully replacing a household.
///
/// `updateHousehold` is full-field replacement, so the same type serves both
/// operations. Status is deliberately absent: it only changes through the
/// status-toggle operation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHousehold {
    /// Name of the household head.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Latitude in decimal degrees, already range-checked.
    pub latitude: f64,
    /// Longitude in decimal degrees, already range-checked.
    pub longitude: f64,
    /// Phone number or email, if provided.
    pub contact: Option<String>,
    /// Elderly, pregnant, disabled residents, etc.
    pub special_needs: Option<String>,
}

/// A row in the `incidents` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentRow {
    /// Server-assigned UUID.
    pub id: String,
    /// Disaster type ("flood", "fire", ...); open set, stored verbatim.
    pub kind: String,
    /// Lifecycle phase.
    pub phase: IncidentPhase,
    /// Severity level.
    pub severity: IncidentSeverity,
    /// Detailed description.
    pub description: String,
    /// Location impacted by the disaster.
    pub affected_area: String,
    /// Number of families affected.
    pub affected_families: i64,
    /// Number of families that have received aid.
    pub relief_distributed: i64,
    /// Creation time (RFC 3339).
    pub created_at: String,
    /// Last mutation time (RFC 3339).
    pub updated_at: String,
}

/// Validated fields for creating or fully replacing an incident.
///
/// Unlike households, an incident edit replaces everything including
/// `kind`/`phase`/`severity`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncident {
    /// Disaster type; open set, stored verbatim.
    pub kind: String,
    /// Lifecycle phase.
    pub phase: IncidentPhase,
    /// Severity level.
    pub severity: IncidentSeverity,
    /// Detailed description.
    pub description: String,
    /// Location impacted by the disaster.
    pub affected_area: String,
    /// Number of families affected, already checked non-negative.
    pub affected_families: i64,
    /// Families that received aid, already checked `<= affected_families`.
    pub relief_distributed: i64,
}

/// A row in the `status_history` audit table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChangeRow {
    /// Household whose status changed.
    pub household_id: String,
    /// Status before the change.
    pub previous_status: HouseholdStatus,
    /// Status after the change.
    pub new_status: HouseholdStatus,
    /// When the change was recorded (RFC 3339).
    pub changed_at: String,
}

/// Count of households in a single status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    /// The status.
    pub status: HouseholdStatus,
    /// Number of households currently in it.
    pub count: u64,
}

/// Count of incidents in a single phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseCount {
    /// The phase.
    pub phase: IncidentPhase,
    /// Number of incidents currently in it.
    pub count: u64,
}

/// Count of incidents at a single severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCount {
    /// The severity level.
    pub severity: IncidentSeverity,
    /// Number of incidents at it.
    pub count: u64,
}

/// Aggregate dashboard metrics, recomputed from the current collections on
/// every request. Nothing here is incrementally maintained, so the numbers
/// can never drift from the tables they summarize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total registered households.
    pub total_households: u64,
    /// Households confirmed safe.
    pub safe_count: u64,
    /// Households confirmed not safe.
    pub not_safe_count: u64,
    /// Households not yet checked.
    pub unverified_count: u64,
    /// `safe_count / total_households` as a percentage, one decimal.
    /// Zero when there are no households.
    pub safe_percentage: f64,
    /// Total reported incidents.
    pub total_incidents: u64,
    /// Incidents in the `incoming` or `occurring` phase.
    pub active_incidents: u64,
    /// Incident counts per phase (every phase present, zeroes included).
    pub by_phase: Vec<PhaseCount>,
    /// Incident counts per severity (every level present, zeroes included).
    pub by_severity: Vec<SeverityCount>,
    /// Sum of `affected_families` across all incidents.
    pub total_affected_families: u64,
    /// Sum of `relief_distributed` across all incidents.
    pub total_relief_distributed: u64,
}
