#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Household safety status and incident classification types.
//!
//! This crate defines the canonical status/phase/severity vocabulary used
//! across the entire registry. Values cross the wire as `snake_case` strings
//! and are parsed back through `strum`; unknown strings are rejected at the
//! boundary rather than defaulted.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Safety status of a registered household.
///
/// Every household starts `unverified` and is toggled to `safe` or
/// `not_safe` by responders as they sweep an area.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HouseholdStatus {
    /// No responder has checked on this household yet
    Unverified,
    /// Confirmed safe
    Safe,
    /// Confirmed in danger or unaccounted for
    NotSafe,
}

impl HouseholdStatus {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Unverified, Self::Safe, Self::NotSafe]
    }
}

impl Default for HouseholdStatus {
    fn default() -> Self {
        Self::Unverified
    }
}

/// Lifecycle phase of a disaster incident.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IncidentPhase {
    /// Forecast or warning issued, not yet happening
    Incoming,
    /// Currently happening
    Occurring,
    /// Over; retained for relief accounting
    Past,
}

impl IncidentPhase {
    /// Whether an incident in this phase counts as active for dashboards.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Incoming | Self::Occurring)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Incoming, Self::Occurring, Self::Past]
    }
}

/// Severity level for an incident, from 1 (low) to 4 (critical).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IncidentSeverity {
    /// Level 1: Minor disruption, no evacuation expected
    Low = 1,
    /// Level 2: Localized damage possible
    Medium = 2,
    /// Level 3: Widespread damage, evacuations likely
    High = 3,
    /// Level 4: Life-threatening, mass displacement
    Critical = 4,
}

impl IncidentSeverity {
    /// Returns the numeric value of this severity level.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High, Self::Critical]
    }
}
