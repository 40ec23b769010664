#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the ResiTrack server.
//!
//! These types are serialized to JSON for the REST API. Request bodies are
//! separate from the database row types so that input validation and
//! coercion happen in one place: every body converts into a validated
//! `New*` input via `TryFrom`, and every rejection is a typed
//! [`ValidationError`].
//!
//! Numeric fields accept both JSON numbers and numeric text, because HTML
//! form submissions arrive as strings. Unparseable text is rejected, never
//! coerced to zero.

use resitrack_database_models::{
    HouseholdRow, IncidentRow, MetricsSnapshot, NewHousehold, NewIncident, PhaseCount,
    SeverityCount, StatusChangeRow,
};
use resitrack_relief_models::{HouseholdStatus, IncidentPhase, IncidentSeverity};
use serde::{Deserialize, Serialize};

/// A request field rejected at the service boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A numeric field held text that does not parse as a number.
    #[error("{field} is not a valid number: \"{value}\"")]
    InvalidNumber {
        /// Which field was rejected.
        field: &'static str,
        /// The offending input, verbatim.
        value: String,
    },

    /// A count field held a fractional or out-of-range number.
    #[error("{field} must be a whole number: {value}")]
    NotAnInteger {
        /// Which field was rejected.
        field: &'static str,
        /// The offending input.
        value: f64,
    },

    /// A coordinate fell outside the valid geographic range.
    #[error("{field} out of range: {value} (expected {min} to {max})")]
    OutOfRange {
        /// Which field was rejected.
        field: &'static str,
        /// The offending value.
        value: f64,
        /// Lower bound, inclusive.
        min: f64,
        /// Upper bound, inclusive.
        max: f64,
    },

    /// A count field was negative.
    #[error("{field} must not be negative: {value}")]
    Negative {
        /// Which field was rejected.
        field: &'static str,
        /// The offending value.
        value: i64,
    },

    /// A required text field was empty or whitespace.
    #[error("{field} must not be empty")]
    Empty {
        /// Which field was rejected.
        field: &'static str,
    },

    /// An enum field held a value outside its vocabulary.
    #[error("unknown {field} value: \"{value}\"")]
    UnknownVariant {
        /// Which field was rejected.
        field: &'static str,
        /// The offending input, verbatim.
        value: String,
    },

    /// The status toggle only accepts the two verified states.
    #[error("status must be \"safe\" or \"not_safe\": \"{value}\"")]
    UnsupportedStatus {
        /// The offending input, verbatim.
        value: String,
    },

    /// More relief distributed than families affected.
    #[error("relief_distributed ({relief}) exceeds affected_families ({affected})")]
    ReliefExceedsAffected {
        /// Families that received aid.
        relief: i64,
        /// Families affected.
        affected: i64,
    },
}

/// A numeric wire value: either a JSON number or numeric text from a form
/// submission.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    /// Already a JSON number.
    Number(f64),
    /// Text that should parse as a number.
    Text(String),
}

impl NumberOrText {
    /// Parses this value as a float.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidNumber`] if the text does not
    /// parse.
    pub fn parse_f64(&self, field: &'static str) -> Result<f64, ValidationError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => {
                s.trim()
                    .parse::<f64>()
                    .map_err(|_| ValidationError::InvalidNumber {
                        field,
                        value: s.clone(),
                    })
            }
        }
    }

    /// Parses this value as a whole number. `"12"` and `12` both yield 12;
    /// `"12.5"`, `12.5`, and `"abc"` are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the value is not an integer.
    pub fn parse_i64(&self, field: &'static str) -> Result<i64, ValidationError> {
        // Parse text directly so large counts keep every digit; going
        // through f64 would round anything above 2^53.
        if let Self::Text(s) = self {
            if let Ok(n) = s.trim().parse::<i64>() {
                return Ok(n);
            }
        }

        let n = self.parse_f64(field)?;

        #[allow(clippy::cast_precision_loss)]
        if n.fract() != 0.0 || n < i64::MIN as f64 || n >= i64::MAX as f64 {
            return Err(ValidationError::NotAnInteger { field, value: n });
        }

        #[allow(clippy::cast_possible_truncation)]
        Ok(n as i64)
    }
}

fn required_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed.to_string())
}

fn coordinate(
    field: &'static str,
    value: &NumberOrText,
    min: f64,
    max: f64,
) -> Result<f64, ValidationError> {
    let parsed = value.parse_f64(field)?;
    if !(min..=max).contains(&parsed) {
        return Err(ValidationError::OutOfRange {
            field,
            value: parsed,
            min,
            max,
        });
    }
    Ok(parsed)
}

fn count(field: &'static str, value: &NumberOrText) -> Result<i64, ValidationError> {
    let parsed = value.parse_i64(field)?;
    if parsed < 0 {
        return Err(ValidationError::Negative {
            field,
            value: parsed,
        });
    }
    Ok(parsed)
}

/// Request body for creating or replacing a household.
#[derive(Debug, Clone, Deserialize)]
pub struct HouseholdBody {
    /// Name of the household head.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Latitude; number or numeric text.
    pub latitude: NumberOrText,
    /// Longitude; number or numeric text.
    pub longitude: NumberOrText,
    /// Phone number or email.
    #[serde(default)]
    pub contact: Option<String>,
    /// Elderly, pregnant, disabled residents, etc.
    #[serde(default)]
    pub special_needs: Option<String>,
}

impl TryFrom<HouseholdBody> for NewHousehold {
    type Error = ValidationError;

    fn try_from(body: HouseholdBody) -> Result<Self, Self::Error> {
        Ok(Self {
            name: required_text("name", &body.name)?,
            address: required_text("address", &body.address)?,
            latitude: coordinate("latitude", &body.latitude, -90.0, 90.0)?,
            longitude: coordinate("longitude", &body.longitude, -180.0, 180.0)?,
            contact: body.contact.filter(|c| !c.trim().is_empty()),
            special_needs: body.special_needs.filter(|s| !s.trim().is_empty()),
        })
    }
}

/// Request body for creating or replacing an incident.
#[derive(Debug, Clone, Deserialize)]
pub struct IncidentBody {
    /// Disaster type ("flood", "fire", ...); open set.
    #[serde(rename = "type")]
    pub kind: String,
    /// Lifecycle phase name.
    pub phase: String,
    /// Severity level name.
    pub severity: String,
    /// Detailed description.
    pub description: String,
    /// Location impacted by the disaster.
    pub affected_area: String,
    /// Families affected; number or numeric text.
    pub affected_families: NumberOrText,
    /// Families that received aid; number or numeric text.
    pub relief_distributed: NumberOrText,
}

impl TryFrom<IncidentBody> for NewIncident {
    type Error = ValidationError;

    fn try_from(body: IncidentBody) -> Result<Self, Self::Error> {
        let phase = body
            .phase
            .parse::<IncidentPhase>()
            .map_err(|_| ValidationError::UnknownVariant {
                field: "phase",
                value: body.phase.clone(),
            })?;
        let severity =
            body.severity
                .parse::<IncidentSeverity>()
                .map_err(|_| ValidationError::UnknownVariant {
                    field: "severity",
                    value: body.severity.clone(),
                })?;

        let affected_families = count("affected_families", &body.affected_families)?;
        let relief_distributed = count("relief_distributed", &body.relief_distributed)?;
        if relief_distributed > affected_families {
            return Err(ValidationError::ReliefExceedsAffected {
                relief: relief_distributed,
                affected: affected_families,
            });
        }

        Ok(Self {
            kind: required_text("type", &body.kind)?,
            phase,
            severity,
            description: required_text("description", &body.description)?,
            affected_area: required_text("affected_area", &body.affected_area)?,
            affected_families,
            relief_distributed,
        })
    }
}

/// Request body for the household status toggle.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusBody {
    /// Target status: `"safe"` or `"not_safe"`.
    pub status: String,
}

impl StatusBody {
    /// Parses the target status, rejecting anything other than the two
    /// verified states (including `"unverified"` — a household can only
    /// return to unverified by re-registration).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnsupportedStatus`] otherwise.
    pub fn parse(&self) -> Result<HouseholdStatus, ValidationError> {
        match self.status.parse::<HouseholdStatus>() {
            Ok(HouseholdStatus::Safe) => Ok(HouseholdStatus::Safe),
            Ok(HouseholdStatus::NotSafe) => Ok(HouseholdStatus::NotSafe),
            _ => Err(ValidationError::UnsupportedStatus {
                value: self.status.clone(),
            }),
        }
    }
}

/// A household as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHousehold {
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

impl From<HouseholdRow> for ApiHousehold {
    fn from(row: HouseholdRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            address: row.address,
            latitude: row.latitude,
            longitude: row.longitude,
            contact: row.contact,
            special_needs: row.special_needs,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// An incident as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiIncident {
    /// Server-assigned UUID.
    pub id: String,
    /// Disaster type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Lifecycle phase.
    pub phase: IncidentPhase,
    /// Severity level.
    pub severity: IncidentSeverity,
    /// Detailed description.
    pub description: String,
    /// Location impacted by the disaster.
    pub affected_area: String,
    /// Families affected.
    pub affected_families: i64,
    /// Families that received aid.
    pub relief_distributed: i64,
    /// Creation time (RFC 3339).
    pub created_at: String,
    /// Last mutation time (RFC 3339).
    pub updated_at: String,
}

impl From<IncidentRow> for ApiIncident {
    fn from(row: IncidentRow) -> Self {
        Self {
            id: row.id,
            kind: row.kind,
            phase: row.phase,
            severity: row.severity,
            description: row.description,
            affected_area: row.affected_area,
            affected_families: row.affected_families,
            relief_distributed: row.relief_distributed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// One entry in a household's status audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiStatusChange {
    /// Status before the change.
    pub previous_status: HouseholdStatus,
    /// Status after the change.
    pub new_status: HouseholdStatus,
    /// When the change was recorded (RFC 3339).
    pub changed_at: String,
}

impl From<StatusChangeRow> for ApiStatusChange {
    fn from(row: StatusChangeRow) -> Self {
        Self {
            previous_status: row.previous_status,
            new_status: row.new_status,
            changed_at: row.changed_at,
        }
    }
}

/// Aggregate dashboard metrics as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMetrics {
    /// Total registered households.
    pub total_households: u64,
    /// Households confirmed safe.
    pub safe_count: u64,
    /// Households confirmed not safe.
    pub not_safe_count: u64,
    /// Households not yet checked.
    pub unverified_count: u64,
    /// Percentage of households confirmed safe, one decimal.
    pub safe_percentage: f64,
    /// Total reported incidents.
    pub total_incidents: u64,
    /// Incidents in the `incoming` or `occurring` phase.
    pub active_incidents: u64,
    /// Incident counts per phase.
    pub by_phase: Vec<PhaseCount>,
    /// Incident counts per severity.
    pub by_severity: Vec<SeverityCount>,
    /// Sum of `affected_families` across all incidents.
    pub total_affected_families: u64,
    /// Sum of `relief_distributed` across all incidents.
    pub total_relief_distributed: u64,
}

impl From<MetricsSnapshot> for ApiMetrics {
    fn from(snapshot: MetricsSnapshot) -> Self {
        Self {
            total_households: snapshot.total_households,
            safe_count: snapshot.safe_count,
            not_safe_count: snapshot.not_safe_count,
            unverified_count: snapshot.unverified_count,
            safe_percentage: snapshot.safe_percentage,
            total_incidents: snapshot.total_incidents,
            active_incidents: snapshot.active_incidents,
            by_phase: snapshot.by_phase,
            by_severity: snapshot.by_severity,
            total_affected_families: snapshot.total_affected_families,
            total_relief_distributed: snapshot.total_relief_distributed,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn household_body(latitude: &str, longitude: &str) -> HouseholdBody {
        serde_json::from_value(serde_json::json!({
            "name": "Juan Dela Cruz",
            "address": "123 Rizal St",
            "latitude": latitude,
            "longitude": longitude,
            "contact": "0917-555-0101",
        }))
        .unwrap()
    }

    fn incident_body(families: serde_json::Value, relief: serde_json::Value) -> IncidentBody {
        serde_json::from_value(serde_json::json!({
            "type": "flood",
            "phase": "occurring",
            "severity": "high",
            "description": "River overflow",
            "affected_area": "Barangay San Roque",
            "affected_families": families,
            "relief_distributed": relief,
        }))
        .unwrap()
    }

    #[test]
    fn text_coordinates_parse() {
        let input = NewHousehold::try_from(household_body("14.5994", "120.9842")).unwrap();
        assert!((input.latitude - 14.5994).abs() < f64::EPSILON);
        assert!((input.longitude - 120.9842).abs() < f64::EPSILON);
    }

    #[test]
    fn non_numeric_coordinate_rejected() {
        let err = NewHousehold::try_from(household_body("abc", "120.9842")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidNumber {
                field: "latitude",
                value: "abc".to_string(),
            }
        );
    }

    #[test]
    fn out_of_range_coordinate_rejected() {
        let err = NewHousehold::try_from(household_body("91.0", "120.9842")).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfRange { field: "latitude", .. }
        ));

        let err = NewHousehold::try_from(household_body("14.0", "-181")).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfRange { field: "longitude", .. }
        ));
    }

    #[test]
    fn empty_name_rejected() {
        let mut body = household_body("14.5994", "120.9842");
        body.name = "   ".to_string();
        assert_eq!(
            NewHousehold::try_from(body).unwrap_err(),
            ValidationError::Empty { field: "name" }
        );
    }

    #[test]
    fn blank_optional_fields_become_none() {
        let mut body = household_body("14.5994", "120.9842");
        body.contact = Some(String::new());
        let input = NewHousehold::try_from(body).unwrap();
        assert_eq!(input.contact, None);
    }

    #[test]
    fn counts_accept_text_and_numbers() {
        let input = NewIncident::try_from(incident_body("12".into(), 5.into())).unwrap();
        assert_eq!(input.affected_families, 12);
        assert_eq!(input.relief_distributed, 5);
    }

    #[test]
    fn large_text_counts_keep_every_digit() {
        let input =
            NewIncident::try_from(incident_body("9007199254740993".into(), 0.into())).unwrap();
        assert_eq!(input.affected_families, 9_007_199_254_740_993);

        let parsed = NumberOrText::Text(i64::MAX.to_string())
            .parse_i64("affected_families")
            .unwrap();
        assert_eq!(parsed, i64::MAX);
    }

    #[test]
    fn non_integer_count_rejected() {
        let err = NewIncident::try_from(incident_body("abc".into(), 0.into())).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidNumber { field: "affected_families", .. }
        ));

        let err = NewIncident::try_from(incident_body("12.5".into(), 0.into())).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NotAnInteger { field: "affected_families", .. }
        ));
    }

    #[test]
    fn negative_count_rejected() {
        let err = NewIncident::try_from(incident_body((-3).into(), 0.into())).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Negative {
                field: "affected_families",
                value: -3,
            }
        );
    }

    #[test]
    fn relief_exceeding_affected_rejected() {
        let err = NewIncident::try_from(incident_body(5.into(), 6.into())).unwrap_err();
        assert_eq!(
            err,
            ValidationError::ReliefExceedsAffected {
                relief: 6,
                affected: 5,
            }
        );
    }

    #[test]
    fn unknown_phase_and_severity_rejected() {
        let mut body = incident_body(1.into(), 0.into());
        body.phase = "imminent".to_string();
        assert!(matches!(
            NewIncident::try_from(body).unwrap_err(),
            ValidationError::UnknownVariant { field: "phase", .. }
        ));

        let mut body = incident_body(1.into(), 0.into());
        body.severity = "extreme".to_string();
        assert!(matches!(
            NewIncident::try_from(body).unwrap_err(),
            ValidationError::UnknownVariant { field: "severity", .. }
        ));
    }

    #[test]
    fn status_body_only_accepts_verified_states() {
        let safe = StatusBody {
            status: "safe".to_string(),
        };
        assert_eq!(safe.parse().unwrap(), HouseholdStatus::Safe);

        let not_safe = StatusBody {
            status: "not_safe".to_string(),
        };
        assert_eq!(not_safe.parse().unwrap(), HouseholdStatus::NotSafe);

        for bad in ["unverified", "missing", ""] {
            let body = StatusBody {
                status: bad.to_string(),
            };
            assert!(matches!(
                body.parse().unwrap_err(),
                ValidationError::UnsupportedStatus { .. }
            ));
        }
    }

    #[test]
    fn incident_serializes_type_field() {
        let api = ApiIncident {
            id: "abc".to_string(),
            kind: "flood".to_string(),
            phase: IncidentPhase::Past,
            severity: IncidentSeverity::Low,
            description: String::new(),
            affected_area: String::new(),
            affected_families: 0,
            relief_distributed: 0,
            created_at: String::new(),
            updated_at: String::new(),
        };
        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["type"], "flood");
        assert_eq!(json["phase"], "past");
        assert!(json.get("kind").is_none());
    }
}
