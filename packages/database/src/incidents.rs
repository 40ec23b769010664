//! Incident registry queries.
//!
//! Same contract shape as the household queries: snapshot list in insertion
//! order, UUID ids assigned on insert, full-field replacement on update,
//! `NotFound` on any mutation of an unknown id.

use moosicbox_json_utils::database::ToValue as _;
use resitrack_database_models::{IncidentRow, NewIncident};
use resitrack_relief_models::{IncidentPhase, IncidentSeverity};
use switchy_database::{Database, DatabaseValue};
use uuid::Uuid;

use crate::{DbError, now_rfc3339};

const SELECT_COLUMNS: &str = "id, kind, phase, severity, description,
                affected_area, affected_families, relief_distributed, created_at, updated_at";

fn incident_from_row(row: &switchy_database::Row) -> Result<IncidentRow, DbError> {
    let phase_text: String = row.to_value("phase").map_err(conversion("incident phase"))?;
    let phase = phase_text
        .parse::<IncidentPhase>()
        .map_err(|_| DbError::Conversion {
            message: format!("Unknown incident phase in row: {phase_text}"),
        })?;

    let severity_text: String = row
        .to_value("severity")
        .map_err(conversion("incident severity"))?;
    let severity = severity_text
        .parse::<IncidentSeverity>()
        .map_err(|_| DbError::Conversion {
            message: format!("Unknown incident severity in row: {severity_text}"),
        })?;

    Ok(IncidentRow {
        id: row.to_value("id").map_err(conversion("incident id"))?,
        kind: row.to_value("kind").map_err(conversion("incident kind"))?,
        phase,
        severity,
        description: row
            .to_value("description")
            .map_err(conversion("incident description"))?,
        affected_area: row
            .to_value("affected_area")
            .map_err(conversion("incident affected_area"))?,
        affected_families: row
            .to_value("affected_families")
            .map_err(conversion("incident affected_families"))?,
        relief_distributed: row
            .to_value("relief_distributed")
            .map_err(conversion("incident relief_distributed"))?,
        created_at: row
            .to_value("created_at")
            .map_err(conversion("incident created_at"))?,
        updated_at: row
            .to_value("updated_at")
            .map_err(conversion("incident updated_at"))?,
    })
}

fn conversion<E: std::fmt::Display>(what: &'static str) -> impl Fn(E) -> DbError {
    move |e| DbError::Conversion {
        message: format!("Failed to parse {what}: {e}"),
    }
}

/// Returns all incidents in insertion order.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn list(db: &dyn Database) -> Result<Vec<IncidentRow>, DbError> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM incidents ORDER BY rowid");
    let rows = db.query_raw_params(&sql, &[]).await?;

    rows.iter().map(incident_from_row).collect()
}

/// Fetches a single incident by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no incident has that id.
pub async fn get(db: &dyn Database, id: &str) -> Result<IncidentRow, DbError> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM incidents WHERE id = $1");
    let rows = db
        .query_raw_params(&sql, &[DatabaseValue::String(id.to_string())])
        .await?;

    let row = rows.first().ok_or_else(|| DbError::NotFound {
        entity: "incident",
        id: id.to_string(),
    })?;

    incident_from_row(row)
}

/// Reports a new incident. The id is a fresh UUID.
///
/// # Errors
///
/// Returns [`DbError`] if the insert fails.
pub async fn insert(db: &dyn Database, input: &NewIncident) -> Result<IncidentRow, DbError> {
    let now = now_rfc3339();
    let row = IncidentRow {
        id: Uuid::new_v4().to_string(),
        kind: input.kind.clone(),
        phase: input.phase,
        severity: input.severity,
        description: input.description.clone(),
        affected_area: input.affected_area.clone(),
        affected_families: input.affected_families,
        relief_distributed: input.relief_distributed,
        created_at: now.clone(),
        updated_at: now,
    };

    db.exec_raw_params(
        "INSERT INTO incidents (
            id, kind, phase, severity, description,
            affected_area, affected_families, relief_distributed, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        &[
            DatabaseValue::String(row.id.clone()),
            DatabaseValue::String(row.kind.clone()),
            DatabaseValue::String(row.phase.as_ref().to_string()),
            DatabaseValue::String(row.severity.as_ref().to_string()),
            DatabaseValue::String(row.description.clone()),
            DatabaseValue::String(row.affected_area.clone()),
            DatabaseValue::Int64(row.affected_families),
            DatabaseValue::Int64(row.relief_distributed),
            DatabaseValue::String(row.created_at.clone()),
            DatabaseValue::String(row.updated_at.clone()),
        ],
    )
    .await?;

    Ok(row)
}

/// Replaces every field of an incident, including kind/phase/severity.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no incident has that id; the collection
/// is left unchanged.
pub async fn update(
    db: &dyn Database,
    id: &str,
    input: &NewIncident,
) -> Result<IncidentRow, DbError> {
    let affected = db
        .exec_raw_params(
            "UPDATE incidents
             SET kind = $1, phase = $2, severity = $3, description = $4,
                 affected_area = $5, affected_families = $6, relief_distributed = $7,
                 updated_at = $8
             WHERE id = $9",
            &[
                DatabaseValue::String(input.kind.clone()),
                DatabaseValue::String(input.phase.as_ref().to_string()),
                DatabaseValue::String(input.severity.as_ref().to_string()),
                DatabaseValue::String(input.description.clone()),
                DatabaseValue::String(input.affected_area.clone()),
                DatabaseValue::Int64(input.affected_families),
                DatabaseValue::Int64(input.relief_distributed),
                DatabaseValue::String(now_rfc3339()),
                DatabaseValue::String(id.to_string()),
            ],
        )
        .await?;

    if affected == 0 {
        return Err(DbError::NotFound {
            entity: "incident",
            id: id.to_string(),
        });
    }

    get(db, id).await
}

/// Deletes an incident by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no incident has that id.
pub async fn delete(db: &dyn Database, id: &str) -> Result<(), DbError> {
    let affected = db
        .exec_raw_params(
            "DELETE FROM incidents WHERE id = $1",
            &[DatabaseValue::String(id.to_string())],
        )
        .await?;

    if affected == 0 {
        return Err(DbError::NotFound {
            entity: "incident",
            id: id.to_string(),
        });
    }

    Ok(())
}
