//! Household registry queries.
//!
//! Every function takes `&dyn Database` and issues raw parameterized SQL,
//! so callers decide whether they talk to the on-disk or an in-memory
//! database. List order is insertion order (implicit rowid).

use moosicbox_json_utils::database::ToValue as _;
use resitrack_database_models::{HouseholdRow, NewHousehold, StatusChangeRow};
use resitrack_relief_models::HouseholdStatus;
use switchy_database::{Database, DatabaseValue};
use uuid::Uuid;

use crate::{DbError, now_rfc3339};

const SELECT_COLUMNS: &str = "id, name, address, latitude, longitude,
                contact, special_needs, status, created_at, updated_at";

fn household_from_row(row: &switchy_database::Row) -> Result<HouseholdRow, DbError> {
    let status_text: String = row.to_value("status").map_err(|e| DbError::Conversion {
        message: format!("Failed to read household status: {e}"),
    })?;
    let status = status_text
        .parse::<HouseholdStatus>()
        .map_err(|_| DbError::Conversion {
            message: format!("Unknown household status in row: {status_text}"),
        })?;

    Ok(HouseholdRow {
        id: row.to_value("id").map_err(conversion("household id"))?,
        name: row.to_value("name").map_err(conversion("household name"))?,
        address: row
            .to_value("address")
            .map_err(conversion("household address"))?,
        latitude: row
            .to_value("latitude")
            .map_err(conversion("household latitude"))?,
        longitude: row
            .to_value("longitude")
            .map_err(conversion("household longitude"))?,
        contact: row.to_value("contact").unwrap_or(None),
        special_needs: row.to_value("special_needs").unwrap_or(None),
        status,
        created_at: row
            .to_value("created_at")
            .map_err(conversion("household created_at"))?,
        updated_at: row
            .to_value("updated_at")
            .map_err(conversion("household updated_at"))?,
    })
}

fn conversion<E: std::fmt::Display>(what: &'static str) -> impl Fn(E) -> DbError {
    move |e| DbError::Conversion {
        message: format!("Failed to parse {what}: {e}"),
    }
}

fn optional_text(value: Option<&String>) -> DatabaseValue {
    value.map_or(DatabaseValue::Null, |v| DatabaseValue::String(v.clone()))
}

/// Returns all households in insertion order.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn list(db: &dyn Database) -> Result<Vec<HouseholdRow>, DbError> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM households ORDER BY rowid");
    let rows = db.query_raw_params(&sql, &[]).await?;

    rows.iter().map(household_from_row).collect()
}

/// Fetches a single household by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no household has that id.
pub async fn get(db: &dyn Database, id: &str) -> Result<HouseholdRow, DbError> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM households WHERE id = $1");
    let rows = db
        .query_raw_params(&sql, &[DatabaseValue::String(id.to_string())])
        .await?;

    let row = rows.first().ok_or_else(|| DbError::NotFound {
        entity: "household",
        id: id.to_string(),
    })?;

    household_from_row(row)
}

/// Registers a new household. The id is a fresh UUID and the status starts
/// `unverified`.
///
/// # Errors
///
/// Returns [`DbError`] if the insert fails.
pub async fn insert(db: &dyn Database, input: &NewHousehold) -> Result<HouseholdRow, DbError> {
    let now = now_rfc3339();
    let row = HouseholdRow {
        id: Uuid::new_v4().to_string(),
        name: input.name.clone(),
        address: input.address.clone(),
        latitude: input.latitude,
        longitude: input.longitude,
        contact: input.contact.clone(),
        special_needs: input.special_needs.clone(),
        status: HouseholdStatus::Unverified,
        created_at: now.clone(),
        updated_at: now,
    };

    db.exec_raw_params(
        "INSERT INTO households (
            id, name, address, latitude, longitude,
            contact, special_needs, status, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        &[
            DatabaseValue::String(row.id.clone()),
            DatabaseValue::String(row.name.clone()),
            DatabaseValue::String(row.address.clone()),
            DatabaseValue::Real64(row.latitude),
            DatabaseValue::Real64(row.longitude),
            optional_text(row.contact.as_ref()),
            optional_text(row.special_needs.as_ref()),
            DatabaseValue::String(row.status.as_ref().to_string()),
            DatabaseValue::String(row.created_at.clone()),
            DatabaseValue::String(row.updated_at.clone()),
        ],
    )
    .await?;

    Ok(row)
}

/// Replaces every editable field of a household. Status is untouched; it
/// only changes through [`set_status`].
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no household has that id; the
/// collection is left unchanged.
pub async fn update(
    db: &dyn Database,
    id: &str,
    input: &NewHousehold,
) -> Result<HouseholdRow, DbError> {
    let affected = db
        .exec_raw_params(
            "UPDATE households
             SET name = $1, address = $2, latitude = $3, longitude = $4,
                 contact = $5, special_needs = $6, updated_at = $7
             WHERE id = $8",
            &[
                DatabaseValue::String(input.name.clone()),
                DatabaseValue::String(input.address.clone()),
                DatabaseValue::Real64(input.latitude),
                DatabaseValue::Real64(input.longitude),
                optional_text(input.contact.as_ref()),
                optional_text(input.special_needs.as_ref()),
                DatabaseValue::String(now_rfc3339()),
                DatabaseValue::String(id.to_string()),
            ],
        )
        .await?;

    if affected == 0 {
        return Err(DbError::NotFound {
            entity: "household",
            id: id.to_string(),
        });
    }

    get(db, id).await
}

/// Sets the safety status of a household, appending an audit row.
///
/// Idempotent: setting the status a household already has is a no-op that
/// returns the current row and writes nothing (no audit row either).
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no household has that id.
pub async fn set_status(
    db: &dyn Database,
    id: &str,
    status: HouseholdStatus,
) -> Result<HouseholdRow, DbError> {
    let current = get(db, id).await?;
    if current.status == status {
        return Ok(current);
    }

    let now = now_rfc3339();

    let affected = db
        .exec_raw_params(
            "UPDATE households SET status = $1, updated_at = $2 WHERE id = $3",
            &[
                DatabaseValue::String(status.as_ref().to_string()),
                DatabaseValue::String(now.clone()),
                DatabaseValue::String(id.to_string()),
            ],
        )
        .await?;

    // The household can disappear between the read above and this write;
    // don't audit a transition that never happened.
    if affected == 0 {
        return Err(DbError::NotFound {
            entity: "household",
            id: id.to_string(),
        });
    }

    db.exec_raw_params(
        "INSERT INTO status_history (household_id, previous_status, new_status, changed_at)
         VALUES ($1, $2, $3, $4)",
        &[
            DatabaseValue::String(id.to_string()),
            DatabaseValue::String(current.status.as_ref().to_string()),
            DatabaseValue::String(status.as_ref().to_string()),
            DatabaseValue::String(now.clone()),
        ],
    )
    .await?;

    Ok(HouseholdRow {
        status,
        updated_at: now,
        ..current
    })
}

/// Deletes a household by id. Its audit trail is kept.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no household has that id.
pub async fn delete(db: &dyn Database, id: &str) -> Result<(), DbError> {
    let affected = db
        .exec_raw_params(
            "DELETE FROM households WHERE id = $1",
            &[DatabaseValue::String(id.to_string())],
        )
        .await?;

    if affected == 0 {
        return Err(DbError::NotFound {
            entity: "household",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Returns the status audit trail for a household, oldest first.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no household has that id.
pub async fn status_history(db: &dyn Database, id: &str) -> Result<Vec<StatusChangeRow>, DbError> {
    // Distinguish "never changed" from "no such household".
    get(db, id).await?;

    let rows = db
        .query_raw_params(
            "SELECT household_id, previous_status, new_status, changed_at
             FROM status_history WHERE household_id = $1 ORDER BY rowid",
            &[DatabaseValue::String(id.to_string())],
        )
        .await?;

    rows.iter()
        .map(|row| {
            let previous: String = row
                .to_value("previous_status")
                .map_err(conversion("previous_status"))?;
            let new: String = row
                .to_value("new_status")
                .map_err(conversion("new_status"))?;

            Ok(StatusChangeRow {
                household_id: row
                    .to_value("household_id")
                    .map_err(conversion("household_id"))?,
                previous_status: previous.parse().map_err(|_| DbError::Conversion {
                    message: format!("Unknown status in audit row: {previous}"),
                })?,
                new_status: new.parse().map_err(|_| DbError::Conversion {
                    message: format!("Unknown status in audit row: {new}"),
                })?,
                changed_at: row.to_value("changed_at").map_err(conversion("changed_at"))?,
            })
        })
        .collect()
}
