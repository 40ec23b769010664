//! Dashboard metrics aggregation.
//!
//! Metrics are a pure function of the current collections: every call runs
//! fresh aggregate queries rather than maintaining counters incrementally,
//! which rules out staleness and drift between the numbers and the tables.

use std::collections::BTreeMap;

use moosicbox_json_utils::database::ToValue as _;
use resitrack_database_models::{MetricsSnapshot, PhaseCount, SeverityCount};
use resitrack_relief_models::{HouseholdStatus, IncidentPhase, IncidentSeverity};
use switchy_database::Database;

use crate::DbError;

fn count_from_row(row: &switchy_database::Row) -> u64 {
    let n: i64 = row.to_value("cnt").unwrap_or(0);
    u64::try_from(n).unwrap_or(0)
}

async fn grouped_counts(
    db: &dyn Database,
    sql: &str,
    key_column: &str,
) -> Result<BTreeMap<String, u64>, DbError> {
    let rows = db.query_raw_params(sql, &[]).await?;

    let mut counts = BTreeMap::new();
    for row in &rows {
        let key: String = row.to_value(key_column).unwrap_or_default();
        counts.insert(key, count_from_row(row));
    }

    Ok(counts)
}

/// Computes the current dashboard metrics snapshot.
///
/// Phase and severity breakdowns always contain every variant, zeroes
/// included, so consumers never have to special-case missing keys.
///
/// # Errors
///
/// Returns [`DbError`] if any aggregate query fails.
pub async fn compute(db: &dyn Database) -> Result<MetricsSnapshot, DbError> {
    let by_status = grouped_counts(
        db,
        "SELECT status, COUNT(*) as cnt FROM households GROUP BY status",
        "status",
    )
    .await?;
    let status_count =
        |status: HouseholdStatus| by_status.get(status.as_ref()).copied().unwrap_or(0);

    let safe_count = status_count(HouseholdStatus::Safe);
    let not_safe_count = status_count(HouseholdStatus::NotSafe);
    let unverified_count = status_count(HouseholdStatus::Unverified);
    let total_households = safe_count + not_safe_count + unverified_count;

    #[allow(clippy::cast_precision_loss)]
    let safe_percentage = if total_households == 0 {
        0.0
    } else {
        (safe_count as f64 / total_households as f64 * 1000.0).round() / 10.0
    };

    let phase_counts = grouped_counts(
        db,
        "SELECT phase, COUNT(*) as cnt FROM incidents GROUP BY phase",
        "phase",
    )
    .await?;
    let by_phase: Vec<PhaseCount> = IncidentPhase::all()
        .iter()
        .map(|&phase| PhaseCount {
            phase,
            count: phase_counts.get(phase.as_ref()).copied().unwrap_or(0),
        })
        .collect();

    let severity_counts = grouped_counts(
        db,
        "SELECT severity, COUNT(*) as cnt FROM incidents GROUP BY severity",
        "severity",
    )
    .await?;
    let by_severity: Vec<SeverityCount> = IncidentSeverity::all()
        .iter()
        .map(|&severity| SeverityCount {
            severity,
            count: severity_counts.get(severity.as_ref()).copied().unwrap_or(0),
        })
        .collect();

    let total_incidents = by_phase.iter().map(|p| p.count).sum();
    let active_incidents = by_phase
        .iter()
        .filter(|p| p.phase.is_active())
        .map(|p| p.count)
        .sum();

    let rows = db
        .query_raw_params(
            "SELECT COALESCE(SUM(affected_families), 0) as families,
                    COALESCE(SUM(relief_distributed), 0) as relief
             FROM incidents",
            &[],
        )
        .await?;
    let (total_affected_families, total_relief_distributed) =
        rows.first().map_or((0, 0), |row| {
            let families: i64 = row.to_value("families").unwrap_or(0);
            let relief: i64 = row.to_value("relief").unwrap_or(0);
            (
                u64::try_from(families).unwrap_or(0),
                u64::try_from(relief).unwrap_or(0),
            )
        });

    Ok(MetricsSnapshot {
        total_households,
        safe_count,
        not_safe_count,
        unverified_count,
        safe_percentage,
        total_incidents,
        active_incidents,
        by_phase,
        by_severity,
        total_affected_families,
        total_relief_distributed,
    })
}
