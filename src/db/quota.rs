//! Adjustment quota persistence. The decrement is a conditional UPDATE
//! (compare-and-set on `remaining > 0`), so two concurrent corrections can
//! never both consume the last slot.

use crate::errors::{AppError, AppResult};
use crate::models::quota::{AdjustmentKind, AdjustmentQuota, AdjustmentRecord};
use chrono::Local;
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};

/// Fetch the month's quota record, creating it lazily on first access.
pub fn get_or_create(
    conn: &Connection,
    employee_id: &str,
    month: &str,
    cap: i32,
) -> AppResult<AdjustmentQuota> {
    conn.execute(
        "INSERT OR IGNORE INTO adjustment_quota (employee_id, month, used, remaining, created_at)
         VALUES (?1, ?2, 0, ?3, ?4)",
        params![employee_id, month, cap, Local::now().to_rfc3339()],
    )?;

    let (used, remaining, created_at) = conn.query_row(
        "SELECT used, remaining, created_at FROM adjustment_quota
         WHERE employee_id = ?1 AND month = ?2",
        params![employee_id, month],
        |row| {
            Ok((
                row.get::<_, i32>(0)?,
                row.get::<_, i32>(1)?,
                row.get::<_, String>(2)?,
            ))
        },
    )?;

    Ok(AdjustmentQuota {
        employee_id: employee_id.to_string(),
        month: month.to_string(),
        used,
        remaining,
        history: load_history(conn, employee_id, month)?,
        created_at,
    })
}

/// Consume one adjustment slot. Returns false when nothing is left; the
/// WHERE clause guarantees `remaining` never goes below 0, concurrency or
/// not.
pub fn try_consume(conn: &Connection, employee_id: &str, month: &str) -> AppResult<bool> {
    let res = conn.execute(
        "UPDATE adjustment_quota
         SET used = used + 1, remaining = remaining - 1
         WHERE employee_id = ?1 AND month = ?2 AND remaining > 0",
        params![employee_id, month],
    );

    match res {
        Ok(rows) => Ok(rows == 1),
        Err(rusqlite::Error::SqliteFailure(ffi_err, _))
            if matches!(
                ffi_err.code,
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
            ) =>
        {
            Err(AppError::ConcurrentWriteConflict(format!(
                "quota {} {}",
                employee_id, month
            )))
        }
        Err(e) => Err(AppError::Db(e)),
    }
}

pub fn remaining(conn: &Connection, employee_id: &str, month: &str) -> AppResult<Option<i32>> {
    let r = conn
        .query_row(
            "SELECT remaining FROM adjustment_quota WHERE employee_id = ?1 AND month = ?2",
            params![employee_id, month],
            |row| row.get::<_, i32>(0),
        )
        .optional()?;
    Ok(r)
}

/// Append one entry to the audit trail. Append-only: there is no update or
/// delete path for this table anywhere in the crate.
pub fn append_history(
    conn: &Connection,
    employee_id: &str,
    month: &str,
    record: &AdjustmentRecord,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO adjustment_history
         (employee_id, month, kind, before_value, after_value, timestamp, reason, by_admin)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            employee_id,
            month,
            record.kind.to_db_str(),
            record.before,
            record.after,
            record.timestamp,
            record.reason,
            if record.by_admin { 1 } else { 0 },
        ],
    )?;
    Ok(())
}

pub fn load_history(
    conn: &Connection,
    employee_id: &str,
    month: &str,
) -> AppResult<Vec<AdjustmentRecord>> {
    let mut stmt = conn.prepare(
        "SELECT kind, before_value, after_value, timestamp, reason, by_admin
         FROM adjustment_history
         WHERE employee_id = ?1 AND month = ?2
         ORDER BY id ASC",
    )?;

    let rows = stmt.query_map(params![employee_id, month], |row| {
        let kind_str: String = row.get(0)?;
        Ok(AdjustmentRecord {
            kind: AdjustmentKind::from_db_str(&kind_str).unwrap_or(AdjustmentKind::PunchCorrection),
            before: row.get(1)?,
            after: row.get(2)?,
            timestamp: row.get(3)?,
            reason: row.get(4)?,
            by_admin: row.get::<_, i64>(5)? == 1,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
