use crate::db::log::ttlog;
use crate::errors::{AppError, AppResult};
use crate::models::punch::{Provenance, PunchEvent};
use crate::models::slot::SlotKind;
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{Connection, ErrorCode, Result, Row, params};

pub fn map_row(row: &Row) -> Result<PunchEvent> {
    let date_str: String = row.get("date")?;
    let time_str: String = row.get("time")?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::MalformedPunchRecord(format!(
                "bad date: {}",
                date_str
            ))),
        )
    })?;

    let time = NaiveTime::parse_from_str(&time_str, "%H:%M").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::MalformedPunchRecord(format!(
                "bad time: {}",
                time_str
            ))),
        )
    })?;

    let slot_str: String = row.get("slot")?;
    let slot = SlotKind::from_db_str(&slot_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::MalformedPunchRecord(format!(
                "unknown slot: {}",
                slot_str
            ))),
        )
    })?;

    let prov_str: String = row.get("provenance")?;
    let provenance = Provenance::from_db_str(&prov_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::MalformedPunchRecord(format!(
                "unknown provenance: {}",
                prov_str
            ))),
        )
    })?;

    Ok(PunchEvent {
        id: row.get("id")?,
        employee_id: row.get("employee_id")?,
        date,
        time,
        slot,
        provenance,
        note: row.get("note")?,
        superseded: row.get::<_, i64>("superseded")? == 1,
        created_at: row.get("created_at")?,
    })
}

/// Live punches of one employee-day, ordered by time. Malformed rows are
/// skipped and logged, never raised: a corrupted legacy record must not
/// block the day's balance or a live punch.
pub fn load_live_for_day(
    conn: &Connection,
    employee_id: &str,
    date: NaiveDate,
) -> AppResult<Vec<PunchEvent>> {
    let mut out = Vec::new();
    let mut rejects = Vec::new();

    {
        let mut stmt = conn.prepare(
            "SELECT * FROM punches
             WHERE employee_id = ?1 AND date = ?2 AND superseded = 0
             ORDER BY time ASC",
        )?;

        let rows = stmt.query_map(
            params![employee_id, date.format("%Y-%m-%d").to_string()],
            map_row,
        )?;

        for r in rows {
            match r {
                Ok(p) => out.push(p),
                Err(e) => rejects.push(e.to_string()),
            }
        }
    }

    for msg in rejects {
        let _ = ttlog(conn, "hygiene_skip", employee_id, &msg);
    }

    Ok(out)
}

/// Live punches across a date range, malformed rows skipped and logged
/// instead of failing the whole read. Corrupted legacy data must never take
/// down an aggregation.
pub fn load_live_for_range(
    conn: &Connection,
    employee_id: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> AppResult<Vec<PunchEvent>> {
    let mut out = Vec::new();
    let mut rejects = Vec::new();

    {
        let mut stmt = conn.prepare(
            "SELECT * FROM punches
             WHERE employee_id = ?1 AND date >= ?2 AND date <= ?3 AND superseded = 0
             ORDER BY date ASC, time ASC",
        )?;

        let rows = stmt.query_map(
            params![
                employee_id,
                from.format("%Y-%m-%d").to_string(),
                to.format("%Y-%m-%d").to_string()
            ],
            map_row,
        )?;

        for r in rows {
            match r {
                Ok(p) => out.push(p),
                Err(e) => rejects.push(e.to_string()),
            }
        }
    }

    for msg in rejects {
        let _ = ttlog(conn, "hygiene_skip", employee_id, &msg);
    }

    Ok(out)
}

/// The live punch of one slot, if any.
pub fn load_slot(
    conn: &Connection,
    employee_id: &str,
    date: NaiveDate,
    slot: SlotKind,
) -> AppResult<Option<PunchEvent>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM punches
         WHERE employee_id = ?1 AND date = ?2 AND slot = ?3 AND superseded = 0
         LIMIT 1",
    )?;

    let mut rows = stmt.query_map(
        params![
            employee_id,
            date.format("%Y-%m-%d").to_string(),
            slot.to_db_str()
        ],
        map_row,
    )?;

    match rows.next() {
        Some(r) => Ok(Some(r?)),
        None => Ok(None),
    }
}

/// Insert a punch. The partial unique index turns a racing duplicate into a
/// constraint failure, mapped here to DuplicatePunch; a busy database maps
/// to ConcurrentWriteConflict so the caller can re-fetch and decide.
pub fn insert_punch(conn: &Connection, ev: &PunchEvent) -> AppResult<i64> {
    let res = conn.execute(
        "INSERT INTO punches (employee_id, date, time, slot, provenance, note, superseded, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            ev.employee_id,
            ev.date_str(),
            ev.time_str(),
            ev.slot.to_db_str(),
            ev.provenance.to_db_str(),
            ev.note,
            if ev.superseded { 1 } else { 0 },
            ev.created_at,
        ],
    );

    match res {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(e) => Err(map_write_error(e, ev)),
    }
}

fn map_write_error(e: rusqlite::Error, ev: &PunchEvent) -> AppError {
    if let rusqlite::Error::SqliteFailure(ffi_err, _) = &e {
        match ffi_err.code {
            ErrorCode::ConstraintViolation => {
                return AppError::DuplicatePunch {
                    slot: ev.slot.to_db_str().to_string(),
                    date: ev.date_str(),
                };
            }
            ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => {
                return AppError::ConcurrentWriteConflict(format!(
                    "punch {} {} {}",
                    ev.employee_id,
                    ev.date_str(),
                    ev.slot.to_db_str()
                ));
            }
            _ => {}
        }
    }
    AppError::Db(e)
}

/// Retire a punch row. Never deletes: the row stays for reconstruction.
pub fn supersede(conn: &Connection, id: i64) -> AppResult<()> {
    conn.execute("UPDATE punches SET superseded = 1 WHERE id = ?1", [id])?;
    Ok(())
}

/// All live punches of an employee, newest first, lenient mapping.
pub fn load_history(conn: &Connection, employee_id: &str) -> AppResult<Vec<PunchEvent>> {
    let mut out = Vec::new();
    let mut rejects = Vec::new();

    {
        let mut stmt = conn.prepare(
            "SELECT * FROM punches
             WHERE employee_id = ?1 AND superseded = 0
             ORDER BY date DESC, time DESC",
        )?;

        let rows = stmt.query_map([employee_id], map_row)?;
        for r in rows {
            match r {
                Ok(p) => out.push(p),
                Err(e) => rejects.push(e.to_string()),
            }
        }
    }

    for msg in rejects {
        let _ = ttlog(conn, "hygiene_skip", employee_id, &msg);
    }

    Ok(out)
}
