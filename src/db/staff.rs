//! Employee directory and per-employee lunch overrides. The ledger only
//! reads these; maintenance goes through the `staff` command.

use crate::core::schedule::LunchOverride;
use crate::errors::AppResult;
use crate::models::employee::Employee;
use crate::utils::time::parse_time;
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};

pub fn upsert_employee(conn: &Connection, emp: &Employee) -> AppResult<()> {
    conn.execute(
        "INSERT INTO employees (id, name, schedule_code, is_admin)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
             name = excluded.name,
             schedule_code = excluded.schedule_code,
             is_admin = excluded.is_admin",
        params![
            emp.id,
            emp.name,
            emp.schedule_code,
            if emp.is_admin { 1 } else { 0 }
        ],
    )?;
    Ok(())
}

pub fn get_employee(conn: &Connection, id: &str) -> AppResult<Option<Employee>> {
    let emp = conn
        .query_row(
            "SELECT id, name, schedule_code, is_admin FROM employees WHERE id = ?1",
            [id],
            |row| {
                Ok(Employee {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    schedule_code: row.get(2)?,
                    is_admin: row.get::<_, i64>(3)? == 1,
                })
            },
        )
        .optional()?;
    Ok(emp)
}

pub fn list_employees(conn: &Connection) -> AppResult<Vec<Employee>> {
    let mut stmt =
        conn.prepare("SELECT id, name, schedule_code, is_admin FROM employees ORDER BY id ASC")?;

    let rows = stmt.query_map([], |row| {
        Ok(Employee {
            id: row.get(0)?,
            name: row.get(1)?,
            schedule_code: row.get(2)?,
            is_admin: row.get::<_, i64>(3)? == 1,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn set_lunch_override(
    conn: &Connection,
    employee_id: &str,
    ov: &LunchOverride,
) -> AppResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schedule_overrides (employee_id, lunch_out, lunch_return, updated_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            employee_id,
            ov.lunch_out.format("%H:%M").to_string(),
            ov.lunch_return.format("%H:%M").to_string(),
            Local::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn get_lunch_override(conn: &Connection, employee_id: &str) -> AppResult<Option<LunchOverride>> {
    let row = conn
        .query_row(
            "SELECT lunch_out, lunch_return FROM schedule_overrides WHERE employee_id = ?1",
            [employee_id],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )
        .optional()?;

    // An unparseable override is ignored rather than fatal; resolution falls
    // back to the base schedule.
    Ok(row.and_then(|(lo, lr)| {
        Some(LunchOverride {
            lunch_out: parse_time(&lo)?,
            lunch_return: parse_time(&lr)?,
        })
    }))
}
