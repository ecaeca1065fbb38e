use crate::ui::messages::{success, warning};
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Check if the `punches` table has a `superseded` column.
fn punches_has_superseded_column(conn: &Connection) -> Result<bool> {
    let mut stmt = conn.prepare("PRAGMA table_info('punches')")?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == "superseded" {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Create the `punches` table with the modern schema.
///
/// The partial unique index is the serialization point for concurrent
/// writers: at most one live punch per (employee, day, slot), the loser of
/// a race hits a constraint failure.
fn create_punches_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS punches (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id  TEXT NOT NULL,
            date         TEXT NOT NULL,
            time         TEXT NOT NULL,
            slot         TEXT NOT NULL CHECK(slot IN ('entry','lunch_out','lunch_return','exit')),
            provenance   TEXT NOT NULL DEFAULT 'normal' CHECK(provenance IN ('normal','corrected','batch')),
            note         TEXT DEFAULT '',
            superseded   INTEGER NOT NULL DEFAULT 0,
            created_at   TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_punches_live_slot
            ON punches(employee_id, date, slot) WHERE superseded = 0;
        CREATE INDEX IF NOT EXISTS idx_punches_emp_date ON punches(employee_id, date);
        "#,
    )?;
    Ok(())
}

fn create_ledger_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id            TEXT PRIMARY KEY,
            name          TEXT NOT NULL DEFAULT '',
            schedule_code TEXT NOT NULL DEFAULT 'M',
            is_admin      INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS schedule_overrides (
            employee_id  TEXT PRIMARY KEY,
            lunch_out    TEXT NOT NULL,
            lunch_return TEXT NOT NULL,
            updated_at   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS adjustment_quota (
            employee_id TEXT NOT NULL,
            month       TEXT NOT NULL,
            used        INTEGER NOT NULL DEFAULT 0,
            remaining   INTEGER NOT NULL,
            created_at  TEXT NOT NULL,
            PRIMARY KEY (employee_id, month)
        );

        CREATE TABLE IF NOT EXISTS adjustment_history (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id  TEXT NOT NULL,
            month        TEXT NOT NULL,
            kind         TEXT NOT NULL,
            before_value TEXT DEFAULT '',
            after_value  TEXT DEFAULT '',
            timestamp    TEXT NOT NULL,
            reason       TEXT DEFAULT '',
            by_admin     INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_adjhist_emp_month
            ON adjustment_history(employee_id, month);
        "#,
    )?;
    Ok(())
}

/// Migrate an old `punches` table to the supersede model.
/// Legacy rows all become live (`superseded = 0`).
fn migrate_add_superseded_to_punches(conn: &Connection) -> Result<()> {
    if punches_has_superseded_column(conn)? {
        return Ok(()); // already migrated
    }

    warning("Adding 'superseded' column to punches table...");

    conn.execute_batch(
        r#"
        PRAGMA foreign_keys=OFF;
        BEGIN;

        ALTER TABLE punches ADD COLUMN superseded INTEGER NOT NULL DEFAULT 0;

        CREATE UNIQUE INDEX IF NOT EXISTS idx_punches_live_slot
            ON punches(employee_id, date, slot) WHERE superseded = 0;

        COMMIT;
        PRAGMA foreign_keys=ON;
        "#,
    )?;

    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', 'punches.superseded',
                 'Added superseded flag; legacy rows kept live')",
        [],
    )?;

    success("'superseded' column added.");

    Ok(())
}

fn backup_before_migration(db_path: &str) -> Result<()> {
    use chrono::Local;
    use rusqlite::Error;
    use std::fs::{self, File};
    use std::io::Write;
    use zip::CompressionMethod;
    use zip::ZipWriter;
    use zip::write::FileOptions;

    let backup_name = format!(
        "{}-backup_db_pre_migration.zip",
        Local::now().format("%Y%m%d_%H%M%S")
    );

    let backup_path = std::path::Path::new(db_path)
        .parent()
        .unwrap()
        .join(&backup_name);

    let file = File::create(&backup_path).map_err(|e| {
        Error::ToSqlConversionFailure(Box::new(std::io::Error::new(
            e.kind(),
            format!("Backup failed (create): {}", e),
        )))
    })?;

    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("database.sqlite", options).map_err(|e| {
        Error::ToSqlConversionFailure(Box::new(std::io::Error::other(format!(
            "Backup failed (start_file): {}",
            e
        ))))
    })?;

    let db_content = fs::read(db_path).map_err(|e| {
        Error::ToSqlConversionFailure(Box::new(std::io::Error::other(format!(
            "Backup failed (read): {}",
            e
        ))))
    })?;

    zip.write_all(&db_content).map_err(|e| {
        Error::ToSqlConversionFailure(Box::new(std::io::Error::other(format!(
            "Backup failed (write_all): {}",
            e
        ))))
    })?;

    zip.finish().map_err(|e| {
        Error::ToSqlConversionFailure(Box::new(std::io::Error::other(format!(
            "Backup failed (finish): {}",
            e
        ))))
    })?;

    success(format!("📦 Backup created: {}", backup_path.display()));
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Detect legacy punches schema (pre-supersede model)
    let punches_exists = table_exists(conn, "punches")?;
    let is_legacy_schema = punches_exists && !punches_has_superseded_column(conn)?;

    // 3) If legacy → perform PRE-MIGRATION BACKUP
    if is_legacy_schema {
        warning("Legacy schema detected — creating safety backup before migration...");

        let db_path: String = conn
            .query_row("PRAGMA database_list;", [], |row| row.get::<_, String>(2))
            .unwrap_or_default();

        if !db_path.is_empty() {
            backup_before_migration(&db_path)?;
        } else {
            warning("Could not determine DB path — backup skipped.");
        }

        migrate_add_superseded_to_punches(conn)?;
    }

    // 4) Create anything still missing
    if !punches_exists {
        create_punches_table(conn)?;
        success("Created punches table (modern schema).");
    }

    create_ledger_tables(conn)?;

    Ok(())
}
