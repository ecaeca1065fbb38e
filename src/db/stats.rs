use crate::db::pool::DbPool;
use ansi_term::Colour;
use chrono::NaiveDate;
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    let c = Colour::Cyan;
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{} {}", c.paint("• File:"), Colour::Yellow.paint(db_path));
    println!("{} {:.2} MB", c.paint("• Size:"), file_mb);

    //
    // 2) ROW COUNTS
    //
    let punches: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM punches", [], |row| row.get(0))?;
    let live: i64 = pool.conn.query_row(
        "SELECT COUNT(*) FROM punches WHERE superseded = 0",
        [],
        |row| row.get(0),
    )?;
    let employees: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM employees", [], |row| row.get(0))?;
    let adjustments: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM adjustment_history", [], |row| {
            row.get(0)
        })?;

    println!(
        "{} {} ({} live)",
        c.paint("• Punches:"),
        Colour::Green.paint(punches.to_string()),
        live
    );
    println!("{} {}", c.paint("• Employees:"), employees);
    println!("{} {}", c.paint("• Adjustments:"), adjustments);

    //
    // 3) DATE RANGE
    //
    let first_date: Option<String> = pool
        .conn
        .query_row(
            "SELECT date FROM punches ORDER BY date ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let last_date: Option<String> = pool
        .conn
        .query_row(
            "SELECT date FROM punches ORDER BY date DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    println!("{}", c.paint("• Date range:"));
    println!("    from: {}", first_date.clone().unwrap_or("--".into()));
    println!("    to:   {}", last_date.clone().unwrap_or("--".into()));

    //
    // 4) AVERAGE PUNCHES/DAY
    //
    if let (Some(f), Some(l)) = (first_date, last_date) {
        let d1 = parse_date(&f)?;
        let d2 = parse_date(&l)?;
        let days = (d2 - d1).num_days().max(1);

        let avg = punches as f64 / days as f64;
        println!("{} {:.2}", c.paint("• Average punches/day:"), avg);
    }

    println!();
    Ok(())
}

fn parse_date(date_str: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}
