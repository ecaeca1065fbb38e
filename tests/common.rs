#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn plg() -> Command {
    cargo_bin_cmd!("pontoledger")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_pontoledger.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Initialize the DB and register one employee on schedule M
pub fn init_db_with_staff(db_path: &str) {
    // init DB (creates tables)
    plg()
        .args(["--db", db_path, "--test", "init"]) // uses --test init to create schema
        .assert()
        .success();

    plg()
        .args([
            "--db", db_path, "staff", "E001", "--name", "Robson", "--schedule", "M",
        ])
        .assert()
        .success();
}

/// Record a complete on-time day for schedule M (weekday) via the CLI
pub fn punch_full_day(db_path: &str, employee: &str, date: &str) {
    for (slot, at) in [
        ("entry", "07:20"),
        ("lunch-out", "12:00"),
        ("lunch-return", "13:00"),
        ("exit", "16:20"),
    ] {
        plg()
            .args([
                "--db", db_path, "punch", employee, slot, "--at", at, "--date", date,
            ])
            .assert()
            .success();
    }
}
