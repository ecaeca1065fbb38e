//! Ledger facade tests against a real SQLite file: duplicate serialization,
//! correction supersede semantics, quota atomicity and notifications.

use chrono::{NaiveDate, NaiveDateTime};
use pontoledger::config::Config;
use pontoledger::db::initialize::init_db;
use pontoledger::db::{punches, staff};
use pontoledger::errors::AppError;
use pontoledger::ledger::Ledger;
use pontoledger::models::employee::Employee;
use pontoledger::models::punch::{Provenance, PunchEvent};
use pontoledger::models::quota::AdjustmentKind;
use pontoledger::models::slot::SlotKind;
use pontoledger::utils::time::parse_time;
use rusqlite::Connection;
use std::cell::RefCell;
use std::rc::Rc;

fn setup(name: &str, schedule_code: &str) -> Config {
    let mut path = std::env::temp_dir();
    path.push(format!("{}_pontoledger_lib.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    std::fs::remove_file(&db_path).ok();

    let conn = Connection::open(&db_path).expect("open db");
    init_db(&conn).expect("init db");
    staff::upsert_employee(
        &conn,
        &Employee {
            id: "E001".to_string(),
            name: "Robson".to_string(),
            schedule_code: schedule_code.to_string(),
            is_admin: false,
        },
    )
    .expect("add employee");

    Config {
        database: db_path,
        ..Config::default()
    }
}

fn monday_at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 2)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

#[test]
fn store_constraint_serializes_duplicate_slots() {
    let cfg = setup("store_dup", "M");
    let conn = Connection::open(&cfg.database).unwrap();

    let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    let ev = PunchEvent::new(
        "E001",
        date,
        parse_time("07:20").unwrap(),
        SlotKind::Entry,
        Provenance::Normal,
        None,
    );

    punches::insert_punch(&conn, &ev).expect("first insert wins");

    // Second writer for the same (employee, day, slot) loses
    let err = punches::insert_punch(&conn, &ev).unwrap_err();
    assert!(matches!(err, AppError::DuplicatePunch { .. }));

    // The existing record stands untouched
    let live = punches::load_live_for_day(&conn, "E001", date).unwrap();
    assert_eq!(live.len(), 1);
}

#[test]
fn record_punch_rejects_duplicates() {
    let cfg = setup("ledger_dup", "M");
    let mut ledger = Ledger::open(&cfg).unwrap();

    ledger
        .record_punch("E001", SlotKind::Entry, monday_at(7, 20), None)
        .expect("first entry");

    let err = ledger
        .record_punch("E001", SlotKind::Entry, monday_at(7, 25), None)
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicatePunch { .. }));
}

#[test]
fn unknown_employee_is_rejected() {
    let cfg = setup("unknown_emp", "M");
    let mut ledger = Ledger::open(&cfg).unwrap();

    let err = ledger
        .record_punch("NOBODY", SlotKind::Entry, monday_at(7, 20), None)
        .unwrap_err();
    assert!(matches!(err, AppError::UnknownEmployee(_)));
}

#[test]
fn non_working_day_rejects_live_punches() {
    let cfg = setup("folga_punch", "FOLGA");
    let mut ledger = Ledger::open(&cfg).unwrap();

    let err = ledger
        .record_punch("E001", SlotKind::Entry, monday_at(7, 20), None)
        .unwrap_err();
    assert!(matches!(err, AppError::NoScheduleResolved(_)));
}

#[test]
fn enforcing_gate_blocks_out_of_window_punches() {
    let mut cfg = setup("enforcing", "M");
    cfg.gate_mode = "enforcing".to_string();

    let mut ledger = Ledger::open(&cfg).unwrap();

    let err = ledger
        .record_punch("E001", SlotKind::Entry, monday_at(9, 0), None)
        .unwrap_err();
    assert!(matches!(err, AppError::OutsideWindow(_)));

    // within the window it goes through
    ledger
        .record_punch("E001", SlotKind::Entry, monday_at(7, 25), None)
        .expect("in-window punch");
}

#[test]
fn advisory_gate_records_and_flags_out_of_window_punches() {
    let cfg = setup("advisory", "M");
    let mut ledger = Ledger::open(&cfg).unwrap();

    let outcome = ledger
        .record_punch("E001", SlotKind::Entry, monday_at(9, 0), None)
        .expect("advisory mode records the punch");

    assert!(!outcome.gate.is_admissible());
}

#[test]
fn correction_supersedes_instead_of_overwriting() {
    let cfg = setup("correction", "M");
    let mut ledger = Ledger::open(&cfg).unwrap();
    let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();

    ledger
        .record_punch("E001", SlotKind::Exit, monday_at(16, 35), None)
        .expect("late exit recorded");

    let outcome = ledger
        .request_correction(
            "E001",
            date,
            SlotKind::Exit,
            parse_time("16:20").unwrap(),
            "left on time, forgot to punch",
            false,
            monday_at(18, 0),
        )
        .expect("correction");
    assert_eq!(outcome.remaining_after, Some(3));

    // Exactly one live exit, at the corrected time, provenance corrected
    let conn = Connection::open(&cfg.database).unwrap();
    let live = punches::load_live_for_day(&conn, "E001", date).unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].time, parse_time("16:20").unwrap());
    assert_eq!(live[0].provenance, Provenance::Corrected);

    // The original row is retired, not deleted: history is reconstructable
    let total: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM punches WHERE employee_id = 'E001'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(total, 2);

    // Derived views follow the corrected punch
    let b = ledger
        .get_daily_balance("E001", date, monday_at(18, 0))
        .unwrap();
    assert!(b.violations.is_empty());
}

#[test]
fn quota_is_lazily_created_with_the_full_cap() {
    let cfg = setup("quota_lazy", "M");
    let mut ledger = Ledger::open(&cfg).unwrap();

    let q = ledger.get_adjustment_quota("E001", "2026-03").unwrap();
    assert_eq!(q.used, 0);
    assert_eq!(q.remaining, 4);
    assert!(q.history.is_empty());
}

#[test]
fn quota_exhaustion_hits_a_hard_floor() {
    let mut cfg = setup("quota_floor", "M");
    cfg.adjustment_cap = 2;

    let mut ledger = Ledger::open(&cfg).unwrap();
    let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    let now = monday_at(18, 0);

    for (i, t) in ["16:21", "16:22"].iter().enumerate() {
        let out = ledger
            .request_correction(
                "E001",
                date,
                SlotKind::Exit,
                parse_time(t).unwrap(),
                "fix",
                false,
                now,
            )
            .expect("correction within quota");
        assert_eq!(out.remaining_after, Some(1 - i as i32));
    }

    let err = ledger
        .request_correction(
            "E001",
            date,
            SlotKind::Exit,
            parse_time("16:23").unwrap(),
            "fix",
            false,
            now,
        )
        .unwrap_err();
    assert!(matches!(err, AppError::QuotaExceeded { .. }));

    // remaining is capped at 0, used at the cap
    let q = ledger.get_adjustment_quota("E001", "2026-03").unwrap();
    assert_eq!(q.remaining, 0);
    assert_eq!(q.used, 2);
    assert_eq!(q.history.len(), 2);
}

#[test]
fn can_adjust_tracks_quota_and_admin_exemption() {
    let mut cfg = setup("can_adjust", "M");
    cfg.adjustment_cap = 1;

    let mut ledger = Ledger::open(&cfg).unwrap();
    assert!(ledger.can_adjust("E001", false).unwrap());

    ledger
        .request_correction(
            "E001",
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            SlotKind::Exit,
            parse_time("16:20").unwrap(),
            "fix",
            false,
            chrono::Local::now().naive_local(),
        )
        .expect("correction");

    assert!(!ledger.can_adjust("E001", false).unwrap());
    assert!(ledger.can_adjust("E001", true).unwrap()); // admins are exempt
}

#[test]
fn admin_corrections_bypass_quota_but_are_audited() {
    let mut cfg = setup("quota_admin", "M");
    cfg.adjustment_cap = 1;

    let mut ledger = Ledger::open(&cfg).unwrap();
    let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    let now = monday_at(18, 0);

    // exhaust the single slot
    ledger
        .request_correction(
            "E001",
            date,
            SlotKind::Exit,
            parse_time("16:21").unwrap(),
            "fix",
            false,
            now,
        )
        .expect("non-admin correction");

    // admin still goes through, remaining untouched
    let out = ledger
        .request_correction(
            "E001",
            date,
            SlotKind::Exit,
            parse_time("16:20").unwrap(),
            "supervisor fix",
            true,
            now,
        )
        .expect("admin correction");
    assert_eq!(out.remaining_after, None);

    let q = ledger.get_adjustment_quota("E001", "2026-03").unwrap();
    assert_eq!(q.remaining, 0);
    assert_eq!(q.history.len(), 2);
    assert!(q.history[1].by_admin);
    assert!(q.history[1].before.contains("16:21")); // pre-adjustment value kept
}

#[test]
fn two_clients_cannot_both_take_the_last_quota_slot() {
    let mut cfg = setup("quota_race", "M");
    cfg.adjustment_cap = 1;

    let mut first = Ledger::open(&cfg).unwrap();
    let mut second = Ledger::open(&cfg).unwrap();
    let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    let now = monday_at(18, 0);

    first
        .request_correction(
            "E001",
            date,
            SlotKind::Exit,
            parse_time("16:21").unwrap(),
            "fix",
            false,
            now,
        )
        .expect("first client wins");

    let err = second
        .request_correction(
            "E001",
            date,
            SlotKind::Entry,
            parse_time("07:20").unwrap(),
            "fix",
            false,
            now,
        )
        .unwrap_err();
    assert!(matches!(err, AppError::QuotaExceeded { .. }));
}

#[test]
fn subscribers_hear_about_punch_set_changes() {
    let cfg = setup("notify", "M");
    let mut ledger = Ledger::open(&cfg).unwrap();

    let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    ledger.subscribe(move |employee_id| sink.borrow_mut().push(employee_id.to_string()));

    ledger
        .record_punch("E001", SlotKind::Entry, monday_at(7, 20), None)
        .unwrap();
    ledger
        .request_correction(
            "E001",
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            SlotKind::Entry,
            parse_time("07:21").unwrap(),
            "fix",
            false,
            monday_at(18, 0),
        )
        .unwrap();

    assert_eq!(seen.borrow().as_slice(), ["E001", "E001"]);
}

#[test]
fn batch_insertion_fills_missing_slots_with_schedule_times() {
    let cfg = setup("batch", "M");
    let mut ledger = Ledger::open(&cfg).unwrap();
    let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();

    // non-admin has no business here
    let err = ledger
        .insert_batch_day("E001", date, false, monday_at(18, 0))
        .unwrap_err();
    assert!(matches!(err, AppError::AdminRequired(_)));

    ledger
        .record_punch("E001", SlotKind::Entry, monday_at(7, 20), None)
        .unwrap();

    let inserted = ledger
        .insert_batch_day("E001", date, true, monday_at(18, 0))
        .expect("batch insert");
    assert_eq!(inserted, 3); // entry already existed

    let conn = Connection::open(&cfg.database).unwrap();
    let live = punches::load_live_for_day(&conn, "E001", date).unwrap();
    assert_eq!(live.len(), 4);
    assert_eq!(
        live.iter()
            .filter(|p| p.provenance == Provenance::Batch)
            .count(),
        3
    );

    // a perfect day balances to zero
    let b = ledger
        .get_daily_balance("E001", date, monday_at(20, 0))
        .unwrap();
    assert_eq!(b.balance_minutes, 0);
    assert!(b.violations.is_empty());
}

#[test]
fn lunch_override_is_server_side_and_audited() {
    let cfg = setup("override", "M");
    let mut ledger = Ledger::open(&cfg).unwrap();
    let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();

    ledger
        .apply_lunch_override(
            "E001",
            pontoledger::core::schedule::LunchOverride {
                lunch_out: parse_time("11:30").unwrap(),
                lunch_return: parse_time("12:30").unwrap(),
            },
            "sector lunch shift",
            true,
            monday_at(9, 0),
        )
        .expect("override");

    // punches at the overridden lunch times classify clean
    for (slot, h, m) in [
        (SlotKind::Entry, 7, 20),
        (SlotKind::LunchOut, 11, 30),
        (SlotKind::LunchReturn, 12, 30),
        (SlotKind::Exit, 16, 20),
    ] {
        ledger
            .record_punch("E001", slot, monday_at(h, m), None)
            .expect("punch at effective schedule time");
    }

    let b = ledger
        .get_daily_balance("E001", date, monday_at(20, 0))
        .unwrap();
    assert!(b.violations.is_empty());
    assert_eq!(b.balance_minutes, 0);

    // override is part of the audit trail
    let q = ledger.get_adjustment_quota("E001", "2026-03").unwrap();
    assert_eq!(q.history.len(), 1);
    assert_eq!(q.history[0].kind, AdjustmentKind::ScheduleOverride);
    assert_eq!(q.remaining, 4); // no quota consumed
}
