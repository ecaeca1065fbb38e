//! HistoryHygieneFilter: sentinel exclusion, retention horizon, idempotence.

use chrono::{Duration, NaiveDate};
use pontoledger::core::hygiene::{filter_recent, strip_sentinels, HygieneConfig};
use pontoledger::models::punch::{Provenance, PunchEvent};
use pontoledger::models::slot::SlotKind;
use pontoledger::utils::time::parse_time;

fn punch(date: NaiveDate, time: &str) -> PunchEvent {
    PunchEvent::new(
        "E001",
        date,
        parse_time(time).unwrap(),
        SlotKind::Entry,
        Provenance::Normal,
        None,
    )
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 20).unwrap()
}

#[test]
fn sentinel_times_are_excluded() {
    let cfg = HygieneConfig::default();
    let d = today();

    let kept = strip_sentinels(
        vec![punch(d, "00:00"), punch(d, "10:10"), punch(d, "08:00")],
        &cfg,
    );

    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].time, parse_time("08:00").unwrap());
}

#[test]
fn sentinel_list_is_configurable() {
    let cfg = HygieneConfig {
        sentinel_times: vec![parse_time("12:34").unwrap()],
        retention_days: 30,
    };
    let d = today();

    let kept = strip_sentinels(vec![punch(d, "12:34"), punch(d, "00:00")], &cfg);

    // 00:00 survives: only the configured list counts
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].time, parse_time("00:00").unwrap());
}

#[test]
fn retention_horizon_cuts_old_records_from_rolling_views() {
    let cfg = HygieneConfig::default();

    let fresh = punch(today() - Duration::days(29), "08:00");
    let edge = punch(today() - Duration::days(30), "08:00");
    let stale = punch(today() - Duration::days(31), "08:00");

    let kept = filter_recent(vec![fresh, edge, stale], &cfg, today());

    assert_eq!(kept.len(), 2); // 29 and 30 days old stay, 31 goes
}

#[test]
fn strip_sentinels_ignores_record_age() {
    let cfg = HygieneConfig::default();
    let old = punch(today() - Duration::days(365), "08:00");

    let kept = strip_sentinels(vec![old], &cfg);
    assert_eq!(kept.len(), 1);
}

/// Applying the filter twice yields the same result as applying it once.
#[test]
fn filter_is_idempotent() {
    let cfg = HygieneConfig::default();
    let records = vec![
        punch(today(), "00:00"),
        punch(today(), "10:10"),
        punch(today(), "07:20"),
        punch(today() - Duration::days(45), "07:20"),
        punch(today() - Duration::days(10), "16:20"),
    ];

    let once = filter_recent(records.clone(), &cfg, today());
    let twice = filter_recent(once.clone(), &cfg, today());

    assert_eq!(once.len(), twice.len());
    for (a, b) in once.iter().zip(twice.iter()) {
        assert_eq!(a.date, b.date);
        assert_eq!(a.time, b.time);
    }
}
