//! Daily balance: one day's punches + the expected schedule → worked
//! minutes, expected minutes, signed balance and violations.
//!
//! Canonical sign convention: balance = worked - expected, both derived
//! from the actual punch instants. Per-slot classification feeds the
//! violation list only; it is never accumulated into the balance a second
//! time.

use crate::core::tolerance::{self, Deviation};
use crate::models::balance::{DailyBalance, Violation};
use crate::models::punch::PunchEvent;
use crate::models::schedule::DayTimes;
use crate::models::slot::SlotKind;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Recompute a day from scratch. `now` only matters while the day is still
/// open (entry recorded, exit missing, same calendar day): worked time is
/// then elapsed-to-now.
///
/// With no schedule, expected is 0 and worked time is taken opportunistically
/// from whatever punches exist (work on a nominal day off); no violations
/// are produced.
pub fn compute(
    date: NaiveDate,
    punches: &[PunchEvent],
    schedule: Option<&DayTimes>,
    now: NaiveDateTime,
    tolerance_minutes: i64,
) -> DailyBalance {
    let entry = slot_time(punches, SlotKind::Entry);
    let lunch_out = slot_time(punches, SlotKind::LunchOut);
    let lunch_return = slot_time(punches, SlotKind::LunchReturn);
    let exit = slot_time(punches, SlotKind::Exit);

    let mut violations = Vec::new();

    if let Some(sched) = schedule {
        for (slot, actual, expected) in [
            (SlotKind::Entry, entry, sched.entry),
            (SlotKind::LunchOut, lunch_out, sched.lunch_out),
            (SlotKind::LunchReturn, lunch_return, sched.lunch_return),
            (SlotKind::Exit, exit, sched.exit),
        ] {
            if let Some(actual) = actual {
                let dev = tolerance::classify(
                    date.and_time(expected),
                    date.and_time(actual),
                    tolerance_minutes,
                );
                if let Deviation::Violation(minutes) = dev {
                    violations.push(Violation::new(slot, minutes));
                }
            }
        }
    }

    let (morning, afternoon, open_day) =
        worked_segments(date, entry, lunch_out, lunch_return, exit, now);

    let worked = morning + afternoon;
    let expected = schedule.map(DayTimes::expected_minutes).unwrap_or(0);

    DailyBalance {
        date,
        morning_minutes: morning,
        afternoon_minutes: afternoon,
        worked_minutes: worked,
        expected_minutes: expected,
        balance_minutes: worked - expected,
        violations,
        open_day,
    }
}

/// Split worked time into morning/afternoon segments.
///
/// Complete day: (lunch_out - entry) + (exit - lunch_return). If the lunch
/// pair is absent or incomplete, the whole span exit - entry counts as the
/// morning segment (no lunch deduction is computable from half a pair).
/// Open day (today, no exit yet): elapsed from entry (or from lunch return)
/// up to `now`. A past day without an exit yields only the closed morning
/// segment; stale elapsed time is never invented for it.
fn worked_segments(
    date: NaiveDate,
    entry: Option<NaiveTime>,
    lunch_out: Option<NaiveTime>,
    lunch_return: Option<NaiveTime>,
    exit: Option<NaiveTime>,
    now: NaiveDateTime,
) -> (i64, i64, bool) {
    let Some(entry) = entry else {
        return (0, 0, false);
    };

    let mins = |start: NaiveTime, end: NaiveTime| (end - start).num_minutes().max(0);

    if let Some(exit) = exit {
        return match (lunch_out, lunch_return) {
            (Some(lo), Some(lr)) => (mins(entry, lo), mins(lr, exit), false),
            _ => (mins(entry, exit), 0, false),
        };
    }

    // No exit yet.
    if now.date() == date {
        let now_t = now.time();
        let (morning, afternoon) = match (lunch_out, lunch_return) {
            (Some(lo), Some(lr)) => (mins(entry, lo), mins(lr, now_t)),
            (Some(lo), None) => (mins(entry, lo), 0),
            (None, Some(lr)) => (0, mins(lr, now_t)),
            (None, None) => (mins(entry, now_t), 0),
        };
        return (morning, afternoon, true);
    }

    // Past day left open: only the closed morning block counts.
    let morning = lunch_out.map(|lo| mins(entry, lo)).unwrap_or(0);
    (morning, 0, false)
}

fn slot_time(punches: &[PunchEvent], slot: SlotKind) -> Option<NaiveTime> {
    punches
        .iter()
        .find(|p| !p.superseded && p.slot == slot)
        .map(|p| p.time)
}
