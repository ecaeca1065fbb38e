//! Schedule resolution: (code, date) → expected punch times, or None for a
//! non-working day. Pure; unknown codes are "non-working", never an error.

use crate::models::schedule::{self, DayTimes};
use crate::utils::date::is_weekend;
use chrono::{NaiveDate, NaiveTime};

/// Per-employee lunch override, merged over the base schedule so every
/// client sees the same effective times.
#[derive(Debug, Clone, Copy)]
pub struct LunchOverride {
    pub lunch_out: NaiveTime,
    pub lunch_return: NaiveTime,
}

/// Resolve a schedule code for a date against the built-in table.
/// Saturday/Sunday select the weekend block; a schedule without a weekend
/// block resolves weekends to None.
pub fn resolve(code: &str, date: NaiveDate) -> Option<DayTimes> {
    let def = schedule::builtin(code)?;

    if is_weekend(date) {
        def.weekend
    } else {
        def.weekday
    }
}

/// Resolve the effective schedule: base times with the employee's lunch
/// override applied, when one exists.
pub fn resolve_effective(
    code: &str,
    date: NaiveDate,
    lunch: Option<&LunchOverride>,
) -> Option<DayTimes> {
    let base = resolve(code, date)?;

    match lunch {
        Some(ov) => Some(DayTimes {
            entry: base.entry,
            lunch_out: ov.lunch_out,
            lunch_return: ov.lunch_return,
            exit: base.exit,
        }),
        None => Some(base),
    }
}

pub use crate::models::schedule::is_working_code;
