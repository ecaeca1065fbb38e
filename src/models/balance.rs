use super::slot::SlotKind;
use chrono::NaiveDate;
use serde::Serialize;

/// An out-of-tolerance late punch. Only produced for late deviations beyond
/// the tolerance window; early-out-of-window punches are advisory only.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub slot: SlotKind,
    pub minutes_late: i64,
    pub reason: String,
}

impl Violation {
    pub fn new(slot: SlotKind, minutes_late: i64) -> Self {
        Self {
            slot,
            minutes_late,
            reason: format!("{} {} min late", slot.label(), minutes_late),
        }
    }
}

/// Derived day totals. Never stored: recomputed from the day's punches and
/// schedule whenever either changes.
#[derive(Debug, Clone, Serialize)]
pub struct DailyBalance {
    pub date: NaiveDate,
    pub morning_minutes: i64,
    pub afternoon_minutes: i64,
    pub worked_minutes: i64,
    pub expected_minutes: i64,
    /// worked - expected; positive = surplus, negative = deficit.
    pub balance_minutes: i64,
    pub violations: Vec<Violation>,
    /// True while the current day has an entry but no exit yet; worked time
    /// is then elapsed-to-now and keeps growing.
    pub open_day: bool,
}
