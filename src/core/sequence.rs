//! Per (employee, day) slot presence. The four slots track presence, not
//! strict order: the store's uniqueness constraint is the final authority on
//! duplicates, this is the synchronous pre-check plus status reporting.
//! A new calendar day always starts from an empty state.

use crate::errors::{AppError, AppResult};
use crate::models::punch::PunchEvent;
use crate::models::slot::SlotKind;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    Pending,
    WorkingMorning,
    LunchBreak,
    WorkingAfternoon,
    Complete,
}

impl DayStatus {
    pub fn text(&self) -> &'static str {
        match self {
            DayStatus::Pending => "No punches yet, record your entry",
            DayStatus::WorkingMorning => "Working (morning)",
            DayStatus::LunchBreak => "Lunch break",
            DayStatus::WorkingAfternoon => "Working (afternoon)",
            DayStatus::Complete => "Workday complete",
        }
    }
}

/// Which of the day's four slots have a live punch.
#[derive(Debug, Clone, Default)]
pub struct DaySlots {
    recorded: [bool; 4],
}

impl DaySlots {
    pub fn from_punches(punches: &[PunchEvent]) -> Self {
        let mut s = Self::default();
        for p in punches {
            if !p.superseded {
                s.recorded[p.slot.index()] = true;
            }
        }
        s
    }

    pub fn has(&self, slot: SlotKind) -> bool {
        self.recorded[slot.index()]
    }

    pub fn count(&self) -> usize {
        self.recorded.iter().filter(|r| **r).count()
    }

    /// Reject a second punch for an already-recorded slot. The existing
    /// record stands; the caller gets DuplicatePunch.
    pub fn try_record(&mut self, slot: SlotKind, date: NaiveDate) -> AppResult<()> {
        if self.has(slot) {
            return Err(AppError::DuplicatePunch {
                slot: slot.to_db_str().to_string(),
                date: date.format("%Y-%m-%d").to_string(),
            });
        }
        self.recorded[slot.index()] = true;
        Ok(())
    }

    /// First unrecorded slot in canonical order, None when the day is done.
    pub fn next_expected(&self) -> Option<SlotKind> {
        SlotKind::ALL.into_iter().find(|s| !self.has(*s))
    }

    pub fn status(&self) -> DayStatus {
        match self.next_expected() {
            Some(SlotKind::Entry) => DayStatus::Pending,
            Some(SlotKind::LunchOut) => DayStatus::WorkingMorning,
            Some(SlotKind::LunchReturn) => DayStatus::LunchBreak,
            Some(SlotKind::Exit) => DayStatus::WorkingAfternoon,
            None => DayStatus::Complete,
        }
    }
}
