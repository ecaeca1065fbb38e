use super::slot::SlotKind;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// How a punch entered the ledger.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Provenance {
    Normal,
    Corrected,
    Batch,
}

impl Provenance {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Provenance::Normal => "normal",
            Provenance::Corrected => "corrected",
            Provenance::Batch => "batch",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(Provenance::Normal),
            "corrected" => Some(Provenance::Corrected),
            "batch" => Some(Provenance::Batch),
            _ => None,
        }
    }
}

/// One recorded clock action. Rows are never updated in place: a correction
/// marks the old row superseded and inserts a new one, so the pre-correction
/// history stays reconstructable.
#[derive(Debug, Clone, Serialize)]
pub struct PunchEvent {
    pub id: i64,
    pub employee_id: String,
    pub date: NaiveDate,     // ⇔ punches.date (TEXT "YYYY-MM-DD")
    pub time: NaiveTime,     // ⇔ punches.time (TEXT "HH:MM")
    pub slot: SlotKind,      // ⇔ punches.slot
    pub provenance: Provenance,
    pub note: String,        // ⇔ punches.note (TEXT, default '')
    pub superseded: bool,    // ⇔ punches.superseded (INT, default 0)
    pub created_at: String,  // ⇔ punches.created_at (TEXT, ISO8601)
}

impl PunchEvent {
    /// Constructor for punches created by the live punch action.
    /// - `id = 0` (assigned by the database)
    /// - `created_at = now() in ISO8601`
    pub fn new(
        employee_id: &str,
        date: NaiveDate,
        time: NaiveTime,
        slot: SlotKind,
        provenance: Provenance,
        note: Option<String>,
    ) -> Self {
        Self {
            id: 0,
            employee_id: employee_id.to_string(),
            date,
            time,
            slot,
            provenance,
            note: note.unwrap_or_default(),
            superseded: false,
            created_at: Local::now().to_rfc3339(),
        }
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn time_str(&self) -> String {
        self.time.format("%H:%M").to_string()
    }

    /// The punch instant as a naive local timestamp.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}
