use serde::Serialize;

/// What kind of manual intervention an adjustment record documents.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum AdjustmentKind {
    PunchCorrection,
    BatchInsertion,
    ScheduleOverride,
}

impl AdjustmentKind {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AdjustmentKind::PunchCorrection => "punch_correction",
            AdjustmentKind::BatchInsertion => "batch_insertion",
            AdjustmentKind::ScheduleOverride => "schedule_override",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "punch_correction" => Some(AdjustmentKind::PunchCorrection),
            "batch_insertion" => Some(AdjustmentKind::BatchInsertion),
            "schedule_override" => Some(AdjustmentKind::ScheduleOverride),
            _ => None,
        }
    }
}

/// One entry of the append-only correction history. `before` keeps the
/// pre-adjustment value so any punch can be reconstructed as it looked
/// before the edit.
#[derive(Debug, Clone, Serialize)]
pub struct AdjustmentRecord {
    pub kind: AdjustmentKind,
    pub before: String,
    pub after: String,
    pub timestamp: String,
    pub reason: String,
    pub by_admin: bool,
}

/// Per employee-per-month correction allowance. Created lazily on first
/// query, never deleted. Administrators bypass the cap but their actions
/// still land in `history`.
#[derive(Debug, Clone, Serialize)]
pub struct AdjustmentQuota {
    pub employee_id: String,
    pub month: String, // YYYY-MM
    pub used: i32,
    pub remaining: i32,
    pub history: Vec<AdjustmentRecord>,
    pub created_at: String,
}
