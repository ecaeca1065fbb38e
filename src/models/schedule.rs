use chrono::NaiveTime;
use serde::Serialize;

/// Expected punch times for one day-type (weekday or weekend).
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct DayTimes {
    pub entry: NaiveTime,
    pub lunch_out: NaiveTime,
    pub lunch_return: NaiveTime,
    pub exit: NaiveTime,
}

impl DayTimes {
    fn from_hm(entry: (u32, u32), lunch_out: (u32, u32), lunch_return: (u32, u32), exit: (u32, u32)) -> Self {
        let t = |(h, m)| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        Self {
            entry: t(entry),
            lunch_out: t(lunch_out),
            lunch_return: t(lunch_return),
            exit: t(exit),
        }
    }

    /// Expected working minutes: morning block + afternoon block.
    pub fn expected_minutes(&self) -> i64 {
        (self.lunch_out - self.entry).num_minutes() + (self.exit - self.lunch_return).num_minutes()
    }

    pub fn time_for(&self, slot: crate::models::slot::SlotKind) -> NaiveTime {
        use crate::models::slot::SlotKind;
        match slot {
            SlotKind::Entry => self.entry,
            SlotKind::LunchOut => self.lunch_out,
            SlotKind::LunchReturn => self.lunch_return,
            SlotKind::Exit => self.exit,
        }
    }
}

/// A schedule code and its expected times. Reference data maintained by
/// administrators; the ledger only reads it.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleDefinition {
    pub code: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub weekday: Option<DayTimes>,
    pub weekend: Option<DayTimes>,
}

/// Codes that mean "no work expected today", whatever the day-type.
pub const NON_WORKING_CODES: [&str; 4] = ["FOLGA", "FERIAS", "ATESTADO", "FOLGA_EXTRA"];

pub fn is_working_code(code: &str) -> bool {
    !code.is_empty() && !NON_WORKING_CODES.contains(&code)
}

/// Look up a schedule code in the built-in table.
/// Unknown codes return None; callers must treat that as "non-working",
/// not as an error.
pub fn builtin(code: &str) -> Option<ScheduleDefinition> {
    match code {
        "M" => Some(ScheduleDefinition {
            code: "M",
            label: "M - 6x1",
            description: "6x1 Mon-Fri 07:20-16:20, Sat/Sun 07:20-13:20",
            weekday: Some(DayTimes::from_hm((7, 20), (12, 0), (13, 0), (16, 20))),
            weekend: Some(DayTimes::from_hm((7, 20), (10, 20), (11, 20), (13, 20))),
        }),
        "M1" => Some(ScheduleDefinition {
            code: "M1",
            label: "M1 - 6x1",
            description: "6x1 07:00-15:20, lunch 12:00-13:00",
            weekday: Some(DayTimes::from_hm((7, 0), (12, 0), (13, 0), (15, 20))),
            weekend: Some(DayTimes::from_hm((7, 0), (10, 0), (11, 0), (13, 0))),
        }),
        "M4" => Some(ScheduleDefinition {
            code: "M4",
            label: "M4 - 5x2",
            description: "5x2 Mon-Fri 06:00-15:40, lunch 10:30-11:30",
            weekday: Some(DayTimes::from_hm((6, 0), (10, 30), (11, 30), (15, 40))),
            weekend: None, // no weekend work
        }),
        "FOLGA" => Some(non_working("FOLGA", "FOLGA", "Day off")),
        "FERIAS" => Some(non_working("FERIAS", "FÉRIAS", "Vacation period")),
        "ATESTADO" => Some(non_working("ATESTADO", "ATESTADO", "Medical leave")),
        "FOLGA_EXTRA" => Some(non_working("FOLGA_EXTRA", "FOLGA EXTRA", "Extra day off granted")),
        _ => None,
    }
}

fn non_working(code: &'static str, label: &'static str, description: &'static str) -> ScheduleDefinition {
    ScheduleDefinition {
        code,
        label,
        description,
        weekday: None,
        weekend: None,
    }
}

/// All codes the built-in table knows, for listings.
pub fn known_codes() -> Vec<&'static str> {
    vec!["M", "M1", "M4", "FOLGA", "FERIAS", "ATESTADO", "FOLGA_EXTRA"]
}
