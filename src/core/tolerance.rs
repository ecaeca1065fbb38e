//! Tolerance classification and the punch admission gate.
//!
//! Both functions are pure: the classifier labels a punch against its
//! expected time, the gate decides whether a punch attempt is admissible
//! right now. Neither touches the store.

use crate::errors::{AppError, AppResult};
use chrono::{NaiveDateTime, NaiveTime};

/// Default tolerance window in minutes (±). Overridable via config.
pub const TOLERANCE_MINUTES: i64 = 10;

/// How a punch deviates from its expected time. Minutes are always the
/// absolute deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deviation {
    OnTime,
    /// Early within tolerance; reduces required time for the day.
    Credit(i64),
    /// Late within tolerance; increases required time, no violation.
    Debit(i64),
    /// Early beyond tolerance. Advisory only, never a violation.
    EarlyOutOfWindow(i64),
    /// Late beyond tolerance; recorded as a Violation.
    Violation(i64),
}

impl Deviation {
    pub fn is_violation(&self) -> bool {
        matches!(self, Deviation::Violation(_))
    }

    /// Short user-facing label for the punch feedback line.
    pub fn message(&self) -> String {
        match self {
            Deviation::OnTime => "right on time".to_string(),
            Deviation::Credit(m) => format!("{} min early, credited", m),
            Deviation::Debit(m) => format!("{} min late, within tolerance", m),
            Deviation::EarlyOutOfWindow(m) => format!("{} min before the window opens", m),
            Deviation::Violation(m) => format!("{} min late, violation recorded", m),
        }
    }
}

/// Label a punch instant against its expected time. Total: any input gets a
/// classification, nothing is rejected here.
pub fn classify(expected: NaiveDateTime, actual: NaiveDateTime, tolerance: i64) -> Deviation {
    let delta = (actual - expected).num_minutes();

    if delta == 0 {
        Deviation::OnTime
    } else if delta < -tolerance {
        Deviation::EarlyOutOfWindow(-delta)
    } else if delta < 0 {
        Deviation::Credit(-delta)
    } else if delta <= tolerance {
        Deviation::Debit(delta)
    } else {
        Deviation::Violation(delta)
    }
}

/// Whether a punch attempt may be accepted right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Admissible,
    /// Too early: the window opens at `opens`.
    BeforeWindow { opens: NaiveTime },
    /// Too late: the window closed at `closed`.
    AfterWindow { closed: NaiveTime },
    /// No schedule resolved for this day; always inadmissible.
    NoSchedule,
}

impl GateDecision {
    pub fn is_admissible(&self) -> bool {
        matches!(self, GateDecision::Admissible)
    }

    pub fn describe(&self) -> String {
        match self {
            GateDecision::Admissible => "within the punch window".to_string(),
            GateDecision::BeforeWindow { opens } => {
                format!("wait until {} to punch", opens.format("%H:%M"))
            }
            GateDecision::AfterWindow { closed } => {
                format!("punch window closed at {}", closed.format("%H:%M"))
            }
            GateDecision::NoSchedule => "no schedule for this day".to_string(),
        }
    }
}

/// Admissible iff `now` falls within `[expected - tolerance, expected +
/// tolerance]`.
pub fn assess(expected: Option<NaiveDateTime>, now: NaiveDateTime, tolerance: i64) -> GateDecision {
    let Some(expected) = expected else {
        return GateDecision::NoSchedule;
    };

    let opens = expected - chrono::Duration::minutes(tolerance);
    let closes = expected + chrono::Duration::minutes(tolerance);

    if now < opens {
        GateDecision::BeforeWindow { opens: opens.time() }
    } else if now > closes {
        GateDecision::AfterWindow { closed: closes.time() }
    } else {
        GateDecision::Admissible
    }
}

/// Deployment policy for out-of-window punches. Advisory records the punch
/// and surfaces a warning; enforcing rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateMode {
    Advisory,
    Enforcing,
}

impl GateMode {
    pub fn from_config_str(s: &str) -> AppResult<Self> {
        match s {
            "advisory" => Ok(GateMode::Advisory),
            "enforcing" => Ok(GateMode::Enforcing),
            other => Err(AppError::Config(format!(
                "gate_mode must be 'advisory' or 'enforcing', got '{}'",
                other
            ))),
        }
    }
}
