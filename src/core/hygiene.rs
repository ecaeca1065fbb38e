//! Read-side hygiene for punch listings and aggregation.
//!
//! Some legacy records carry a known-bad default time-of-day written by a
//! data-entry defect upstream; they are excluded from views, never deleted.
//! The filter must not touch the adjustment history: that audit trail is
//! authoritative and complete by contract.

use crate::models::punch::PunchEvent;
use chrono::{Duration, NaiveDate, NaiveTime};

pub const DEFAULT_RETENTION_DAYS: i64 = 30;

#[derive(Debug, Clone)]
pub struct HygieneConfig {
    /// Times-of-day that mark a record as a known data-entry defect.
    pub sentinel_times: Vec<NaiveTime>,
    /// Horizon for rolling "recent history" views, in days.
    pub retention_days: i64,
}

impl Default for HygieneConfig {
    fn default() -> Self {
        Self {
            sentinel_times: vec![
                NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(10, 10, 0).unwrap(),
            ],
            retention_days: DEFAULT_RETENTION_DAYS,
        }
    }
}

/// Why a record was excluded; goes to the internal log, never to the user.
pub fn suspect_reason(punch: &PunchEvent, cfg: &HygieneConfig) -> Option<String> {
    if cfg.sentinel_times.contains(&punch.time) {
        return Some(format!(
            "sentinel time-of-day {} (known data-entry defect)",
            punch.time.format("%H:%M")
        ));
    }
    None
}

/// Drop sentinel-time records. Used by every aggregation path; applying it
/// twice yields the same set as applying it once.
pub fn strip_sentinels(punches: Vec<PunchEvent>, cfg: &HygieneConfig) -> Vec<PunchEvent> {
    punches
        .into_iter()
        .filter(|p| suspect_reason(p, cfg).is_none())
        .collect()
}

/// Rolling-view filter: sentinel exclusion plus the retention horizon.
/// Only for read-side listings; monthly aggregation keeps the full month
/// regardless of the horizon.
pub fn filter_recent(
    punches: Vec<PunchEvent>,
    cfg: &HygieneConfig,
    today: NaiveDate,
) -> Vec<PunchEvent> {
    let oldest = today - Duration::days(cfg.retention_days);
    strip_sentinels(punches, cfg)
        .into_iter()
        .filter(|p| p.date >= oldest)
        .collect()
}
