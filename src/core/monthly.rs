//! Monthly aggregation: daily balances → totals, violation/absence counts
//! and attendance-bonus eligibility.

use crate::models::balance::DailyBalance;
use crate::models::schedule::DayTimes;
use crate::models::summary::MonthlySummary;
use chrono::NaiveDate;

/// One day's aggregation input, assembled by the ledger from the
/// authoritative punch set.
#[derive(Debug, Clone)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub schedule: Option<DayTimes>,
    /// False for FOLGA/FERIAS/ATESTADO/FOLGA_EXTRA days: a missing day is
    /// then approved leave, never an absence.
    pub working_code: bool,
    pub punch_count: usize,
    pub has_exit: bool,
    pub balance: DailyBalance,
}

/// Default attendance bonus, in monetary units. Overridable via config.
pub const ATTENDANCE_BONUS: i64 = 100;

/// Aggregate one calendar month. `as_of` bounds absence counting: only days
/// strictly before it can be absences (a scheduled day later this month is
/// not missed yet).
///
/// Bonus policy is all-or-nothing: a single violation or unexplained
/// absence anywhere in the month zeroes it.
pub fn aggregate(
    month_key: &str,
    days: &[DayRecord],
    as_of: NaiveDate,
    bonus_amount: i64,
) -> MonthlySummary {
    let mut days_worked = 0u32;
    let mut worked_minutes = 0i64;
    let mut credit_minutes = 0i64;
    let mut debit_minutes = 0i64;
    let mut violation_count = 0usize;
    let mut absence_count = 0u32;

    for day in days {
        worked_minutes += day.balance.worked_minutes;
        violation_count += day.balance.violations.len();

        if day.has_exit {
            days_worked += 1;
            if day.balance.balance_minutes > 0 {
                credit_minutes += day.balance.balance_minutes;
            } else {
                debit_minutes += -day.balance.balance_minutes;
            }
        }

        let expected_work = day.working_code && day.schedule.is_some();
        if expected_work && day.punch_count == 0 && day.date < as_of {
            absence_count += 1;
        }
    }

    let bonus_eligible = violation_count == 0 && absence_count == 0;

    MonthlySummary {
        month: month_key.to_string(),
        days_worked,
        worked_minutes,
        credit_minutes,
        debit_minutes,
        violation_count,
        absence_count,
        bonus_eligible,
        bonus_amount: if bonus_eligible { bonus_amount } else { 0 },
    }
}
