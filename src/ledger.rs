//! The ledger facade: everything external collaborators are allowed to do
//! with the punch history goes through here.
//!
//! Derived views (daily balance, monthly summary) are recomputed from the
//! authoritative punch set on every read, never patched incrementally.
//! Writes are transactional per event/record, so a timed-out operation can
//! simply be retried whole.

use crate::config::Config;
use crate::core::daily;
use crate::core::hygiene::{self, HygieneConfig};
use crate::core::monthly::{self, DayRecord};
use crate::core::schedule::{self, LunchOverride};
use crate::core::sequence::{DaySlots, DayStatus};
use crate::core::tolerance::{self, Deviation, GateDecision, GateMode};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::{punches, quota, staff};
use crate::errors::{AppError, AppResult};
use crate::models::balance::DailyBalance;
use crate::models::employee::Employee;
use crate::models::punch::{Provenance, PunchEvent};
use crate::models::quota::{AdjustmentKind, AdjustmentQuota, AdjustmentRecord};
use crate::models::slot::SlotKind;
use crate::models::summary::MonthlySummary;
use crate::utils::date::{all_days_of_month, month_key, today};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::HashMap;

/// Callback fired after every successful write for an employee. UI layers
/// use it to trigger recomputation of whatever they display.
pub type PunchSetListener = Box<dyn Fn(&str)>;

pub struct Ledger<'a> {
    pub pool: DbPool,
    cfg: &'a Config,
    gate_mode: GateMode,
    hygiene: HygieneConfig,
    listeners: Vec<PunchSetListener>,
}

/// What a successful live punch tells the caller.
#[derive(Debug)]
pub struct RecordOutcome {
    pub event: PunchEvent,
    pub gate: GateDecision,
    pub deviation: Option<Deviation>,
    pub status: DayStatus,
}

#[derive(Debug)]
pub struct CorrectionOutcome {
    pub event: Option<PunchEvent>,
    pub remaining_after: Option<i32>, // None for admin actors
}

impl<'a> Ledger<'a> {
    pub fn open(cfg: &'a Config) -> AppResult<Self> {
        let pool = DbPool::new(&cfg.database)?;
        Ok(Self {
            pool,
            cfg,
            gate_mode: cfg.gate()?,
            hygiene: cfg.hygiene(),
            listeners: Vec::new(),
        })
    }

    /// Register a punch-set-changed observer.
    pub fn subscribe(&mut self, listener: impl Fn(&str) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&self, employee_id: &str) {
        for l in &self.listeners {
            l(employee_id);
        }
    }

    fn employee(&self, id: &str) -> AppResult<Employee> {
        staff::get_employee(&self.pool.conn, id)?
            .ok_or_else(|| AppError::UnknownEmployee(id.to_string()))
    }

    fn effective_schedule(
        &self,
        emp: &Employee,
        date: NaiveDate,
    ) -> AppResult<Option<crate::models::schedule::DayTimes>> {
        let ov = staff::get_lunch_override(&self.pool.conn, &emp.id)?;
        Ok(schedule::resolve_effective(
            &emp.schedule_code,
            date,
            ov.as_ref(),
        ))
    }

    // ------------------------------------------------
    // Live punches
    // ------------------------------------------------

    /// Record a live punch at `now`. The gate runs first (advisory mode
    /// records out-of-window punches, the caller gets the decision back to
    /// surface a warning); the slot presence check and the store's
    /// uniqueness constraint both reject duplicates.
    pub fn record_punch(
        &mut self,
        employee_id: &str,
        slot: SlotKind,
        now: NaiveDateTime,
        note: Option<String>,
    ) -> AppResult<RecordOutcome> {
        let emp = self.employee(employee_id)?;
        let date = now.date();

        let sched = self.effective_schedule(&emp, date)?;
        let expected = sched.map(|s| date.and_time(s.time_for(slot)));

        let gate = tolerance::assess(expected, now, self.cfg.tolerance_minutes);

        if gate == GateDecision::NoSchedule {
            return Err(AppError::NoScheduleResolved(format!(
                "{} on {}",
                employee_id, date
            )));
        }
        if !gate.is_admissible() && self.gate_mode == GateMode::Enforcing {
            return Err(AppError::OutsideWindow(gate.describe()));
        }

        let day = punches::load_live_for_day(&self.pool.conn, employee_id, date)?;
        let mut slots = DaySlots::from_punches(&day);
        slots.try_record(slot, date)?;

        let deviation =
            expected.map(|e| tolerance::classify(e, now, self.cfg.tolerance_minutes));

        let mut ev = PunchEvent::new(
            employee_id,
            date,
            now.time(),
            slot,
            Provenance::Normal,
            note,
        );
        ev.id = punches::insert_punch(&self.pool.conn, &ev)?;

        ttlog(
            &self.pool.conn,
            "punch",
            &format!("{} {} {}", employee_id, ev.date_str(), slot.to_db_str()),
            &format!("Recorded at {}", ev.time_str()),
        )?;
        self.notify(employee_id);

        Ok(RecordOutcome {
            event: ev,
            gate,
            deviation,
            status: slots.status(),
        })
    }

    // ------------------------------------------------
    // Derived views
    // ------------------------------------------------

    pub fn get_daily_balance(
        &mut self,
        employee_id: &str,
        date: NaiveDate,
        now: NaiveDateTime,
    ) -> AppResult<DailyBalance> {
        let emp = self.employee(employee_id)?;
        let sched = self.effective_schedule(&emp, date)?;

        let day = punches::load_live_for_day(&self.pool.conn, employee_id, date)?;
        let day = hygiene::strip_sentinels(day, &self.hygiene);

        Ok(daily::compute(
            date,
            &day,
            sched.as_ref(),
            now,
            self.cfg.tolerance_minutes,
        ))
    }

    pub fn get_monthly_summary(
        &mut self,
        employee_id: &str,
        year: i32,
        month: u32,
        now: NaiveDateTime,
    ) -> AppResult<MonthlySummary> {
        let emp = self.employee(employee_id)?;
        let days = all_days_of_month(year, month);
        let first = *days.first().unwrap();
        let last = *days.last().unwrap();

        let month_punches =
            punches::load_live_for_range(&self.pool.conn, employee_id, first, last)?;
        let month_punches = hygiene::strip_sentinels(month_punches, &self.hygiene);

        let mut by_date: HashMap<NaiveDate, Vec<PunchEvent>> = HashMap::new();
        for p in month_punches {
            by_date.entry(p.date).or_default().push(p);
        }

        let working_code = schedule::is_working_code(&emp.schedule_code);
        let mut records = Vec::with_capacity(days.len());

        for date in days {
            let sched = self.effective_schedule(&emp, date)?;
            let day = by_date.remove(&date).unwrap_or_default();

            let balance = daily::compute(
                date,
                &day,
                sched.as_ref(),
                now,
                self.cfg.tolerance_minutes,
            );

            records.push(DayRecord {
                date,
                schedule: sched,
                working_code,
                punch_count: day.len(),
                has_exit: day.iter().any(|p| p.slot == SlotKind::Exit),
                balance,
            });
        }

        let key = format!("{:04}-{:02}", year, month);
        Ok(monthly::aggregate(
            &key,
            &records,
            now.date(),
            self.cfg.attendance_bonus,
        ))
    }

    /// Hygiene-filtered rolling history for listings (retention horizon
    /// applies). The adjustment history is never filtered this way.
    pub fn recent_history(&mut self, employee_id: &str) -> AppResult<Vec<PunchEvent>> {
        self.employee(employee_id)?;
        let all = punches::load_history(&self.pool.conn, employee_id)?;
        Ok(hygiene::filter_recent(all, &self.hygiene, today()))
    }

    /// Hygiene-filtered punches of explicit dates (sentinels stripped, no
    /// retention cut: the caller picked the dates).
    pub fn history_for_dates(
        &mut self,
        employee_id: &str,
        dates: &[NaiveDate],
    ) -> AppResult<Vec<PunchEvent>> {
        self.employee(employee_id)?;
        let mut out = Vec::new();
        for d in dates {
            let day = punches::load_live_for_day(&self.pool.conn, employee_id, *d)?;
            out.extend(hygiene::strip_sentinels(day, &self.hygiene));
        }
        Ok(out)
    }

    // ------------------------------------------------
    // Corrections
    // ------------------------------------------------

    /// Whether a correction would be accepted right now: administrators
    /// always, everyone else while the current month still has quota.
    pub fn can_adjust(&mut self, employee_id: &str, actor_is_admin: bool) -> AppResult<bool> {
        if actor_is_admin {
            return Ok(true);
        }
        let month = month_key(today());
        let q = self.get_adjustment_quota(employee_id, &month)?;
        Ok(q.remaining > 0)
    }

    /// Correct (or insert) one historical punch. Consumes one adjustment
    /// slot of the actor's current month unless the actor is an
    /// administrator; either way the action lands in the audit history.
    /// The superseded row, the replacement and the quota movement commit in
    /// a single transaction.
    pub fn request_correction(
        &mut self,
        employee_id: &str,
        date: NaiveDate,
        slot: SlotKind,
        new_time: NaiveTime,
        reason: &str,
        actor_is_admin: bool,
        now: NaiveDateTime,
    ) -> AppResult<CorrectionOutcome> {
        self.employee(employee_id)?;

        let month = month_key(now.date());
        let cap = self.cfg.adjustment_cap;

        let tx = self.pool.conn.transaction()?;

        quota::get_or_create(&tx, employee_id, &month, cap)?;

        if !actor_is_admin && !quota::try_consume(&tx, employee_id, &month)? {
            return Err(AppError::QuotaExceeded { month, cap });
        }

        let old = punches::load_slot(&tx, employee_id, date, slot)?;
        let before = match &old {
            Some(p) => format!("{} {} {}", p.date_str(), p.slot.to_db_str(), p.time_str()),
            None => "(none)".to_string(),
        };

        if let Some(old) = &old {
            punches::supersede(&tx, old.id)?;
        }

        let mut ev = PunchEvent::new(
            employee_id,
            date,
            new_time,
            slot,
            Provenance::Corrected,
            Some(reason.to_string()),
        );
        ev.id = punches::insert_punch(&tx, &ev)?;

        let after = format!("{} {} {}", ev.date_str(), ev.slot.to_db_str(), ev.time_str());
        quota::append_history(
            &tx,
            employee_id,
            &month,
            &AdjustmentRecord {
                kind: AdjustmentKind::PunchCorrection,
                before,
                after,
                timestamp: Local::now().to_rfc3339(),
                reason: reason.to_string(),
                by_admin: actor_is_admin,
            },
        )?;

        tx.commit()?;

        let remaining_after = if actor_is_admin {
            None
        } else {
            quota::remaining(&self.pool.conn, employee_id, &month)?
        };

        ttlog(
            &self.pool.conn,
            "correct",
            &format!("{} {} {}", employee_id, date, slot.to_db_str()),
            &format!("Corrected to {}", new_time.format("%H:%M")),
        )?;
        self.notify(employee_id);

        Ok(CorrectionOutcome {
            event: Some(ev),
            remaining_after,
        })
    }

    /// Fill every missing slot of a day with schedule-exact punches
    /// (provenance `batch`). Administrator tool; audited, no quota
    /// decrement.
    pub fn insert_batch_day(
        &mut self,
        employee_id: &str,
        date: NaiveDate,
        actor_is_admin: bool,
        now: NaiveDateTime,
    ) -> AppResult<usize> {
        if !actor_is_admin {
            return Err(AppError::AdminRequired(
                "batch punch insertion".to_string(),
            ));
        }

        let emp = self.employee(employee_id)?;
        let sched = self.effective_schedule(&emp, date)?.ok_or_else(|| {
            AppError::NoScheduleResolved(format!("{} on {}", employee_id, date))
        })?;

        let month = month_key(now.date());
        let tx = self.pool.conn.transaction()?;

        quota::get_or_create(&tx, employee_id, &month, self.cfg.adjustment_cap)?;

        let existing = punches::load_live_for_day(&tx, employee_id, date)?;
        let slots = DaySlots::from_punches(&existing);

        let mut inserted = 0;
        for slot in SlotKind::ALL {
            if slots.has(slot) {
                continue;
            }
            let ev = PunchEvent::new(
                employee_id,
                date,
                sched.time_for(slot),
                slot,
                Provenance::Batch,
                None,
            );
            punches::insert_punch(&tx, &ev)?;
            inserted += 1;
        }

        if inserted > 0 {
            quota::append_history(
                &tx,
                employee_id,
                &month,
                &AdjustmentRecord {
                    kind: AdjustmentKind::BatchInsertion,
                    before: "(none)".to_string(),
                    after: format!("{} punches at schedule times on {}", inserted, date),
                    timestamp: Local::now().to_rfc3339(),
                    reason: "batch insertion".to_string(),
                    by_admin: true,
                },
            )?;
        }

        tx.commit()?;

        ttlog(
            &self.pool.conn,
            "batch",
            &format!("{} {}", employee_id, date),
            &format!("Inserted {} schedule-exact punches", inserted),
        )?;
        self.notify(employee_id);

        Ok(inserted)
    }

    /// Set the employee's lunch override. Stored server-side and merged
    /// into every schedule resolution, so all clients observe the same
    /// effective schedule; recorded in the audit history.
    pub fn apply_lunch_override(
        &mut self,
        employee_id: &str,
        ov: LunchOverride,
        reason: &str,
        actor_is_admin: bool,
        now: NaiveDateTime,
    ) -> AppResult<()> {
        if !actor_is_admin {
            return Err(AppError::AdminRequired("lunch override".to_string()));
        }

        let emp = self.employee(employee_id)?;
        let month = month_key(now.date());

        let before = match staff::get_lunch_override(&self.pool.conn, employee_id)? {
            Some(old) => format!(
                "lunch {}-{}",
                old.lunch_out.format("%H:%M"),
                old.lunch_return.format("%H:%M")
            ),
            None => format!("base schedule {}", emp.schedule_code),
        };

        let tx = self.pool.conn.transaction()?;

        quota::get_or_create(&tx, employee_id, &month, self.cfg.adjustment_cap)?;
        staff::set_lunch_override(&tx, employee_id, &ov)?;
        quota::append_history(
            &tx,
            employee_id,
            &month,
            &AdjustmentRecord {
                kind: AdjustmentKind::ScheduleOverride,
                before,
                after: format!(
                    "lunch {}-{}",
                    ov.lunch_out.format("%H:%M"),
                    ov.lunch_return.format("%H:%M")
                ),
                timestamp: Local::now().to_rfc3339(),
                reason: reason.to_string(),
                by_admin: true,
            },
        )?;

        tx.commit()?;

        ttlog(
            &self.pool.conn,
            "override",
            employee_id,
            &format!(
                "Lunch override {}-{}",
                ov.lunch_out.format("%H:%M"),
                ov.lunch_return.format("%H:%M")
            ),
        )?;
        self.notify(employee_id);

        Ok(())
    }

    pub fn get_adjustment_quota(
        &mut self,
        employee_id: &str,
        month: &str,
    ) -> AppResult<AdjustmentQuota> {
        self.employee(employee_id)?;
        quota::get_or_create(
            &self.pool.conn,
            employee_id,
            month,
            self.cfg.adjustment_cap,
        )
    }
}
