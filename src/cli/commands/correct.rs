use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ledger::Ledger;
use crate::models::slot::SlotKind;
use crate::ui::messages::{info, success};
use crate::utils::date::parse_required_date;
use crate::utils::time::parse_required_time;
use chrono::Local;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Correct {
        employee,
        date,
        slot,
        time,
        reason,
        admin,
        perfect,
    } = cmd
    {
        let date = parse_required_date(date)?;
        let now = Local::now().naive_local();
        let mut ledger = Ledger::open(cfg)?;

        // --perfect: fill the whole day with schedule-exact punches.
        if *perfect {
            let inserted = ledger.insert_batch_day(employee, date, *admin, now)?;
            success(format!(
                "Inserted {} schedule-exact punches for {} on {}.",
                inserted, employee, date
            ));
            return Ok(());
        }

        let slot_str = slot
            .as_deref()
            .ok_or_else(|| AppError::InvalidSlot("missing slot argument".to_string()))?;
        let slot = SlotKind::from_cli_str(slot_str)
            .ok_or_else(|| AppError::InvalidSlot(slot_str.to_string()))?;

        let time_str = time
            .as_deref()
            .ok_or_else(|| AppError::InvalidTime("missing --time".to_string()))?;
        let new_time = parse_required_time(time_str)?;

        let reason = reason.as_deref().unwrap_or("manual correction");

        let outcome =
            ledger.request_correction(employee, date, slot, new_time, reason, *admin, now)?;

        success(format!(
            "Corrected '{}' on {} to {}.",
            slot.label(),
            date,
            new_time.format("%H:%M")
        ));

        match outcome.remaining_after {
            Some(remaining) => info(format!("Adjustments remaining this month: {}", remaining)),
            None => info("Administrator correction: quota unchanged, recorded in history."),
        }
    }
    Ok(())
}
