use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::tolerance::GateDecision;
use crate::errors::{AppError, AppResult};
use crate::ledger::Ledger;
use crate::models::slot::SlotKind;
use crate::ui::messages::{info, success, warning};
use crate::utils::date::parse_required_date;
use crate::utils::time::parse_required_time;
use chrono::Local;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Punch {
        employee,
        slot,
        at,
        date,
        note,
    } = cmd
    {
        let slot = SlotKind::from_cli_str(slot)
            .ok_or_else(|| AppError::InvalidSlot(slot.clone()))?;

        // `now` is the punch instant: today/current time unless overridden.
        let now_local = Local::now().naive_local();
        let date = match date {
            Some(d) => parse_required_date(d)?,
            None => now_local.date(),
        };
        let time = match at {
            Some(t) => parse_required_time(t)?,
            None => now_local.time(),
        };
        let now = date.and_time(time);

        let mut ledger = Ledger::open(cfg)?;
        let outcome = ledger.record_punch(employee, slot, now, note.clone())?;

        success(format!(
            "Punch '{}' recorded at {} on {}.",
            slot.label(),
            outcome.event.time_str(),
            outcome.event.date_str()
        ));

        if let Some(dev) = outcome.deviation {
            info(dev.message());
        }

        // Advisory gate: the punch stands, the window miss is surfaced.
        if !outcome.gate.is_admissible() && outcome.gate != GateDecision::NoSchedule {
            warning(outcome.gate.describe());
        }

        info(outcome.status.text());
    }
    Ok(())
}
