use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ledger::Ledger;
use crate::models::punch::PunchEvent;
use crate::utils::date;
use chrono::NaiveDate;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { employee, period } = cmd {
        let mut ledger = Ledger::open(cfg)?;

        let punches = match period {
            // Explicit period → those dates, sentinels stripped.
            Some(_) => {
                let dates = resolve_period(period)?;
                ledger.history_for_dates(employee, &dates)?
            }
            // Default: rolling recent history within the retention horizon.
            None => ledger.recent_history(employee)?,
        };

        if punches.is_empty() {
            println!("No punches for {}", employee);
            return Ok(());
        }

        print_punches(&punches);
    }
    Ok(())
}

fn resolve_period(period: &Option<String>) -> AppResult<Vec<NaiveDate>> {
    if let Some(p) = period {
        if p.contains(':') {
            let parts: Vec<&str> = p.split(':').collect();
            if parts.len() == 2 {
                return date::generate_range(parts[0], parts[1]).map_err(AppError::InvalidDate);
            }
        }

        return date::generate_from_period(p).map_err(AppError::InvalidDate);
    }

    date::current_month_dates().map_err(AppError::InvalidDate)
}

fn print_punches(punches: &[PunchEvent]) {
    println!("PUNCHES:");
    for p in punches {
        println!(
            "- {} {} | {:<12} | {}{}",
            p.date_str(),
            p.time_str(),
            p.slot.to_db_str(),
            p.provenance.to_db_str(),
            if p.note.is_empty() {
                String::new()
            } else {
                format!(" | {}", p.note)
            }
        );
    }
}
