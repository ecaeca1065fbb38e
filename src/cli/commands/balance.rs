use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ledger::Ledger;
use crate::ui::messages::warning;
use crate::utils::date::{parse_required_date, today};
use crate::utils::time::{format_minutes, format_signed_minutes};
use chrono::Local;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Balance {
        employee,
        date,
        json,
    } = cmd
    {
        let date = match date {
            Some(d) => parse_required_date(d)?,
            None => today(),
        };

        let mut ledger = Ledger::open(cfg)?;
        let b = ledger.get_daily_balance(employee, date, Local::now().naive_local())?;

        if *json {
            println!(
                "{}",
                serde_json::to_string_pretty(&b)
                    .map_err(|e| crate::errors::AppError::Other(e.to_string()))?
            );
            return Ok(());
        }

        println!("\n=== {} - {} ===", employee, date);
        println!(
            "Morning: {} | Afternoon: {}",
            format_minutes(b.morning_minutes),
            format_minutes(b.afternoon_minutes)
        );
        println!(
            "Worked: {} | Expected: {} | Balance: {}",
            format_minutes(b.worked_minutes),
            format_minutes(b.expected_minutes),
            format_signed_minutes(b.balance_minutes)
        );

        if b.open_day {
            println!("Day still open: worked time keeps growing until exit.");
        }

        if b.violations.is_empty() {
            println!("Violations: none");
        } else {
            println!("Violations: {}", b.violations.len());
            for v in &b.violations {
                warning(&v.reason);
            }
        }
    }
    Ok(())
}
