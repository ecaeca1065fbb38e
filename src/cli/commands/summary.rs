use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ledger::Ledger;
use crate::utils::date::{month_key, parse_month_key, today};
use crate::utils::time::format_minutes;
use chrono::Local;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Summary {
        employee,
        month,
        json,
    } = cmd
    {
        let key = match month {
            Some(m) => m.clone(),
            None => month_key(today()),
        };
        let (year, month_num) = parse_month_key(&key)?;

        let mut ledger = Ledger::open(cfg)?;
        let s = ledger.get_monthly_summary(
            employee,
            year,
            month_num,
            Local::now().naive_local(),
        )?;

        if *json {
            println!(
                "{}",
                serde_json::to_string_pretty(&s)
                    .map_err(|e| crate::errors::AppError::Other(e.to_string()))?
            );
            return Ok(());
        }

        println!("\n=== {} - {} ===", employee, s.month);
        println!("Days worked: {}", s.days_worked);
        println!("Worked: {}", format_minutes(s.worked_minutes));
        println!(
            "Credit: {} | Debit: {}",
            format_minutes(s.credit_minutes),
            format_minutes(s.debit_minutes)
        );
        println!("Violations: {}", s.violation_count);
        println!("Absences: {}", s.absence_count);

        if s.bonus_eligible {
            println!("Attendance bonus: ELIGIBLE ({})", s.bonus_amount);
        } else {
            println!("Attendance bonus: not eligible (0)");
        }
    }
    Ok(())
}
