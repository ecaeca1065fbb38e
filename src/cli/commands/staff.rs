use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::schedule::LunchOverride;
use crate::db::pool::DbPool;
use crate::db::staff;
use crate::errors::{AppError, AppResult};
use crate::ledger::Ledger;
use crate::models::employee::Employee;
use crate::models::schedule;
use crate::ui::messages::success;
use crate::utils::time::parse_required_time;
use chrono::Local;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Staff {
        id,
        name,
        schedule: schedule_code,
        admin,
        lunch_out,
        lunch_return,
        reason,
        list,
    } = cmd
    {
        if *list {
            let pool = DbPool::new(&cfg.database)?;
            let employees = staff::list_employees(&pool.conn)?;

            if employees.is_empty() {
                println!("No employees registered.");
                return Ok(());
            }

            println!("EMPLOYEES:");
            for e in employees {
                println!(
                    "- {} | {} | schedule={}{}",
                    e.id,
                    if e.name.is_empty() { "(no name)" } else { e.name.as_str() },
                    e.schedule_code,
                    if e.is_admin { " | admin" } else { "" }
                );
            }
            return Ok(());
        }

        let id = id
            .as_deref()
            .ok_or_else(|| AppError::UnknownEmployee("missing employee id".to_string()))?;

        // Lunch override goes through the ledger so it lands in the
        // adjustment history.
        if lunch_out.is_some() || lunch_return.is_some() {
            let (Some(lo), Some(lr)) = (lunch_out.as_deref(), lunch_return.as_deref()) else {
                return Err(AppError::InvalidTime(
                    "--lunch-out and --lunch-return must be given together".to_string(),
                ));
            };

            let ov = LunchOverride {
                lunch_out: parse_required_time(lo)?,
                lunch_return: parse_required_time(lr)?,
            };

            let mut ledger = Ledger::open(cfg)?;
            ledger.apply_lunch_override(
                id,
                ov,
                reason.as_deref().unwrap_or("lunch override"),
                true,
                Local::now().naive_local(),
            )?;

            success(format!("Lunch override set for {}.", id));
            return Ok(());
        }

        // Add / update directory entry.
        let code = schedule_code.as_deref().unwrap_or("M");
        if schedule::builtin(code).is_none() {
            return Err(AppError::Config(format!(
                "unknown schedule code '{}'; known codes: {}",
                code,
                schedule::known_codes().join(", ")
            )));
        }

        let pool = DbPool::new(&cfg.database)?;
        let emp = Employee {
            id: id.to_string(),
            name: name.clone().unwrap_or_default(),
            schedule_code: code.to_string(),
            is_admin: *admin,
        };
        staff::upsert_employee(&pool.conn, &emp)?;

        success(format!("Employee {} saved (schedule {}).", id, code));
    }
    Ok(())
}
