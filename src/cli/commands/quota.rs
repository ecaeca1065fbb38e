use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ledger::Ledger;
use crate::utils::date::{month_key, parse_month_key, today};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Quota { employee, month } = cmd {
        let key = match month {
            Some(m) => {
                parse_month_key(m)?; // validate format
                m.clone()
            }
            None => month_key(today()),
        };

        let mut ledger = Ledger::open(cfg)?;
        let q = ledger.get_adjustment_quota(employee, &key)?;

        println!("\n=== Adjustments {} - {} ===", employee, q.month);
        println!("Used: {} | Remaining: {}", q.used, q.remaining);

        if q.history.is_empty() {
            println!("History: empty");
        } else {
            println!("History:");
            for rec in &q.history {
                println!(
                    "- [{}] {} | {} → {} | {}{}",
                    rec.timestamp,
                    rec.kind.to_db_str(),
                    rec.before,
                    rec.after,
                    rec.reason,
                    if rec.by_admin { " (admin)" } else { "" }
                );
            }
        }
    }
    Ok(())
}
