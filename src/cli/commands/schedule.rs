use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::schedule as resolver;
use crate::errors::AppResult;
use crate::models::schedule;
use crate::utils::date::{parse_required_date, today};

pub fn handle(cmd: &Commands, _cfg: &Config) -> AppResult<()> {
    if let Commands::Schedule { code, date } = cmd {
        let date = match date {
            Some(d) => parse_required_date(d)?,
            None => today(),
        };

        match code {
            Some(code) => {
                let def = schedule::builtin(code);

                match def {
                    Some(def) => {
                        println!("{} | {}", def.label, def.description);
                        match resolver::resolve(code, date) {
                            Some(t) => println!(
                                "{}: {} - {} (lunch {} - {})",
                                date,
                                t.entry.format("%H:%M"),
                                t.exit.format("%H:%M"),
                                t.lunch_out.format("%H:%M"),
                                t.lunch_return.format("%H:%M")
                            ),
                            None => println!("{}: no work expected", date),
                        }
                    }
                    None => println!("Unknown code '{}': treated as non-working.", code),
                }
            }
            None => {
                println!("Known schedule codes:");
                for c in schedule::known_codes() {
                    let def = schedule::builtin(c).unwrap();
                    println!("- {:<12} {}", c, def.description);
                }
            }
        }
    }
    Ok(())
}
