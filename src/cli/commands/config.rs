use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use std::fs;

pub fn handle(cmd: &Commands, _cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
    } = cmd
    {
        if *print_config {
            let path = Config::config_file();
            if path.exists() {
                println!("{}", fs::read_to_string(&path)?);
            } else {
                warning(format!(
                    "No configuration file at {}; run 'init' first.",
                    path.display()
                ));
            }
        }

        if *check {
            let missing = Config::missing_keys()?;
            if missing.is_empty() {
                success("Configuration complete: all keys present.");
            } else {
                warning(format!(
                    "Missing keys (defaults apply): {}",
                    missing.join(", ")
                ));
            }
        }
    }
    Ok(())
}
