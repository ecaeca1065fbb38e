use crate::core::hygiene::HygieneConfig;
use crate::core::tolerance::GateMode;
use crate::errors::AppResult;
use crate::utils::time::parse_time;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_tolerance")]
    pub tolerance_minutes: i64,
    #[serde(default = "default_adjustment_cap")]
    pub adjustment_cap: i32,
    #[serde(default = "default_bonus")]
    pub attendance_bonus: i64,
    #[serde(default = "default_gate_mode")]
    pub gate_mode: String,
    #[serde(default = "default_sentinel_times")]
    pub sentinel_times: Vec<String>,
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
}

fn default_tolerance() -> i64 {
    crate::core::tolerance::TOLERANCE_MINUTES
}
fn default_adjustment_cap() -> i32 {
    4
}
fn default_bonus() -> i64 {
    crate::core::monthly::ATTENDANCE_BONUS
}
fn default_gate_mode() -> String {
    "advisory".to_string()
}
fn default_sentinel_times() -> Vec<String> {
    vec!["00:00".to_string(), "10:10".to_string()]
}
fn default_retention_days() -> i64 {
    crate::core::hygiene::DEFAULT_RETENTION_DAYS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            tolerance_minutes: default_tolerance(),
            adjustment_cap: default_adjustment_cap(),
            attendance_bonus: default_bonus(),
            gate_mode: default_gate_mode(),
            sentinel_times: default_sentinel_times(),
            retention_days: default_retention_days(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = std::env::var("APPDATA")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."));
            appdata.join("pontoledger")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".pontoledger")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("pontoledger.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("pontoledger.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> Self {
        let path = Self::config_file();

        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
                    crate::ui::messages::warning(format!(
                        "Configuration file unreadable ({}), using defaults",
                        e
                    ));
                    Config::default()
                }),
                Err(_) => Config::default(),
            }
        } else {
            Config::default()
        }
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> io::Result<()> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = std::path::Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            Self::database_file()
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config)
                .map_err(|e| io::Error::other(format!("serialize config: {}", e)))?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(())
    }

    /// Report config keys missing from the file (filled with defaults at
    /// load time).
    pub fn missing_keys() -> AppResult<Vec<&'static str>> {
        let path = Self::config_file();
        if !path.exists() {
            return Ok(vec![]);
        }

        let content = fs::read_to_string(&path)?;
        let value: serde_yaml::Value = serde_yaml::from_str(&content)
            .map_err(|e| crate::errors::AppError::Config(e.to_string()))?;

        let expected = [
            "database",
            "tolerance_minutes",
            "adjustment_cap",
            "attendance_bonus",
            "gate_mode",
            "sentinel_times",
            "retention_days",
        ];

        Ok(expected
            .into_iter()
            .filter(|k| value.get(k).is_none())
            .collect())
    }

    // ------------------------------------------------
    // Typed accessors for the ledger
    // ------------------------------------------------

    pub fn gate(&self) -> AppResult<GateMode> {
        GateMode::from_config_str(&self.gate_mode)
    }

    /// Build the hygiene settings; unparseable sentinel entries are skipped.
    pub fn hygiene(&self) -> HygieneConfig {
        HygieneConfig {
            sentinel_times: self
                .sentinel_times
                .iter()
                .filter_map(|s| parse_time(s))
                .collect(),
            retention_days: self.retention_days,
        }
    }
}
