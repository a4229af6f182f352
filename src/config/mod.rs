use crate::core::sprint::MAX_SPRINT_LENGTH_DAYS;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Assignee (first name) whose tickets are dropped from every aggregate.
    #[serde(default)]
    pub excluded_assignee: String,
    #[serde(default = "default_sprint_length")]
    pub sprint_length_days: i64,
    #[serde(default)]
    pub estimate_tolerance_days: f64,
    #[serde(default = "default_workload_limit")]
    pub workload_limit_days: f64,
    #[serde(default)]
    pub low_capacity_assignees: Vec<String>,
}

fn default_sprint_length() -> i64 {
    14
}
fn default_workload_limit() -> f64 {
    10.0
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file().to_string_lossy().to_string())
    }
}

impl Config {
    fn with_database(database: String) -> Self {
        Self {
            database,
            excluded_assignee: String::new(),
            sprint_length_days: default_sprint_length(),
            estimate_tolerance_days: 0.0,
            workload_limit_days: default_workload_limit(),
            low_capacity_assignees: Vec::new(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("sprintpulse")
        } else {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home.join(".sprintpulse")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("sprintpulse.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("sprintpulse.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if path.exists() {
            let content = fs::read_to_string(&path)?;
            Self::from_yaml(&content)
        } else {
            Ok(Config::default())
        }
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let cfg: Config = serde_yaml::from_str(content)?;
        if !(1..=MAX_SPRINT_LENGTH_DAYS).contains(&cfg.sprint_length_days) {
            return Err(AppError::Config(format!(
                "sprint_length_days must be between 1 and {} (got {})",
                MAX_SPRINT_LENGTH_DAYS, cfg.sprint_length_days
            )));
        }
        Ok(cfg)
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB path: user provided or default
        let db_path = match custom_db {
            Some(name) => {
                let p = std::path::Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => dir.join("sprintpulse.sqlite"),
        };

        let config = Self::with_database(db_path.to_string_lossy().to_string());

        // Test runs never touch the user's config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path).map_err(|e| {
                io::Error::new(e.kind(), format!("cannot create {}: {e}", db_path.display()))
            })?;
        }

        Ok(db_path)
    }
}
