use crate::errors::{AppError, AppResult};
use crate::utils::date::parse_timezone;
use crate::utils::path::expand_tilde;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod migrate; // use submodule at src/config/migrate.rs

/// Environment override for the configuration directory.
pub const CONFIG_DIR_ENV: &str = "RWEEKLOG_CONFIG_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path of the shared log table (CSV).
    pub table: String,
    /// Reference timezone for every timestamp and week computation.
    pub timezone: String,
    /// Maximum age of a cached table read; 0 always reads fresh.
    pub read_ttl_secs: u64,
    /// Client-side request quota per minute against the table; 0 = unlimited.
    pub max_requests_per_minute: u32,
    pub log_level: String,
    pub summary: SummaryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// `local` (offline digest) or `openai` (chat-completions endpoint).
    pub provider: String,
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub stream: bool,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table: Self::table_file().to_string_lossy().to_string(),
            timezone: "+08:00".to_string(),
            read_ttl_secs: 0,
            max_requests_per_minute: 60,
            log_level: "warn".to_string(),
            summary: SummaryConfig::default(),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            provider: "local".to_string(),
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            stream: true,
            timeout_secs: 120,
        }
    }
}

impl Config {
    /// Configuration directory: `$RWEEKLOG_CONFIG_DIR`, else `~/.rweeklog`.
    pub fn config_dir() -> PathBuf {
        if let Ok(dir) = env::var(CONFIG_DIR_ENV)
            && !dir.trim().is_empty()
        {
            return expand_tilde(&dir);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rweeklog")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rweeklog.conf")
    }

    /// Default location of the shared table
    pub fn table_file() -> PathBuf {
        Self::config_dir().join("worklog.csv")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let yaml = serde_yaml::to_string(self).map_err(|_| AppError::ConfigSave)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(path).map_err(|_| AppError::ConfigSave)?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    /// Table path with `~` expanded.
    pub fn table_path(&self) -> PathBuf {
        expand_tilde(&self.table)
    }

    /// Relative table names live in the config directory.
    pub fn resolve_table(name: &str) -> PathBuf {
        let p = expand_tilde(name);
        if p.is_absolute() {
            p
        } else {
            Self::config_dir().join(p)
        }
    }

    pub fn tz(&self) -> AppResult<FixedOffset> {
        parse_timezone(&self.timezone)
    }

    pub fn read_ttl(&self) -> Duration {
        Duration::from_secs(self.read_ttl_secs)
    }

    /// Write a fresh config file (unless `is_test`) and return it.
    /// `custom_table` overrides the default table location; relative paths
    /// are resolved against the config directory.
    pub fn init_all(custom_table: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let table = match custom_table {
            Some(name) => Self::resolve_table(&name),
            None => Self::table_file(),
        };

        let config = Config {
            table: table.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            config.save_to(&Self::config_file())?;
        }

        Ok(config)
    }
}
