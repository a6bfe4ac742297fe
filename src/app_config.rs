use anyhow::{anyhow, Context, Result};
use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Storage settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Page size settings for list operations
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Language codes offered by the admin console
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Storage configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct DatabaseConfig {
    /// SQLite file path; the user's data directory is used when unset
    #[serde(default)]
    pub path: Option<String>,
}

/// Pagination configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PaginationConfig {
    /// Page size used when a request names none
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Upper bound for any requested page size
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Level filter for the `log` facade
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_page_size() -> u32 {
    10
}

fn default_max_page_size() -> u32 {
    100
}

fn default_languages() -> Vec<String> {
    ["en", "es", "fr", "de"].iter().map(|l| l.to_string()).collect()
}

impl Config {
    /// Check page sizes and the configured language codes
    pub fn validate(&self) -> Result<()> {
        if self.pagination.max_page_size == 0 {
            return Err(anyhow!("pagination.max_page_size must be at least 1"));
        }
        if self.pagination.default_page_size == 0
            || self.pagination.default_page_size > self.pagination.max_page_size
        {
            return Err(anyhow!(
                "pagination.default_page_size must be between 1 and {}",
                self.pagination.max_page_size
            ));
        }

        if self.languages.is_empty() {
            return Err(anyhow!("At least one language must be configured"));
        }
        for code in &self.languages {
            crate::language_utils::validate_language_code(code)
                .with_context(|| format!("Invalid entry in languages: '{}'", code))?;
        }

        Ok(())
    }

    /// Load the configuration file, writing a default one when it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            database: DatabaseConfig::default(),
            pagination: PaginationConfig::default(),
            languages: default_languages(),
            log_level: LogLevel::default(),
        }
    }
}
