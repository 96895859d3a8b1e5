//! Configuration module for ephemail.

use serde::Deserialize;
use std::path::Path;

use crate::{EphemailError, Result};

/// Web API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed browser origins. When empty, any origin is accepted;
    /// otherwise requests carrying a different Origin header get 403.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8025
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: Vec::new(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/ephemail.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Mailbox address policy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MailboxConfig {
    /// Domain part of every mailbox address served by this instance.
    #[serde(default = "default_domain")]
    pub domain: String,
    /// Mailbox lifetime in hours when the client does not ask for one.
    #[serde(default = "default_expires_in_hours")]
    pub default_expires_in_hours: i64,
    /// Upper bound a client may request for a mailbox lifetime.
    #[serde(default = "default_max_expires_in_hours")]
    pub max_expires_in_hours: i64,
    /// Length of randomly generated local parts.
    #[serde(default = "default_random_local_part_len")]
    pub random_local_part_len: usize,
}

fn default_domain() -> String {
    "ephemail.test".to_string()
}

fn default_expires_in_hours() -> i64 {
    24
}

fn default_max_expires_in_hours() -> i64 {
    168
}

fn default_random_local_part_len() -> usize {
    10
}

impl Default for MailboxConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            default_expires_in_hours: default_expires_in_hours(),
            max_expires_in_hours: default_max_expires_in_hours(),
            random_local_part_len: default_random_local_part_len(),
        }
    }
}

/// Retention policy configuration.
///
/// The grace window and cadence are policy parameters, not constants baked
/// into the sweep code.
#[derive(Debug, Clone, Deserialize)]
pub struct RetentionConfig {
    /// Seconds between retention sweeps.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    /// Seconds a read email is retained before it becomes reclaimable.
    #[serde(default = "default_read_grace_secs")]
    pub read_grace_secs: i64,
    /// Lifetime in hours assigned to each email at ingestion.
    #[serde(default = "default_email_ttl_hours")]
    pub email_ttl_hours: i64,
}

fn default_sweep_interval_secs() -> u64 {
    3600
}

fn default_read_grace_secs() -> i64 {
    3600
}

fn default_email_ttl_hours() -> i64 {
    24
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval_secs(),
            read_grace_secs: default_read_grace_secs(),
            email_ttl_hours: default_email_ttl_hours(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file path. Empty means console-only.
    #[serde(default)]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Web API settings.
    #[serde(default)]
    pub web: WebConfig,
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Mailbox address policy settings.
    #[serde(default)]
    pub mailbox: MailboxConfig,
    /// Retention policy settings.
    #[serde(default)]
    pub retention: RetentionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| EphemailError::Config(e.to_string()))
    }
}
