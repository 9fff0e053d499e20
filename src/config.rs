//! Application configuration loaded from a YAML file.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## File Format
//!
//! ```yaml
//! allowDomain:
//!   - example.com
//! expire: 604800          # mapping lifetime, seconds
//! host: "https://s.example.com"
//! shortLength: 6
//! port: 8080
//! ```
//!
//! ## Optional Keys
//!
//! - `bindAddress` - Listen address (default: `0.0.0.0`)
//! - `cleanInterval` - Seconds between purges of expired mappings (default: 43200)
//! - `shortIdAttempts` - Create attempts per shorten before giving up (default: 10)
//! - `databaseUrl` - SQLite URL (default: `sqlite:./db.sqlite`)
//! - `dbMaxConnections` - Pool size (default: 5)
//! - `logFormat` - `text` or `json` (default: `text`)
//!
//! ## Environment Overrides
//!
//! - `DATABASE_URL` - Replaces `databaseUrl`
//! - `LOG_FORMAT` - Replaces `logFormat`
//! - `RUST_LOG` - Log filter (default: `info`), read by the binary

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;

/// Longest accepted mapping lifetime: 100 years.
pub const MAX_EXPIRE_SECS: i64 = 100 * 365 * 24 * 60 * 60;

/// Longest accepted reaper period: one year.
pub const MAX_CLEAN_INTERVAL_SECS: u64 = 365 * 24 * 60 * 60;

const HOSTNAME_PATTERN: &str =
    r"^(?i)[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?(\.[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?)*$";

/// Service configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Hostnames whose URLs may be shortened.
    #[serde(default)]
    pub allow_domain: Vec<String>,
    /// Mapping lifetime in seconds.
    pub expire: i64,
    /// Public base URL for short links.
    pub host: String,
    pub short_length: usize,
    pub port: u16,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Reaper period in seconds.
    #[serde(default = "default_clean_interval")]
    pub clean_interval: u64,
    #[serde(default = "default_short_id_attempts")]
    pub short_id_attempts: usize,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_clean_interval() -> u64 {
    12 * 60 * 60
}

fn default_short_id_attempts() -> usize {
    10
}

fn default_database_url() -> String {
    "sqlite:./db.sqlite".to_string()
}

fn default_db_max_connections() -> u32 {
    5
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Config {
    /// Parses configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or a required key is missing.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse configuration")
    }

    /// Reads and parses the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        Self::from_yaml_str(&yaml).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Applies `DATABASE_URL` and `LOG_FORMAT` from the environment.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var("DATABASE_URL") {
            self.database_url = url;
        }

        if let Ok(format) = env::var("LOG_FORMAT") {
            self.log_format = format;
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `expire`, `port`, `cleanInterval`, `shortIdAttempts` or
    ///   `dbMaxConnections` is zero (or negative)
    /// - `expire` exceeds [`MAX_EXPIRE_SECS`] or `cleanInterval` exceeds
    ///   [`MAX_CLEAN_INTERVAL_SECS`]
    /// - `shortLength` is outside 1..=64
    /// - `host` is not an absolute URL
    /// - an `allowDomain` entry is not a hostname
    /// - `bindAddress` is not an IP address
    /// - `logFormat` is not `text` or `json`
    /// - `databaseUrl` does not start with `sqlite:`
    pub fn validate(&self) -> Result<()> {
        if self.expire <= 0 {
            anyhow::bail!("expire must be greater than 0, got {}", self.expire);
        }
        if self.expire > MAX_EXPIRE_SECS {
            anyhow::bail!(
                "expire must be at most {} seconds, got {}",
                MAX_EXPIRE_SECS,
                self.expire
            );
        }

        if self.short_length == 0 || self.short_length > 64 {
            anyhow::bail!(
                "shortLength must be between 1 and 64, got {}",
                self.short_length
            );
        }
        if self.short_length < 5 {
            tracing::warn!(
                short_length = self.short_length,
                "shortLength is small; short id collisions will be frequent"
            );
        }

        let host = url::Url::parse(&self.host)
            .with_context(|| format!("host must be an absolute URL, got '{}'", self.host))?;
        if !host.has_host() {
            anyhow::bail!("host must be an absolute URL, got '{}'", self.host);
        }

        let hostname = Regex::new(HOSTNAME_PATTERN)?;
        if let Some(bad) = self
            .allow_domain
            .iter()
            .find(|d| !hostname.is_match(d.trim()))
        {
            anyhow::bail!("allowDomain entry '{}' is not a valid hostname", bad);
        }
        if self.allow_domain.is_empty() {
            tracing::warn!("allowDomain is empty; every shorten request will be rejected");
        }

        if self.port == 0 {
            anyhow::bail!("port must be greater than 0");
        }

        self.bind_address
            .parse::<IpAddr>()
            .with_context(|| format!("bindAddress must be an IP address, got '{}'", self.bind_address))?;

        if self.clean_interval == 0 {
            anyhow::bail!("cleanInterval must be greater than 0");
        }
        if self.clean_interval > MAX_CLEAN_INTERVAL_SECS {
            anyhow::bail!(
                "cleanInterval must be at most {} seconds, got {}",
                MAX_CLEAN_INTERVAL_SECS,
                self.clean_interval
            );
        }

        if self.short_id_attempts == 0 {
            anyhow::bail!("shortIdAttempts must be at least 1");
        }

        if self.db_max_connections == 0 {
            anyhow::bail!("dbMaxConnections must be at least 1");
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "logFormat must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.database_url.starts_with("sqlite:") {
            anyhow::bail!(
                "databaseUrl must start with 'sqlite:', got '{}'",
                self.database_url
            );
        }

        Ok(())
    }

    /// Socket address the server binds to.
    ///
    /// # Errors
    ///
    /// Returns an error if `bindAddress` is not an IP address.
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .bind_address
            .parse()
            .with_context(|| format!("Invalid bindAddress '{}'", self.bind_address))?;

        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn clean_interval(&self) -> Duration {
        Duration::from_secs(self.clean_interval)
    }

    /// Logs a configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}:{}", self.bind_address, self.port);
        tracing::info!("  Public host: {}", self.host);
        tracing::info!("  Database: {}", self.database_url);
        tracing::info!("  Allowed domains: {}", self.allow_domain.join(", "));
        tracing::info!("  Expire: {}s", self.expire);
        tracing::info!("  Short id length: {}", self.short_length);
        tracing::info!("  Clean interval: {}s", self.clean_interval);
        tracing::info!("  Log format: {}", self.log_format);
    }
}
