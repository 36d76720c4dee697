use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | Database and log root |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development / staging / production |
/// | LOG_LEVEL | info | Filter used when `RUST_LOG` is unset |
/// | LOG_DIR | (unset) | Daily-rolling log files instead of stdout |
/// | DEFAULT_TAX_RATE | 0.19 | Tax rate for new aggregates |
/// | EDIT_GRANT_MINUTES | 5 | Validity window of an approved edit request |
/// | EXPIRY_SWEEP_INTERVAL_SECS | 60 | Expiry scheduler period |
/// | EXPIRY_WARNING_SECS | 60 | Warn requesters this long before a grant lapses |
/// | ADMIN_USER_IDS | (empty) | Comma-separated privileged user ids |
/// | AUDIT_BUFFER_SIZE | 1024 | Audit channel capacity |
///
/// ```ignore
/// WORK_DIR=/srv/orders HTTP_PORT=8080 ADMIN_USER_IDS=alice,bob cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub http_port: u16,
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub default_tax_rate: Decimal,
    pub edit_grant_minutes: i64,
    pub expiry_sweep_interval_secs: u64,
    pub expiry_warning_secs: u64,
    pub admin_user_ids: Vec<String>,
    pub audit_buffer_size: usize,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Split a comma-separated id list, dropping blanks
pub fn parse_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: env_or("HTTP_PORT", 3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            default_tax_rate: env_or("DEFAULT_TAX_RATE", Decimal::new(19, 2)),
            edit_grant_minutes: env_or("EDIT_GRANT_MINUTES", 5),
            expiry_sweep_interval_secs: env_or("EXPIRY_SWEEP_INTERVAL_SECS", 60),
            expiry_warning_secs: env_or("EXPIRY_WARNING_SECS", 60),
            admin_user_ids: std::env::var("ADMIN_USER_IDS")
                .map(|v| parse_id_list(&v))
                .unwrap_or_default(),
            audit_buffer_size: env_or("AUDIT_BUFFER_SIZE", 1024),
        }
    }

    /// Override the work directory and port
    ///
    /// Used by tests.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// Directory holding the redb database file
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// Path of the redb database file
    pub fn database_path(&self) -> PathBuf {
        self.database_dir().join("orders.redb")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list(" alice, ,bob ,"), vec!["alice", "bob"]);
        assert!(parse_id_list("").is_empty());
    }

    #[test]
    fn test_database_path() {
        let config = Config::with_overrides("/tmp/orders", 0);
        assert_eq!(config.database_path(), PathBuf::from("/tmp/orders/database/orders.redb"));
    }
}
