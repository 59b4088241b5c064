//! Job configuration
//!
//! [`EtlConfig`] holds every location the job reads from or writes to. It is
//! built once (defaults, then environment, then command-line flags) and
//! handed to each component, so tests can point the job at local fixtures.

use crate::error::{EtlError, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BANKS_URL: &str = "https://web.archive.org/web/20230908091635/https://en.wikipedia.org/wiki/List_of_largest_banks";
pub const DEFAULT_RATES_URL: &str = "https://cf-courses-data.s3.us.cloud-object-storage.appdomain.cloud/IBMSkillsNetwork-PY0221EN-Coursera/labs/v2/exchange_rate.csv";
pub const DEFAULT_CSV_PATH: &str = "Largest_banks_data.csv";
pub const DEFAULT_DB_PATH: &str = "Banks.db";
pub const DEFAULT_TABLE_NAME: &str = "Largest_banks";
pub const DEFAULT_LOG_PATH: &str = "code_log.txt";
pub const DEFAULT_TABLE_INDEX: usize = 1;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where a source table comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSource {
    /// An http(s) URL fetched with a GET request
    Remote(String),
    /// A local file, given as a path or a `file://` URL
    File(PathBuf),
}

impl DataSource {
    /// Parse a location string.
    ///
    /// `http://` and `https://` URLs are remote, `file://` URLs and anything
    /// else are treated as local paths.
    pub fn parse(location: &str) -> Result<Self> {
        let location = location.trim();
        if location.is_empty() {
            return Err(EtlError::Config("empty source location".to_string()));
        }

        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                Ok(Self::Remote(url.to_string()))
            }
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(Self::File)
                .map_err(|_| EtlError::Config(format!("invalid file URL: {}", location))),
            _ => Ok(Self::File(PathBuf::from(location))),
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{}", url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Immutable settings for one run of the job
#[derive(Clone, Debug)]
pub struct EtlConfig {
    /// Document holding the banks table
    pub banks_source: DataSource,
    /// CSV holding the exchange rates
    pub rates_source: DataSource,
    /// Zero-based position of the banks table among all tables in the document
    pub table_index: usize,
    pub csv_path: PathBuf,
    pub db_path: PathBuf,
    pub table_name: String,
    pub log_path: PathBuf,
    pub request_timeout: Duration,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            banks_source: DataSource::Remote(DEFAULT_BANKS_URL.to_string()),
            rates_source: DataSource::Remote(DEFAULT_RATES_URL.to_string()),
            table_index: DEFAULT_TABLE_INDEX,
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl EtlConfig {
    /// Build a configuration from defaults overridden by environment variables
    ///
    /// Recognized variables:
    /// - BANKS_ETL_BANKS_URL: banks document URL or path
    /// - BANKS_ETL_RATES_URL: exchange-rate CSV URL or path
    /// - BANKS_ETL_TABLE_INDEX: position of the banks table in the document
    /// - BANKS_ETL_CSV_PATH, BANKS_ETL_DB_PATH, BANKS_ETL_LOG_FILE: output paths
    /// - BANKS_ETL_TABLE_NAME: database table name
    /// - BANKS_ETL_TIMEOUT_SECS: HTTP request timeout
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = env_var("BANKS_ETL_BANKS_URL") {
            config.banks_source = DataSource::parse(&v)?;
        }
        if let Some(v) = env_var("BANKS_ETL_RATES_URL") {
            config.rates_source = DataSource::parse(&v)?;
        }
        if let Some(v) = env_var("BANKS_ETL_TABLE_INDEX") {
            config.table_index = v.parse().map_err(|_| {
                EtlError::Config(format!("BANKS_ETL_TABLE_INDEX is not a number: {}", v))
            })?;
        }
        if let Some(v) = env_var("BANKS_ETL_CSV_PATH") {
            config.csv_path = PathBuf::from(v);
        }
        if let Some(v) = env_var("BANKS_ETL_DB_PATH") {
            config.db_path = PathBuf::from(v);
        }
        if let Some(v) = env_var("BANKS_ETL_TABLE_NAME") {
            config.table_name = v;
        }
        if let Some(v) = env_var("BANKS_ETL_LOG_FILE") {
            config.log_path = PathBuf::from(v);
        }
        if let Some(v) = env_var("BANKS_ETL_TIMEOUT_SECS") {
            let secs: u64 = v.parse().map_err(|_| {
                EtlError::Config(format!("BANKS_ETL_TIMEOUT_SECS is not a number: {}", v))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants that the components rely on
    pub fn validate(&self) -> Result<()> {
        if !is_sql_identifier(&self.table_name) {
            return Err(EtlError::Config(format!(
                "table name must be a plain SQL identifier: {:?}",
                self.table_name
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(EtlError::Config(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The fixed verification statements run after loading
    pub fn verification_queries(&self) -> [String; 3] {
        let table = &self.table_name;
        [
            format!("SELECT * FROM {}", table),
            format!("SELECT AVG(MC_GBP_Billion) FROM {}", table),
            format!("SELECT Name FROM {} LIMIT 5", table),
        ]
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ENV_KEYS: [&str; 8] = [
        "BANKS_ETL_BANKS_URL",
        "BANKS_ETL_RATES_URL",
        "BANKS_ETL_TABLE_INDEX",
        "BANKS_ETL_CSV_PATH",
        "BANKS_ETL_DB_PATH",
        "BANKS_ETL_TABLE_NAME",
        "BANKS_ETL_LOG_FILE",
        "BANKS_ETL_TIMEOUT_SECS",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            // SAFETY: tests touching the environment are serialized
            unsafe { std::env::remove_var(key) };
        }
    }

    fn set_env(key: &str, value: &str) {
        // SAFETY: tests touching the environment are serialized
        unsafe { std::env::set_var(key, value) };
    }

    #[test]
    fn test_parse_sources() {
        assert_eq!(
            DataSource::parse("https://example.com/rates.csv").unwrap(),
            DataSource::Remote("https://example.com/rates.csv".to_string())
        );
        assert_eq!(
            DataSource::parse("fixtures/banks.html").unwrap(),
            DataSource::File(PathBuf::from("fixtures/banks.html"))
        );
        assert!(DataSource::parse("   ").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_file_url() {
        assert_eq!(
            DataSource::parse("file:///tmp/rates.csv").unwrap(),
            DataSource::File(PathBuf::from("/tmp/rates.csv"))
        );
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = EtlConfig::default();
        config.validate().unwrap();
        assert_eq!(config.table_name, "Largest_banks");
        assert_eq!(config.table_index, 1);
        assert_eq!(config.csv_path, PathBuf::from("Largest_banks_data.csv"));
        assert_eq!(config.db_path, PathBuf::from("Banks.db"));
        assert_eq!(config.log_path, PathBuf::from("code_log.txt"));
    }

    #[test]
    fn test_rejects_bad_table_name() {
        let config = EtlConfig {
            table_name: "banks; DROP TABLE x".to_string(),
            ..EtlConfig::default()
        };
        assert!(matches!(config.validate(), Err(EtlError::Config(_))));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let config = EtlConfig {
            request_timeout: Duration::ZERO,
            ..EtlConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sql_identifier() {
        assert!(is_sql_identifier("Largest_banks"));
        assert!(is_sql_identifier("_t1"));
        assert!(!is_sql_identifier("1banks"));
        assert!(!is_sql_identifier(""));
        assert!(!is_sql_identifier("largest-banks"));
    }

    #[test]
    fn test_verification_queries() {
        let queries = EtlConfig::default().verification_queries();
        assert_eq!(queries[0], "SELECT * FROM Largest_banks");
        assert_eq!(queries[1], "SELECT AVG(MC_GBP_Billion) FROM Largest_banks");
        assert_eq!(queries[2], "SELECT Name FROM Largest_banks LIMIT 5");
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        set_env("BANKS_ETL_BANKS_URL", "fixtures/banks.html");
        set_env("BANKS_ETL_TABLE_NAME", "banks");
        set_env("BANKS_ETL_TIMEOUT_SECS", "5");
        set_env("BANKS_ETL_TABLE_INDEX", "0");

        let config = EtlConfig::from_env().unwrap();
        clear_env();

        assert_eq!(
            config.banks_source,
            DataSource::File(PathBuf::from("fixtures/banks.html"))
        );
        assert_eq!(config.table_name, "banks");
        assert_eq!(config.table_index, 0);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(
            config.rates_source,
            DataSource::Remote(DEFAULT_RATES_URL.to_string())
        );
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_number() {
        clear_env();
        set_env("BANKS_ETL_TIMEOUT_SECS", "soon");

        let result = EtlConfig::from_env();
        clear_env();

        assert!(matches!(result, Err(EtlError::Config(_))));
    }
}
