//! CLI helper functions

use crate::{
    config::{DataSource, EtlConfig},
    etl::{Pipeline, RunReport},
};
use clap::Args;
use eyre::{Context, Result};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::time::Duration;

/// Command-line overrides, applied on top of environment variables
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// URL or path of the document holding the banks table
    #[arg(long)]
    pub banks_url: Option<String>,

    /// URL or path of the exchange-rate CSV
    #[arg(long)]
    pub rates_url: Option<String>,

    /// Zero-based position of the banks table among the document's tables
    #[arg(long)]
    pub table_index: Option<usize>,

    /// CSV file to write
    #[arg(long = "csv")]
    pub csv_path: Option<PathBuf>,

    /// SQLite database file to load
    #[arg(long = "db")]
    pub db_path: Option<PathBuf>,

    /// Database table to replace
    #[arg(long = "table")]
    pub table_name: Option<String>,

    /// Progress log file to append to
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long = "timeout")]
    pub timeout_secs: Option<u64>,
}

impl ConfigArgs {
    /// Overlay these arguments on `config`
    pub fn apply(self, mut config: EtlConfig) -> Result<EtlConfig> {
        if let Some(url) = self.banks_url {
            config.banks_source = DataSource::parse(&url)
                .with_context(|| format!("Invalid --banks-url: {}", url))?;
        }
        if let Some(url) = self.rates_url {
            config.rates_source = DataSource::parse(&url)
                .with_context(|| format!("Invalid --rates-url: {}", url))?;
        }
        if let Some(index) = self.table_index {
            config.table_index = index;
        }
        if let Some(path) = self.csv_path {
            config.csv_path = path;
        }
        if let Some(path) = self.db_path {
            config.db_path = path;
        }
        if let Some(name) = self.table_name {
            config.table_name = name;
        }
        if let Some(path) = self.log_file {
            config.log_path = path;
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

/// Load configuration from environment variables, then apply CLI overrides
///
/// Environment variables (all optional, see [`EtlConfig::from_env`]):
/// - BANKS_ETL_BANKS_URL, BANKS_ETL_RATES_URL, BANKS_ETL_TABLE_INDEX
/// - BANKS_ETL_CSV_PATH, BANKS_ETL_DB_PATH, BANKS_ETL_TABLE_NAME
/// - BANKS_ETL_LOG_FILE, BANKS_ETL_TIMEOUT_SECS
pub fn load_config(args: ConfigArgs) -> Result<EtlConfig> {
    let config = EtlConfig::from_env().context("Failed to load configuration from environment")?;
    args.apply(config)
}

/// Run the whole job once
///
/// Pipeline: SourceExtractor → BanksTransformer → CsvWriter → SqliteLoader → QueryRunner
pub async fn run_etl(config: &EtlConfig) -> Result<RunReport> {
    log::info!("Banks source: {}", config.banks_source.bright_black());
    log::info!("Rates source: {}", config.rates_source.bright_black());

    let pipeline = Pipeline::from_config(config).context("Failed to set up ETL pipeline")?;
    let report = pipeline.run().await?;

    log::info!(
        "✓ Loaded {} bank(s) to {} and {}:{}",
        report.rows.cyan(),
        config.csv_path.display().bright_black(),
        config.db_path.display().bright_black(),
        config.table_name.bright_black()
    );
    Ok(report)
}
