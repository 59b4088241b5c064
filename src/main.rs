use banks_etl::cli::{ConfigArgs, load_config, run_etl};
use clap::{Parser, builder::styling};
use eyre::Result;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Banks ETL: pull the largest banks by market cap, convert to GBP/EUR/INR,
/// and load the result into a CSV file and a SQLite table
#[derive(Parser)]
#[command(name = "banks-etl", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source settings from (ignored if missing)
    #[arg(short, long, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long)]
    debug: bool,

    #[command(flatten)]
    config: ConfigArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Err(e) = dotenvy::from_filename(&cli.env)
        && !e.not_found()
    {
        return Err(e.into());
    }

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    let config = load_config(cli.config)?;
    log::debug!("Configuration: {:?}", config);

    run_etl(&config).await?;
    Ok(())
}
