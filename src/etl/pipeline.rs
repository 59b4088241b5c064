//! Pipeline orchestration for the ETL job

use super::{Extractor, Loader, Transformer};
use crate::client::SourceClient;
use crate::config::EtlConfig;
use crate::error::{EtlError, Result};
use crate::model::{ExchangeRates, RawTable};
use crate::progress::ProgressLog;
use crate::sources::SourceExtractor;
use crate::storage::{CsvWriter, QueryResult, QueryRunner, SqliteLoader};
use crate::transform::BanksTransformer;
use thiserror::Error;

/// Progress of one run. Each successful step moves one stage forward;
/// any error ends the run in `Failed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Started,
    Extracted,
    Transformed,
    Written,
    Loaded,
    Queried,
    Finished,
    Failed,
}

impl Stage {
    /// The stage reached after the current step succeeds
    pub fn next(self) -> Stage {
        match self {
            Stage::Started => Stage::Extracted,
            Stage::Extracted => Stage::Transformed,
            Stage::Transformed => Stage::Written,
            Stage::Written => Stage::Loaded,
            Stage::Loaded => Stage::Queried,
            Stage::Queried | Stage::Finished => Stage::Finished,
            Stage::Failed => Stage::Failed,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Finished | Stage::Failed)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Started => "started",
            Stage::Extracted => "extracted",
            Stage::Transformed => "transformed",
            Stage::Written => "written (csv)",
            Stage::Loaded => "loaded (db)",
            Stage::Queried => "queried",
            Stage::Finished => "finished",
            Stage::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Outcome of a successful run
#[derive(Debug)]
pub struct RunReport {
    pub stage: Stage,
    /// Rows written to the CSV file and the database table
    pub rows: usize,
    /// Each verification statement with its result
    pub queries: Vec<(String, QueryResult)>,
}

/// A failed run: the last stage reached and the error that stopped it
#[derive(Debug, Error)]
#[error("ETL job failed after reaching stage '{reached}': {source}")]
pub struct PipelineError {
    pub reached: Stage,
    #[source]
    pub source: EtlError,
}

/// ETL pipeline for the largest-banks job
///
/// Steps, in order, each logged to the progress log:
/// 1. Extract the banks table and the exchange rates
/// 2. Transform: select columns and add converted market caps
/// 3. Write the CSV file
/// 4. Replace the database table
/// 5. Run and print the verification queries
///
/// Nothing is retried and nothing is rolled back: outputs of earlier
/// successful stages stay in place when a later stage fails.
///
/// # Type Parameters
/// - `E`: Extractor producing the raw banks table and the rates
///
/// # Example
/// ```no_run
/// use banks_etl::config::EtlConfig;
/// use banks_etl::etl::Pipeline;
///
/// # async fn example() -> banks_etl::Result<()> {
/// let pipeline = Pipeline::from_config(&EtlConfig::default())?;
/// match pipeline.run().await {
///     Ok(report) => println!("Loaded {} banks", report.rows),
///     Err(e) => eprintln!("{}", e),
/// }
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<E = SourceExtractor> {
    extractor: E,
    transformer: BanksTransformer,
    csv: CsvWriter,
    db: SqliteLoader,
    queries: QueryRunner,
    statements: Vec<String>,
    progress: ProgressLog,
}

impl Pipeline<SourceExtractor> {
    /// Build the pipeline with network/file extraction from `config`
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built
    pub fn from_config(config: &EtlConfig) -> Result<Self> {
        config.validate()?;
        let progress = ProgressLog::new(&config.log_path);
        let client = SourceClient::try_new(config.request_timeout)?;
        let extractor = SourceExtractor::new(config, client, progress.clone());
        Ok(Self::with_progress(config, extractor, progress))
    }
}

impl<E> Pipeline<E>
where
    E: Extractor<Output = (RawTable, ExchangeRates)>,
{
    /// Build the pipeline around a custom extractor
    pub fn with_extractor(config: &EtlConfig, extractor: E) -> Self {
        Self::with_progress(config, extractor, ProgressLog::new(&config.log_path))
    }

    /// Build the pipeline around a custom extractor that records to `progress`
    pub fn with_progress(config: &EtlConfig, extractor: E, progress: ProgressLog) -> Self {
        Self {
            extractor,
            transformer: BanksTransformer::new(progress.clone()),
            csv: CsvWriter::new(&config.csv_path, progress.clone()),
            db: SqliteLoader::new(&config.db_path, &config.table_name, progress.clone()),
            queries: QueryRunner::new(&config.db_path, progress.clone()),
            statements: config.verification_queries().to_vec(),
            progress,
        }
    }

    pub fn progress(&self) -> &ProgressLog {
        &self.progress
    }

    /// Run the complete job
    ///
    /// # Errors
    /// Returns the first error raised by any stage, together with the last
    /// stage that completed
    pub async fn run(&self) -> std::result::Result<RunReport, PipelineError> {
        self.progress.log("ETL Job Started");

        let mut stage = Stage::Started;
        match self.run_stages(&mut stage).await {
            Ok(report) => {
                self.progress.log("ETL Job Finished Successfully");
                Ok(report)
            }
            Err(source) => {
                log::debug!("Stage {} -> {}", stage, Stage::Failed);
                self.progress.log(&format!("ETL Job Failed: {}", source));
                Err(PipelineError {
                    reached: stage,
                    source,
                })
            }
        }
    }

    async fn run_stages(&self, stage: &mut Stage) -> Result<RunReport> {
        // Extract
        let (banks, rates) = self.extractor.extract().await?;
        if banks.is_empty() {
            log::warn!("Banks table has no data rows");
        }
        advance(stage);

        // Transform
        let enriched = self.transformer.transform((banks, rates))?;
        advance(stage);

        // Load
        self.csv.load(&enriched).await?;
        advance(stage);
        let rows = self.db.load(&enriched).await?;
        advance(stage);

        // Verify
        let mut queries = Vec::with_capacity(self.statements.len());
        for statement in &self.statements {
            let result = self.queries.run_query(statement)?;
            println!("{}", statement);
            println!("{}", result);
            queries.push((statement.clone(), result));
        }
        advance(stage);
        advance(stage);

        Ok(RunReport {
            stage: *stage,
            rows,
            queries,
        })
    }
}

fn advance(stage: &mut Stage) {
    let next = stage.next();
    log::debug!("Stage {} -> {}", stage, next);
    *stage = next;
}
