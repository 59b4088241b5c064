//! Source client module
//!
//! Provides `SourceClient` for reading the raw documents the job extracts from.

use crate::config::DataSource;
use crate::error::{EtlError, ExtractionError};
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("banks-etl/", env!("CARGO_PKG_VERSION"));

/// Client for fetching source documents.
///
/// Remote sources are fetched with a single GET request (no retries),
/// local sources are read from disk.
///
/// # Example
/// ```no_run
/// use banks_etl::client::SourceClient;
/// use banks_etl::config::DataSource;
/// use std::time::Duration;
///
/// # async fn example() -> banks_etl::Result<()> {
/// let client = SourceClient::try_new(Duration::from_secs(30))?;
/// let source = DataSource::parse("https://example.com/exchange_rate.csv")?;
/// let body = client.fetch_text(&source).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct SourceClient {
    client: Client,
}

impl SourceClient {
    /// Create a client whose requests give up after `timeout`
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn try_new(timeout: Duration) -> Result<Self, EtlError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| EtlError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Fetch a source as text
    ///
    /// # Errors
    /// Returns an error if the request fails, the server answers with a
    /// non-success status, or the file cannot be read
    pub async fn fetch_text(&self, source: &DataSource) -> Result<String, ExtractionError> {
        match source {
            DataSource::Remote(url) => self.get(url).await,
            DataSource::File(path) => {
                log::debug!("Reading {}", path.display());
                std::fs::read_to_string(path).map_err(|source| ExtractionError::File {
                    path: path.clone(),
                    source,
                })
            }
        }
    }

    async fn get(&self, url: &str) -> Result<String, ExtractionError> {
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ExtractionError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| ExtractionError::Request {
                url: url.to_string(),
                source,
            })?;

        log::debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
