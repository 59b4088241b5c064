//! Extractor trait for pulling raw data from a source

use crate::error::Result;

/// Extractor trait for extracting data from a source
///
/// Implementors define how to pull one dataset from a source like:
/// - An HTML document holding several tables
/// - A CSV resource
/// - An in-memory fixture (in tests)
///
/// # Example
/// ```no_run
/// use banks_etl::etl::Extractor;
/// use banks_etl::Result;
/// use std::path::PathBuf;
///
/// struct FileExtractor {
///     path: PathBuf,
/// }
///
/// impl Extractor for FileExtractor {
///     type Output = String;
///
///     async fn extract(&self) -> Result<Self::Output> {
///         Ok(String::new())
///     }
/// }
/// ```
pub trait Extractor: Send + Sync {
    /// The dataset produced by this extractor
    type Output: Send;

    /// Extract the dataset from the source
    ///
    /// # Errors
    /// Returns an error if extraction fails (network, I/O, parsing, etc.)
    fn extract(&self) -> impl std::future::Future<Output = Result<Self::Output>> + Send;
}
