//! Loader trait for persisting data to destinations

use crate::error::Result;

/// Loader trait for loading data to a destination
///
/// Implementors define how to persist items:
/// - Flat files
/// - Databases
///
/// Loaders borrow the items so the same table can be written to several
/// destinations.
///
/// # Example
/// ```no_run
/// use banks_etl::etl::Loader;
/// use banks_etl::Result;
/// use std::path::PathBuf;
///
/// struct FileLoader {
///     output: PathBuf,
/// }
///
/// impl Loader for FileLoader {
///     type Item = String;
///
///     async fn load(&self, items: &[Self::Item]) -> Result<usize> {
///         Ok(items.len())
///     }
/// }
/// ```
pub trait Loader: Send + Sync {
    /// The type of items to load
    type Item: Sync;

    /// Load items to the destination
    ///
    /// Returns the number of items written
    ///
    /// # Errors
    /// Returns an error if loading fails (I/O, schema, constraint, etc.)
    fn load(
        &self,
        items: &[Self::Item],
    ) -> impl std::future::Future<Output = Result<usize>> + Send;
}
