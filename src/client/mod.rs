//! Source fetching.
//!
//! This module provides the [`SourceClient`] that reads a [`DataSource`]
//! either over HTTP(S) or from the local filesystem.
//!
//! [`DataSource`]: crate::config::DataSource

mod source;

pub use source::SourceClient;
