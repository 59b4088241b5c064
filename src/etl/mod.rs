//! Core ETL (Extract, Transform, Load) abstractions
//!
//! This module provides the trait definitions the job's components implement
//! and the [`Pipeline`] that sequences them.

mod extract;
mod load;
mod pipeline;
mod transform;

pub use extract::Extractor;
pub use load::Loader;
pub use pipeline::{Pipeline, PipelineError, RunReport, Stage};
pub use transform::Transformer;
