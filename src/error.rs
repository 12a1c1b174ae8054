//! Top-level error for the scanning pipeline
//!
//! Component errors convert in via From so the host binary can propagate
//! with `?` and render one readable message.

use thiserror::Error;

use crate::config::ConfigError;
use crate::data::DatasetError;
use crate::report::ReportError;

/// Any failure the scanner can exit with
#[derive(Error, Debug)]
pub enum ScanError {
    /// Startup configuration failure
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Malformed or unreadable dataset
    #[error("malformed input: {0}")]
    Dataset(#[from] DatasetError),

    /// Report rendering failure
    #[error("report error: {0}")]
    Report(#[from] ReportError),
}
