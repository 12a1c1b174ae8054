//! CSV report rendering for detected trade groupings
//!
//! One file per category, one row per (parent, similar) pair. Column
//! titles and cell formats are part of the external contract: raw integer
//! lots and timestamps, symbol names from the loaded table, sides as
//! Short/Long. Mode B appends a Violation column.

use std::fs;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use thiserror::Error;
use tracing::debug;

use crate::core::batch::Batch;

const BASE_COLUMNS: [&str; 15] = [
    "Trade ID A",
    "Trade ID B",
    "User ID A",
    "User ID B",
    "Account ID A",
    "Account ID B",
    "Symbol",
    "Side A",
    "Side B",
    "Lot size A",
    "Lot size B",
    "Trade open date A",
    "Trade close date A",
    "Trade open date B",
    "Trade close date B",
];

/// Per-report counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportTotals {
    /// Trades involved in the report: per batch, the parent plus its
    /// similars
    pub matches: usize,

    /// Rows whose parent and similar share a user (mode B only)
    pub violations: usize,
}

/// Writes category reports under a results directory
#[derive(Debug)]
pub struct ReportWriter {
    out_dir: PathBuf,
    violation_column: bool,
}

impl ReportWriter {
    /// Create a writer rooted at `out_dir`
    pub fn new(out_dir: impl Into<PathBuf>, violation_column: bool) -> Self {
        Self {
            out_dir: out_dir.into(),
            violation_column,
        }
    }

    /// Path a named report renders to
    pub fn report_path(&self, name: &str) -> PathBuf {
        self.out_dir.join(format!("{name}.csv"))
    }

    /// Render one category report
    ///
    /// `buckets` is indexed by symbol; bucket order inside a symbol is the
    /// classifier's emission order and is preserved row for row.
    pub fn write(
        &self,
        name: &str,
        buckets: &[Vec<Batch>],
        symbols: &[String],
    ) -> Result<ReportTotals, ReportError> {
        fs::create_dir_all(&self.out_dir).map_err(|source| ReportError::CreateDir {
            path: self.out_dir.clone(),
            source,
        })?;

        let path = self.report_path(name);
        let mut writer = WriterBuilder::new().from_path(&path)?;

        let mut header: Vec<&str> = BASE_COLUMNS.to_vec();
        if self.violation_column {
            header.push("Violation");
        }
        writer.write_record(&header)?;

        let mut totals = ReportTotals::default();
        for (symbol, batches) in buckets.iter().enumerate() {
            let symbol_name = &symbols[symbol];
            for batch in batches {
                let parent = &batch.parent;
                totals.matches += 1 + batch.similar.len();

                for similar in &batch.similar {
                    let mut row = vec![
                        parent.trade_id.to_string(),
                        similar.trade_id.to_string(),
                        parent.user_id.to_string(),
                        similar.user_id.to_string(),
                        parent.account_id.to_string(),
                        similar.account_id.to_string(),
                        symbol_name.clone(),
                        parent.side.to_string(),
                        similar.side.to_string(),
                        parent.lot_size.to_string(),
                        similar.lot_size.to_string(),
                        parent.open_ts.to_string(),
                        similar.open_ts.to_string(),
                        parent.close_ts.to_string(),
                        similar.close_ts.to_string(),
                    ];

                    if self.violation_column {
                        let violation = similar.user_id == parent.user_id;
                        if violation {
                            totals.violations += 1;
                        }
                        row.push(if violation { "Yes" } else { "No" }.to_string());
                    }

                    writer.write_record(&row)?;
                }
            }
        }

        writer.flush()?;
        debug!(report = %path.display(), matches = totals.matches, "report written");
        Ok(totals)
    }
}

/// Report rendering errors
#[derive(Error, Debug)]
pub enum ReportError {
    /// Results directory could not be created
    #[error("failed to create report directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// CSV serialization failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Default directory the category reports render into
pub fn results_dir() -> &'static Path {
    Path::new("results")
}
