//! Error types for binary dataset decoding
//!
//! Everything here is the malformed-input family: fatal, reported to the
//! user, and never retried. Per-record recovery does not exist by
//! construction; the pipeline is a single pass.

use thiserror::Error;

/// Malformed or unreadable dataset input
#[derive(Error, Debug)]
pub enum DatasetError {
    /// File length is not a whole number of records
    #[error("dataset length {len} is not a multiple of the {record_size}-byte record size")]
    TruncatedDataset { len: u64, record_size: usize },

    /// The stream ended in the middle of a record
    #[error("dataset ends mid-record ({got} of {record_size} bytes)")]
    TruncatedRecord { got: usize, record_size: usize },

    /// Side byte is neither 0 (Short) nor 1 (Long)
    #[error("invalid side byte {value} in record {index} (expected 0=Short or 1=Long)")]
    InvalidSide { value: u8, index: u64 },

    /// Symbol index does not fit the loaded symbol table
    #[error("symbol index {symbol} out of range for a {table_len}-entry symbol table")]
    SymbolOutOfRange { symbol: u32, table_len: usize },

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
