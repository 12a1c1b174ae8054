//! Trade-mirroring detection over time-ordered binary trade streams.
//!
//! This crate scans a finite, time-sorted stream of closed trades and
//! classifies every qualifying trade against recent trades of the same
//! instrument into three overlapping similarity categories:
//!
//! - **Copy**: same direction within the matching window
//! - **Reversal**: opposite direction within the matching window
//! - **PartialCopy**: lot size within a 30% relative tolerance
//!
//! Each detected grouping pairs a parent trade with the later similar
//! trades that fell inside a five-minute window on both the open and close
//! timestamps. Groupings complete when their window expires mid-stream or
//! at end-of-stream, and render to one CSV report per category.
//!
//! ## Basic Usage
//!
//! ```rust
//! use mirrorscan::{Classifier, Side, Trade};
//!
//! // Compare users 1 and 2 over a one-symbol table
//! let mut classifier = Classifier::new(1, 1, 2);
//!
//! let trade = Trade {
//!     open_ts: 1_000,
//!     close_ts: 61_000,
//!     duration: 60_000,
//!     lot_size: 500_000_000,
//!     side: Side::Long,
//!     trade_id: 1,
//!     symbol: 0,
//!     account_id: 10,
//!     user_id: 1,
//! };
//! classifier.submit(&trade).unwrap();
//!
//! // A lone trade matches nothing.
//! let detections = classifier.finish();
//! assert!(detections.copy[0].is_empty());
//! ```
//!
//! ## Pipeline
//!
//! Binary records decode lazily ([`data::TradeReader`]), pass the
//! two-user pre-filter, and drive per-symbol batch chains ([`Chain`])
//! for the three categories. [`report::ReportWriter`] renders the
//! completed groupings.

pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod report;

pub use crate::config::{Config, ConfigError, Mode};
pub use crate::core::batch::{Batch, Category, Outcome};
pub use crate::core::chain::Chain;
pub use crate::core::classifier::{Classifier, Detections, TradeFilter};
pub use crate::core::types::{
    LOT_SCALE, MATCHING_WINDOW_MS, MIN_LOT_SIZE, MIN_TRADE_DURATION_MS, Side, Trade,
};
pub use crate::data::{DatasetError, RECORD_SIZE, TradeReader};
pub use crate::error::ScanError;
pub use crate::report::{ReportError, ReportTotals, ReportWriter};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
