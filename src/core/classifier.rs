//! The streaming classifier: pre-filter plus three category lanes
//!
//! Each admitted trade drives the Copy, Reversal, and PartialCopy chains
//! of its symbol, in that fixed order. The three drives are independent;
//! one trade may be consumed by zero to three categories in the same pass.

use tracing::warn;

use super::batch::{Batch, Category};
use super::chain::Chain;
use super::types::{MIN_LOT_SIZE, MIN_TRADE_DURATION_MS, Trade};
use crate::data::DatasetError;

/// First-level trade filter for the two users under comparison
#[derive(Debug, Clone, Copy)]
pub struct TradeFilter {
    user_a: u64,
    user_b: u64,
}

impl TradeFilter {
    /// Build a filter for two user ids
    pub fn new(user_a: u64, user_b: u64) -> Self {
        Self { user_a, user_b }
    }

    /// Whether a trade survives the first-level filter
    ///
    /// Keeps trades of the two users, minus those that are both brief and
    /// tiny. The conjunction matters: a long tiny trade and a brief large
    /// trade both pass.
    pub fn admits(&self, trade: &Trade) -> bool {
        if trade.user_id != self.user_a && trade.user_id != self.user_b {
            return false;
        }
        !(trade.duration <= MIN_TRADE_DURATION_MS && trade.lot_size < MIN_LOT_SIZE)
    }
}

/// Per-category state: one chain and one result bucket per symbol
#[derive(Debug)]
struct Lane {
    chains: Vec<Chain>,
    completed: Vec<Vec<Batch>>,
}

impl Lane {
    fn new(category: Category, symbol_count: usize) -> Self {
        Self {
            chains: (0..symbol_count).map(|_| Chain::new(category)).collect(),
            completed: vec![Vec::new(); symbol_count],
        }
    }

    fn submit(&mut self, trade: &Trade) {
        let symbol = trade.symbol as usize;
        self.chains[symbol].submit(trade, &mut self.completed[symbol]);
    }

    /// Promote the surviving batches and hand back the per-symbol buckets:
    /// scan-time evictions in eviction order, then chain order.
    fn finish(mut self) -> Vec<Vec<Batch>> {
        for (chain, bucket) in self.chains.iter_mut().zip(self.completed.iter_mut()) {
            chain.drain_completed(bucket);
        }
        self.completed
    }
}

/// Completed groupings per category, bucketed by symbol index
#[derive(Debug)]
pub struct Detections {
    /// Same-direction groupings
    pub copy: Vec<Vec<Batch>>,

    /// Opposite-direction groupings
    pub reversal: Vec<Vec<Batch>>,

    /// Lot-tolerance groupings
    pub partial_copy: Vec<Vec<Batch>>,
}

/// Streaming trade classifier over a time-sorted input
///
/// Input is assumed sorted by `open_ts`; that contract belongs to the
/// upstream dataset transform. A regression is reported once as a warning
/// and processing continues.
#[derive(Debug)]
pub struct Classifier {
    filter: TradeFilter,
    symbol_count: usize,
    copy: Lane,
    reversal: Lane,
    partial_copy: Lane,
    last_open_ts: u64,
    order_warned: bool,
}

impl Classifier {
    /// Create a classifier for a symbol table of `symbol_count` entries,
    /// comparing trades of `user_a` against `user_b`
    pub fn new(symbol_count: usize, user_a: u64, user_b: u64) -> Self {
        Self {
            filter: TradeFilter::new(user_a, user_b),
            symbol_count,
            copy: Lane::new(Category::Copy, symbol_count),
            reversal: Lane::new(Category::Reversal, symbol_count),
            partial_copy: Lane::new(Category::PartialCopy, symbol_count),
            last_open_ts: 0,
            order_warned: false,
        }
    }

    /// Feed one decoded trade through the pre-filter and the three lanes
    ///
    /// A symbol index outside the table is malformed input and fatal.
    pub fn submit(&mut self, trade: &Trade) -> Result<(), DatasetError> {
        if trade.symbol as usize >= self.symbol_count {
            return Err(DatasetError::SymbolOutOfRange {
                symbol: trade.symbol,
                table_len: self.symbol_count,
            });
        }

        if !self.filter.admits(trade) {
            return Ok(());
        }

        if trade.open_ts < self.last_open_ts && !self.order_warned {
            warn!(
                trade_id = trade.trade_id,
                open_ts = trade.open_ts,
                last_open_ts = self.last_open_ts,
                "input stream is not sorted by open timestamp; expiry decisions may be off"
            );
            self.order_warned = true;
        }
        self.last_open_ts = self.last_open_ts.max(trade.open_ts);

        self.copy.submit(trade);
        self.reversal.submit(trade);
        self.partial_copy.submit(trade);
        Ok(())
    }

    /// End the stream: sweep every chain and return the result sets
    pub fn finish(self) -> Detections {
        Detections {
            copy: self.copy.finish(),
            reversal: self.reversal.finish(),
            partial_copy: self.partial_copy.finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Side;

    fn trade(open_ts: u64, symbol: u32, side: Side, account_id: u64, user_id: u64) -> Trade {
        Trade {
            open_ts,
            close_ts: open_ts + 2_000,
            duration: 2_000,
            lot_size: 500_000_000,
            side,
            trade_id: open_ts,
            symbol,
            account_id,
            user_id,
        }
    }

    #[test]
    fn test_filter_admission() {
        let filter = TradeFilter::new(1, 2);

        let mut admitted = trade(1_000, 0, Side::Long, 10, 1);
        assert!(filter.admits(&admitted));

        admitted.user_id = 3;
        assert!(!filter.admits(&admitted));

        // Brief AND tiny: dropped.
        let mut brief_tiny = trade(1_000, 0, Side::Long, 10, 2);
        brief_tiny.duration = 500;
        brief_tiny.lot_size = 100_000;
        assert!(!filter.admits(&brief_tiny));

        // Brief but sizable: kept.
        brief_tiny.lot_size = MIN_LOT_SIZE;
        assert!(filter.admits(&brief_tiny));

        // Tiny but long-lived: kept.
        brief_tiny.lot_size = 100_000;
        brief_tiny.duration = 5_000;
        assert!(filter.admits(&brief_tiny));
    }

    #[test]
    fn test_symbol_out_of_range_is_fatal() {
        let mut classifier = Classifier::new(2, 1, 2);
        let bad = trade(1_000, 2, Side::Long, 10, 1);
        assert!(matches!(
            classifier.submit(&bad),
            Err(DatasetError::SymbolOutOfRange { symbol: 2, table_len: 2 })
        ));
    }

    #[test]
    fn test_symbols_are_classified_independently() {
        let mut classifier = Classifier::new(2, 1, 2);

        classifier.submit(&trade(1_000, 0, Side::Long, 10, 1)).unwrap();
        // Same shape on another symbol: no cross-talk.
        classifier.submit(&trade(2_000, 1, Side::Long, 11, 2)).unwrap();
        classifier.submit(&trade(3_000, 0, Side::Long, 12, 2)).unwrap();

        let detections = classifier.finish();
        assert_eq!(detections.copy[0].len(), 1);
        assert_eq!(detections.copy[0][0].parent.account_id, 10);
        assert_eq!(detections.copy[0][0].similar.len(), 1);
        assert!(detections.copy[1].is_empty());
    }

    #[test]
    fn test_one_trade_can_match_all_three_lanes() {
        let mut classifier = Classifier::new(1, 1, 2);

        classifier.submit(&trade(1_000, 0, Side::Long, 10, 1)).unwrap();
        classifier.submit(&trade(2_000, 0, Side::Long, 11, 2)).unwrap();
        classifier.submit(&trade(3_000, 0, Side::Short, 12, 2)).unwrap();

        let detections = classifier.finish();
        // Copy: the long pair. Reversal: short against the long parent.
        // PartialCopy: both laters (equal lots, side ignored).
        assert_eq!(detections.copy[0][0].similar.len(), 1);
        assert_eq!(detections.reversal[0][0].similar.len(), 1);
        assert_eq!(detections.partial_copy[0][0].similar.len(), 2);
    }
}
