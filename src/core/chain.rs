//! Live-batch chains and the traversal driver
//!
//! One chain exists per (symbol, category) pair. Batches sit newest-parent
//! first: a trade that no batch consumes opens the new head. The chain is
//! an array-backed small vector with linear scan; per-chain populations
//! stay bounded by the accounts active inside one matching window, so
//! in-place removal and replacement keep the linked-traversal semantics
//! without node surgery.

use super::batch::{Batch, Category, Outcome};
use super::types::Trade;

/// Ordered live batches for one (symbol, category) pair
#[derive(Debug, Clone)]
pub struct Chain {
    category: Category,
    batches: Vec<Batch>,
}

impl Chain {
    /// Create an empty chain for a category
    pub fn new(category: Category) -> Self {
        Self {
            category,
            batches: Vec::new(),
        }
    }

    /// Number of live batches
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    /// Whether the chain holds no live batches
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Drive the chain with one incoming trade
    ///
    /// Walks head-first. Expired batches are unlinked as they are passed
    /// (pushed onto `completed` when they hold similars); a same-account
    /// hit closes the batch and splices a replacement parented at the
    /// incoming trade into the same position; an accepted trade stops the
    /// walk. A trade nothing consumed opens the new head.
    ///
    /// Every expired node is visited rather than pruned wholesale so none
    /// of its emissions are lost.
    pub fn submit(&mut self, trade: &Trade, completed: &mut Vec<Batch>) {
        let mut idx = 0;
        while idx < self.batches.len() {
            match self.batches[idx].submit(trade) {
                Outcome::Expired => {
                    let evicted = self.batches.remove(idx);
                    if !evicted.similar.is_empty() {
                        completed.push(evicted);
                    }
                    // The next batch shifted into this slot.
                }
                Outcome::SameAccount => {
                    let replacement = Batch::new(self.category, *trade);
                    let closed = std::mem::replace(&mut self.batches[idx], replacement);
                    if !closed.similar.is_empty() {
                        completed.push(closed);
                    }
                    return;
                }
                Outcome::CloseMismatch | Outcome::Rejected => idx += 1,
                Outcome::Accepted => return,
            }
        }

        self.batches.insert(0, Batch::new(self.category, *trade));
    }

    /// Sweep the surviving batches head-to-tail at end-of-stream
    pub fn drain_completed(&mut self, completed: &mut Vec<Batch>) {
        for batch in self.batches.drain(..) {
            if !batch.similar.is_empty() {
                completed.push(batch);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{MATCHING_WINDOW_MS, Side};

    fn trade(open_ts: u64, side: Side, account_id: u64) -> Trade {
        Trade {
            open_ts,
            close_ts: open_ts + 1_000,
            duration: 1_000,
            lot_size: 500_000_000,
            side,
            trade_id: open_ts,
            symbol: 0,
            account_id,
            user_id: 1,
        }
    }

    #[test]
    fn test_unmatched_trade_opens_new_head() {
        let mut chain = Chain::new(Category::Copy);
        let mut completed = Vec::new();

        chain.submit(&trade(1_000, Side::Long, 10), &mut completed);
        chain.submit(&trade(2_000, Side::Short, 11), &mut completed);

        // The short trade matched nothing and became the head.
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.batches[0].parent.side, Side::Short);
        assert_eq!(chain.batches[1].parent.side, Side::Long);
        assert!(completed.is_empty());
    }

    #[test]
    fn test_accepted_trade_stops_traversal() {
        let mut chain = Chain::new(Category::Copy);
        let mut completed = Vec::new();

        chain.submit(&trade(1_000, Side::Long, 10), &mut completed);
        chain.submit(&trade(2_000, Side::Long, 11), &mut completed);

        assert_eq!(chain.len(), 1);
        assert_eq!(chain.batches[0].similar.len(), 1);
    }

    #[test]
    fn test_expiry_evicts_and_emits() {
        let mut chain = Chain::new(Category::Copy);
        let mut completed = Vec::new();

        chain.submit(&trade(1_000, Side::Long, 10), &mut completed);
        chain.submit(&trade(2_000, Side::Long, 11), &mut completed);

        // Far past the window: the old batch is evicted with its similar
        // trade, and the incoming trade opens a fresh head.
        let late = trade(2_000 + MATCHING_WINDOW_MS + 1, Side::Long, 12);
        chain.submit(&late, &mut completed);

        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].parent.account_id, 10);
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.batches[0].parent.account_id, 12);
    }

    #[test]
    fn test_expired_empty_batch_is_discarded() {
        let mut chain = Chain::new(Category::Copy);
        let mut completed = Vec::new();

        chain.submit(&trade(1_000, Side::Long, 10), &mut completed);
        chain.submit(&trade(1_000 + MATCHING_WINDOW_MS + 1, Side::Long, 11), &mut completed);

        assert!(completed.is_empty());
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_same_account_replaces_in_place() {
        let mut chain = Chain::new(Category::Reversal);
        let mut completed = Vec::new();

        chain.submit(&trade(1_000, Side::Long, 10), &mut completed);
        chain.submit(&trade(1_500, Side::Long, 11), &mut completed);
        // Same side twice: no reversal match, so the head is now the
        // account-11 batch and the tail the account-10 one.

        // Same account as the tail batch: the tail is closed (it holds no
        // similars, so it is discarded) and replaced in position.
        chain.submit(&trade(2_000, Side::Long, 10), &mut completed);

        assert!(completed.is_empty());
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.batches[0].parent.open_ts, 1_500);
        assert_eq!(chain.batches[1].parent.open_ts, 2_000);
    }

    #[test]
    fn test_drain_keeps_chain_order() {
        let mut chain = Chain::new(Category::Copy);
        let mut completed = Vec::new();

        chain.submit(&trade(1_000, Side::Long, 10), &mut completed);
        chain.submit(&trade(1_200, Side::Short, 11), &mut completed);
        chain.submit(&trade(1_400, Side::Long, 12), &mut completed);
        chain.submit(&trade(1_600, Side::Short, 13), &mut completed);
        // Two batches each holding one similar, newest parent first.

        chain.drain_completed(&mut completed);
        assert_eq!(completed.len(), 2);
        assert_eq!(completed[0].parent.open_ts, 1_200);
        assert_eq!(completed[1].parent.open_ts, 1_000);
        assert!(chain.is_empty());
    }
}
