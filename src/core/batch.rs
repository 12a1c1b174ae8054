//! Batches: one parent trade plus the similar trades it has absorbed
//!
//! A batch belongs to exactly one similarity category for its whole life.
//! Admission is a shared window/account screen followed by a short
//! category-specific rule, dispatched by a small match rather than a trait
//! hierarchy.

use super::types::{MATCHING_WINDOW_MS, Trade};

/// Similarity category a batch collects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Same direction within the matching window
    Copy,

    /// Opposite direction within the matching window
    Reversal,

    /// Lot size within a relative tolerance; direction is not consulted
    PartialCopy,
}

impl Category {
    /// Relative lot-size tolerance for partial copies (30%)
    pub const LOT_TOLERANCE: f64 = 0.30;
}

/// Outcome of submitting a trade to a batch, consumed by the chain driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The incoming trade is past the parent's matching window; the batch
    /// is due for eviction
    Expired,

    /// The incoming trade shares the parent's account; the batch is closed
    /// and replaced by one parented at the incoming trade
    SameAccount,

    /// Close-time window not met; leave the batch and keep walking
    CloseMismatch,

    /// The category rule turned the trade down; leave the batch and keep
    /// walking
    Rejected,

    /// The trade was appended to `similar`; traversal stops
    Accepted,
}

/// One parent trade plus its accepted similar trades, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Category this batch collects; never changes
    pub category: Category,

    /// The trade that opened the batch
    pub parent: Trade,

    /// Trades accepted after the parent, in arrival order
    pub similar: Vec<Trade>,
}

impl Batch {
    /// Open a new batch around a parent trade
    pub fn new(category: Category, parent: Trade) -> Self {
        Self {
            category,
            parent,
            similar: Vec::new(),
        }
    }

    /// Window and account screen shared by every category
    ///
    /// The close gap is effectively signed: a similar trade that closes
    /// before the parent is inside the window, only a gap beyond +W fails.
    fn screen(&self, new: &Trade) -> Option<Outcome> {
        if new.open_ts.saturating_sub(self.parent.open_ts) > MATCHING_WINDOW_MS {
            return Some(Outcome::Expired);
        }
        if new.account_id == self.parent.account_id {
            return Some(Outcome::SameAccount);
        }
        if new.close_ts.saturating_sub(self.parent.close_ts) > MATCHING_WINDOW_MS {
            return Some(Outcome::CloseMismatch);
        }
        None
    }

    /// Submit a trade to this batch; `Accepted` appends it to `similar`
    pub fn submit(&mut self, new: &Trade) -> Outcome {
        let screened = self.screen(new);

        let accepted = match self.category {
            Category::Copy => {
                let same_side = new.side == self.parent.side;
                match screened {
                    // A same-account trade on the same side is
                    // uninformative and must not close the batch; with
                    // sides differing, SameAccount stands and the batch
                    // is replaced.
                    Some(Outcome::SameAccount) if same_side => return Outcome::Rejected,
                    Some(outcome) => return outcome,
                    None => same_side,
                }
            }
            Category::Reversal => match screened {
                Some(outcome) => return outcome,
                None => new.side != self.parent.side,
            },
            Category::PartialCopy => match screened {
                Some(outcome) => return outcome,
                None => {
                    let ratio = new.lot_size as f64 / self.parent.lot_size as f64;
                    (ratio - 1.0).abs() <= Category::LOT_TOLERANCE
                }
            },
        };

        if accepted {
            self.similar.push(*new);
            Outcome::Accepted
        } else {
            Outcome::Rejected
        }
    }
}
