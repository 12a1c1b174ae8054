//! Type definitions for trade-mirroring detection

use serde::{Deserialize, Serialize};
use std::fmt;

/// Matching window on both open and close timestamps (5 minutes in ms)
pub const MATCHING_WINDOW_MS: u64 = 5 * 60 * 1000;

/// Duration at or below which a trade counts as brief (1 second in ms)
pub const MIN_TRADE_DURATION_MS: u64 = 1000;

/// Lot size below which a trade counts as tiny (0.01 lots at the 10^8 scale)
pub const MIN_LOT_SIZE: u64 = 1_000_000;

/// Fixed-point scale for lot sizes (lots × 10^8)
pub const LOT_SCALE: u64 = 100_000_000;

/// Direction of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    /// Sell position (wire value 0)
    Short = 0,

    /// Buy position (wire value 1)
    Long = 1,
}

impl Side {
    /// Decode the wire byte; values other than 0/1 are malformed input
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::Short),
            1 => Some(Side::Long),
            _ => None,
        }
    }

    /// Wire byte for this side
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Short => f.write_str("Short"),
            Side::Long => f.write_str("Long"),
        }
    }
}

/// One closed trade from the input stream
///
/// Scanned once by the classifier and copied into batches on acceptance.
/// `duration` is carried verbatim from the record even though it is
/// redundant with `close_ts - open_ts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Open timestamp in milliseconds since epoch
    pub open_ts: u64,

    /// Close timestamp in milliseconds since epoch
    pub close_ts: u64,

    /// Position lifetime in milliseconds
    pub duration: u64,

    /// Lot count scaled by 10^8
    pub lot_size: u64,

    /// Trade direction
    pub side: Side,

    /// Opaque identifier, unique within the input
    pub trade_id: u64,

    /// Index into the external symbol-name table
    pub symbol: u32,

    /// Trading account; many accounts may share a user
    pub account_id: u64,

    /// Owning user
    pub user_id: u64,
}
