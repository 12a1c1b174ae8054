//! Fixed-width binary trade record layout
//!
//! Records are packed little-endian with no inter-field padding:
//!
//! ```text
//! offset  size  field
//!  0       8    open_ts     (u64, ms since epoch)
//!  8       8    close_ts    (u64, ms since epoch)
//! 16       8    duration    (u64, ms)
//! 24       8    lot_size    (u64, lots × 10^8)
//! 32       1    side        (u8, 0=Short, 1=Long)
//! 33       8    trade_id    (u64)
//! 41       4    symbol      (u32, index into symbol table)
//! 45       8    account_id  (u64)
//! 53       8    user_id     (u64)
//! ```
//!
//! The record size is the sum of the field widths. Both directions of the
//! codec live here so the generator and transformer write exactly what the
//! scanner reads.

use super::error::DatasetError;
use crate::core::types::{Side, Trade};

/// Size of one packed record in bytes
pub const RECORD_SIZE: usize = 61;

const OPEN_TS: usize = 0;
const CLOSE_TS: usize = 8;
const DURATION: usize = 16;
const LOT_SIZE: usize = 24;
const SIDE: usize = 32;
const TRADE_ID: usize = 33;
const SYMBOL: usize = 41;
const ACCOUNT_ID: usize = 45;
const USER_ID: usize = 53;

fn read_u64(block: &[u8; RECORD_SIZE], offset: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&block[offset..offset + 8]);
    u64::from_le_bytes(buf)
}

fn read_u32(block: &[u8; RECORD_SIZE], offset: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&block[offset..offset + 4]);
    u32::from_le_bytes(buf)
}

/// Decode one packed record
///
/// `index` is the zero-based record position, used only for error context.
pub fn decode(block: &[u8; RECORD_SIZE], index: u64) -> Result<Trade, DatasetError> {
    let side = Side::from_u8(block[SIDE]).ok_or(DatasetError::InvalidSide {
        value: block[SIDE],
        index,
    })?;

    Ok(Trade {
        open_ts: read_u64(block, OPEN_TS),
        close_ts: read_u64(block, CLOSE_TS),
        duration: read_u64(block, DURATION),
        lot_size: read_u64(block, LOT_SIZE),
        side,
        trade_id: read_u64(block, TRADE_ID),
        symbol: read_u32(block, SYMBOL),
        account_id: read_u64(block, ACCOUNT_ID),
        user_id: read_u64(block, USER_ID),
    })
}

/// Encode one trade into the packed record layout
pub fn encode(trade: &Trade) -> [u8; RECORD_SIZE] {
    let mut block = [0u8; RECORD_SIZE];
    block[OPEN_TS..OPEN_TS + 8].copy_from_slice(&trade.open_ts.to_le_bytes());
    block[CLOSE_TS..CLOSE_TS + 8].copy_from_slice(&trade.close_ts.to_le_bytes());
    block[DURATION..DURATION + 8].copy_from_slice(&trade.duration.to_le_bytes());
    block[LOT_SIZE..LOT_SIZE + 8].copy_from_slice(&trade.lot_size.to_le_bytes());
    block[SIDE] = trade.side.as_u8();
    block[TRADE_ID..TRADE_ID + 8].copy_from_slice(&trade.trade_id.to_le_bytes());
    block[SYMBOL..SYMBOL + 4].copy_from_slice(&trade.symbol.to_le_bytes());
    block[ACCOUNT_ID..ACCOUNT_ID + 8].copy_from_slice(&trade.account_id.to_le_bytes());
    block[USER_ID..USER_ID + 8].copy_from_slice(&trade.user_id.to_le_bytes());
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_size_matches_field_widths() {
        assert_eq!(RECORD_SIZE, 8 * 7 + 1 + 4);
        assert_eq!(USER_ID + 8, RECORD_SIZE);
    }

    #[test]
    fn test_encode_decode_agree() {
        let trade = Trade {
            open_ts: 1_692_000_000_123,
            close_ts: 1_692_000_060_456,
            duration: 60_333,
            lot_size: 1_250_000_000,
            side: Side::Long,
            trade_id: 987_654_321,
            symbol: 3,
            account_id: 42,
            user_id: 7,
        };

        let block = encode(&trade);
        assert_eq!(decode(&block, 0).unwrap(), trade);
    }

    #[test]
    fn test_fields_land_at_packed_offsets() {
        let trade = Trade {
            open_ts: 0x0102030405060708,
            close_ts: 0,
            duration: 0,
            lot_size: 0,
            side: Side::Short,
            trade_id: 0,
            symbol: 0xAABBCCDD,
            account_id: 0,
            user_id: 0x1122334455667788,
        };

        let block = encode(&trade);
        // Little-endian open timestamp at the front.
        assert_eq!(block[0], 0x08);
        assert_eq!(block[7], 0x01);
        // Symbol packed directly after the trade id, no padding.
        assert_eq!(&block[41..45], &[0xDD, 0xCC, 0xBB, 0xAA]);
        // User id fills the tail of the record.
        assert_eq!(block[53], 0x88);
        assert_eq!(block[60], 0x11);
    }

    #[test]
    fn test_invalid_side_byte_is_rejected() {
        let trade = Trade {
            open_ts: 0,
            close_ts: 0,
            duration: 0,
            lot_size: 0,
            side: Side::Short,
            trade_id: 0,
            symbol: 0,
            account_id: 0,
            user_id: 0,
        };

        let mut block = encode(&trade);
        block[32] = 7;
        assert!(matches!(
            decode(&block, 5),
            Err(DatasetError::InvalidSide { value: 7, index: 5 })
        ));
    }
}
