//! Lazy streaming reader over a binary trade dataset
//!
//! Yields one decoded trade at a time; the dataset is never materialized.
//! Opening a file checks up front that its length is a whole number of
//! records, mirroring the producer contract of the dataset transform.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use super::error::DatasetError;
use super::record::{self, RECORD_SIZE};
use crate::core::types::Trade;

/// Streaming iterator of decoded trades
#[derive(Debug)]
pub struct TradeReader<R> {
    inner: R,
    next_index: u64,
    failed: bool,
}

impl TradeReader<BufReader<File>> {
    /// Open a dataset file, verifying its length up front
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        if len % RECORD_SIZE as u64 != 0 {
            return Err(DatasetError::TruncatedDataset {
                len,
                record_size: RECORD_SIZE,
            });
        }
        Ok(Self::new(BufReader::with_capacity(RECORD_SIZE * 1024, file)))
    }
}

impl<R: Read> TradeReader<R> {
    /// Wrap an arbitrary byte stream
    ///
    /// Without a known length, a short tail surfaces as `TruncatedRecord`
    /// instead of failing up front.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            next_index: 0,
            failed: false,
        }
    }

    fn read_block(&mut self) -> Option<Result<[u8; RECORD_SIZE], DatasetError>> {
        let mut block = [0u8; RECORD_SIZE];
        let mut filled = 0;
        while filled < RECORD_SIZE {
            match self.inner.read(&mut block[filled..]) {
                Ok(0) if filled == 0 => return None,
                Ok(0) => {
                    return Some(Err(DatasetError::TruncatedRecord {
                        got: filled,
                        record_size: RECORD_SIZE,
                    }));
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Some(Err(e.into())),
            }
        }
        Some(Ok(block))
    }
}

impl<R: Read> Iterator for TradeReader<R> {
    type Item = Result<Trade, DatasetError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let block = match self.read_block()? {
            Ok(block) => block,
            Err(e) => {
                self.failed = true;
                return Some(Err(e));
            }
        };

        let index = self.next_index;
        self.next_index += 1;
        match record::decode(&block, index) {
            Ok(trade) => Some(Ok(trade)),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
