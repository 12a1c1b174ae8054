//! Binary dataset layer: record layout, streaming reader, input errors

pub mod error;
pub mod record;
pub mod reader;

pub use error::DatasetError;
pub use reader::TradeReader;
pub use record::RECORD_SIZE;
