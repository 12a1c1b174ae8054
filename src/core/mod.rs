//! Core streaming classifier: trade types, batches, chains, and lanes

pub mod batch;
pub mod chain;
pub mod classifier;
pub mod types;

pub use batch::{Batch, Category, Outcome};
pub use chain::Chain;
pub use classifier::{Classifier, Detections, TradeFilter};
pub use types::{Side, Trade};
