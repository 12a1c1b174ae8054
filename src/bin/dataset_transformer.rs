//! Broker-export transformer.
//!
//! Assembles the binary trade dataset from raw broker CSV exports plus an
//! accounts CSV mapping trading accounts to users. Records are sorted by
//! time before writing (the scanner's input contract) and the symbol
//! table is collected in first-seen order and written as JSON.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::exit;

use chrono::NaiveDateTime;
use clap::Parser;
use thiserror::Error;
use tracing::info;

use mirrorscan::data::record;
use mirrorscan::{Side, Trade};

/// Column layout of the broker trade export
const COL_TRADE_ID: usize = 1;
const COL_ACTION: usize = 2;
const COL_LOT_SIZE: usize = 7;
const COL_OPENED_AT: usize = 8;
const COL_CLOSED_AT: usize = 9;
const COL_SYMBOL: usize = 15;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

#[derive(Debug, Parser)]
#[command(name = "dataset-transformer")]
#[command(about = "Assemble a binary trade dataset from broker CSV exports")]
struct Args {
    /// Output dataset file
    output: PathBuf,

    /// Accounts CSV (account id first, user id second to last)
    accounts: PathBuf,

    /// Broker trade export CSVs
    #[arg(required = true)]
    trades: Vec<PathBuf>,

    /// Where to write the collected symbol table
    #[arg(long, default_value = "symbols.json")]
    symbols_out: PathBuf,
}

#[derive(Error, Debug)]
enum TransformError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{}: record {record} has no column {column}", file.display())]
    MissingColumn {
        file: PathBuf,
        record: u64,
        column: usize,
    },

    #[error("{}: record {record}: bad {field} value '{value}'", file.display())]
    BadField {
        file: PathBuf,
        record: u64,
        field: &'static str,
        value: String,
    },

    #[error("no user mapping for account {account_id}")]
    UnknownAccount { account_id: u64 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("failed to transform dataset: {e}");
        exit(1);
    }
}

fn run(args: &Args) -> Result<(), TransformError> {
    let users_by_account = load_accounts(&args.accounts)?;
    info!(accounts = users_by_account.len(), "account map loaded");

    let mut symbols: Vec<String> = Vec::new();
    let mut symbol_indexes: HashMap<String, u32> = HashMap::new();
    let mut trades: Vec<Trade> = Vec::new();

    for path in &args.trades {
        let before = trades.len();
        load_export(path, &users_by_account, &mut symbols, &mut symbol_indexes, &mut trades)?;
        info!(file = %path.display(), trades = trades.len() - before, "export read");
    }

    // The scanner relies on a time-sorted stream; order ties the way the
    // upstream pipeline always has (full-record lexicographic).
    trades.sort_by_key(|t| {
        (
            t.open_ts,
            t.close_ts,
            t.duration,
            t.lot_size,
            t.side.as_u8(),
            t.trade_id,
            t.symbol,
            t.account_id,
            t.user_id,
        )
    });

    let mut out = BufWriter::new(File::create(&args.output)?);
    for trade in &trades {
        out.write_all(&record::encode(trade))?;
    }
    out.flush()?;

    serde_json::to_writer(File::create(&args.symbols_out)?, &symbols)?;

    println!(
        "Wrote {} trades ({} symbols) to {}",
        trades.len(),
        symbols.len(),
        args.output.display()
    );
    Ok(())
}

/// Read the accounts CSV into an account → user map
fn load_accounts(path: &Path) -> Result<HashMap<u64, u64>, TransformError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut map = HashMap::new();
    for (index, result) in reader.records().enumerate() {
        let row = result?;
        let record = index as u64;

        let account_id = parse_u64(path, record, "account id", field(path, record, &row, 0)?)?;
        // User id sits second to last; exports append trailing columns.
        let user_column = row.len().saturating_sub(2);
        let user_id = parse_u64(path, record, "user id", field(path, record, &row, user_column)?)?;
        map.insert(account_id, user_id);
    }
    Ok(map)
}

/// Read one broker trade export, interning symbols as they appear
fn load_export(
    path: &Path,
    users_by_account: &HashMap<u64, u64>,
    symbols: &mut Vec<String>,
    symbol_indexes: &mut HashMap<String, u32>,
    trades: &mut Vec<Trade>,
) -> Result<(), TransformError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    for (index, result) in reader.records().enumerate() {
        let row = result?;
        let record = index as u64;

        let trade_id = parse_u64(path, record, "trade id", field(path, record, &row, COL_TRADE_ID)?)?;
        let action = field(path, record, &row, COL_ACTION)?;
        let side = action
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(Side::from_u8)
            .ok_or_else(|| TransformError::BadField {
                file: path.to_path_buf(),
                record,
                field: "action",
                value: action.to_string(),
            })?;

        let lot_size = parse_lot(path, record, field(path, record, &row, COL_LOT_SIZE)?)?;
        let open_ts = parse_timestamp(path, record, field(path, record, &row, COL_OPENED_AT)?)?;
        let close_ts = parse_timestamp(path, record, field(path, record, &row, COL_CLOSED_AT)?)?;

        let symbol_name = field(path, record, &row, COL_SYMBOL)?;
        let symbol = match symbol_indexes.get(symbol_name) {
            Some(&index) => index,
            None => {
                let index = symbols.len() as u32;
                symbols.push(symbol_name.to_string());
                symbol_indexes.insert(symbol_name.to_string(), index);
                index
            }
        };

        // Trading account login is the last column.
        let account_column = row.len().saturating_sub(1);
        let account_id =
            parse_u64(path, record, "account id", field(path, record, &row, account_column)?)?;
        let user_id = *users_by_account
            .get(&account_id)
            .ok_or(TransformError::UnknownAccount { account_id })?;

        trades.push(Trade {
            open_ts,
            close_ts,
            duration: close_ts.saturating_sub(open_ts),
            lot_size,
            side,
            trade_id,
            symbol,
            account_id,
            user_id,
        });
    }
    Ok(())
}

fn field<'r>(
    path: &Path,
    record: u64,
    row: &'r csv::StringRecord,
    column: usize,
) -> Result<&'r str, TransformError> {
    row.get(column).ok_or_else(|| TransformError::MissingColumn {
        file: path.to_path_buf(),
        record,
        column,
    })
}

fn parse_u64(
    path: &Path,
    record: u64,
    name: &'static str,
    value: &str,
) -> Result<u64, TransformError> {
    value.trim().parse().map_err(|_| TransformError::BadField {
        file: path.to_path_buf(),
        record,
        field: name,
        value: value.to_string(),
    })
}

/// Decimal lot count → fixed point at the 10^8 scale
fn parse_lot(path: &Path, record: u64, value: &str) -> Result<u64, TransformError> {
    let lots: f64 = value.trim().parse().map_err(|_| TransformError::BadField {
        file: path.to_path_buf(),
        record,
        field: "lot size",
        value: value.to_string(),
    })?;
    Ok((lots * 1e8).round() as u64)
}

/// Broker timestamp → epoch milliseconds
fn parse_timestamp(path: &Path, record: u64, value: &str) -> Result<u64, TransformError> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
        .ok()
        .and_then(|dt| u64::try_from(dt.and_utc().timestamp_millis()).ok())
        .ok_or_else(|| TransformError::BadField {
            file: path.to_path_buf(),
            record,
            field: "timestamp",
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> PathBuf {
        PathBuf::from("test.csv")
    }

    #[test]
    fn test_timestamp_to_epoch_millis() {
        let ms = parse_timestamp(&path(), 0, "2024-03-01 12:30:45.250").unwrap();
        assert_eq!(ms % 1_000, 250);
        assert_eq!(ms, 1_709_296_245_250);

        assert!(parse_timestamp(&path(), 0, "not a date").is_err());
    }

    #[test]
    fn test_lot_fixed_point_conversion() {
        assert_eq!(parse_lot(&path(), 0, "0.01").unwrap(), 1_000_000);
        assert_eq!(parse_lot(&path(), 0, "2.5").unwrap(), 250_000_000);
        assert!(parse_lot(&path(), 0, "lots").is_err());
    }
}
