//! Seeded synthetic dataset generator.
//!
//! Emits a time-sorted binary trade dataset for exercising the scanner.
//! The same seed always produces the same dataset.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use mirrorscan::data::record;
use mirrorscan::{Side, Trade};

#[derive(Debug, Parser)]
#[command(name = "dataset-generator")]
#[command(about = "Generate a seeded synthetic binary trade dataset")]
struct Args {
    /// RNG seed; identical seeds produce identical datasets
    seed: u64,

    /// Hours of stream time to cover
    hours: u64,

    /// Output dataset file
    #[arg(long, default_value = "dataset.bin")]
    output: PathBuf,
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
        eprintln!("failed to generate dataset: {e}");
        exit(1);
    }
}

fn run(args: &Args) -> Result<(), std::io::Error> {
    let mut rng = StdRng::seed_from_u64(args.seed);

    // Account and user pools; several accounts usually map onto one user.
    let account_count = rng.gen_range(10..=1000);
    let account_ids: Vec<u64> = (0..account_count).map(|_| rng.gen_range(0..=100)).collect();
    let user_count = rng.gen_range(1..=account_ids.len().min(100));
    let user_ids: Vec<u64> = (0..user_count).map(|_| rng.gen_range(0..=100)).collect();
    info!(accounts = account_ids.len(), users = ?user_ids, "pools drawn");

    let horizon_ms = args.hours * 60 * 60 * 1000;
    let mut out = BufWriter::new(File::create(&args.output)?);

    let mut open_ts: u64 = 0;
    let mut trade_id: u64 = 0;
    while open_ts < horizon_ms {
        open_ts += rng.gen_range(10..=20_000);
        let close_ts = open_ts + rng.gen_range(100..=60 * 60 * 1000);

        let trade = Trade {
            open_ts,
            close_ts,
            duration: close_ts - open_ts,
            lot_size: rng.gen_range(100_000..=100 * 100_000_000),
            side: if rng.gen_range(0..=1) == 1 { Side::Long } else { Side::Short },
            trade_id,
            symbol: rng.gen_range(0..=4),
            account_id: account_ids[rng.gen_range(0..account_ids.len())],
            user_id: user_ids[rng.gen_range(0..user_ids.len())],
        };

        out.write_all(&record::encode(&trade))?;
        trade_id += 1;
        if trade_id % 1_000_000 == 0 {
            info!(trades = trade_id, "still writing");
        }
    }

    out.flush()?;
    println!("Wrote {} trades to {}", trade_id, args.output.display());
    Ok(())
}
