//! Trade-mirroring scanner.
//!
//! Streams a binary trade dataset through the classifier and renders one
//! CSV report per similarity category under `results/`.

use std::process::exit;
use std::time::Instant;

use clap::Parser;
use tracing::info;

use mirrorscan::{Classifier, Config, ReportWriter, ScanError, TradeReader, config, report};

#[derive(Debug, Parser)]
#[command(name = "mirrorscan")]
#[command(about = "Detect trade mirroring between two users over a binary trade dataset")]
struct Args {
    /// Path to the JSON run configuration
    config: std::path::PathBuf,

    /// First user id to compare
    user_a: u64,

    /// Second user id to compare
    user_b: u64,
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
        eprintln!("{e}");
        exit(1);
    }
}

fn run(args: &Args) -> Result<(), ScanError> {
    let config = Config::load(&args.config)?;
    let symbols = config::load_symbols(&config.symbols_path)?;
    info!(
        dataset = %config.dataset_path.display(),
        symbols = symbols.len(),
        user_a = args.user_a,
        user_b = args.user_b,
        "starting scan"
    );

    let started = Instant::now();
    let mut classifier = Classifier::new(symbols.len(), args.user_a, args.user_b);
    for record in TradeReader::open(&config.dataset_path)? {
        classifier.submit(&record?)?;
    }
    let detections = classifier.finish();
    let elapsed = started.elapsed().as_secs_f64();

    println!("Trade comparison completed. ({elapsed:.3}s)");
    println!("Users analyzed: {} vs {}", args.user_a, args.user_b);

    let writer = ReportWriter::new(report::results_dir(), config.violation_reporting());
    let copy = writer.write("copy_trades", &detections.copy, &symbols)?;
    let reversal = writer.write("reversal_trades", &detections.reversal, &symbols)?;
    let partial = writer.write("partial_copy_trades", &detections.partial_copy, &symbols)?;

    let total = copy.matches + reversal.matches + partial.matches;
    println!("Total matches {total}");
    println!(" - Copy trades: {}", copy.matches);
    println!(" - Reversal trades: {}", reversal.matches);
    println!(" - Partial copy trades: {}", partial.matches);
    if config.violation_reporting() {
        let violations = copy.violations + reversal.violations + partial.violations;
        println!(" - Violations: {violations}");
    }

    Ok(())
}
