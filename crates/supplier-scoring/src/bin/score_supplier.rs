//! Supplier Scoring CLI
//!
//! Computes one kind-tagged scoring request from a JSON file.
//!
//! Usage:
//!   score-supplier --input request.json \
//!                  --config scoring.json \
//!                  --output outcome.json

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use supplier_scoring::{Scorers, ScoringConfig, ScoringOutcome, ScoringRequest};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "score-supplier",
    about = "Score a supplier with the economic, quality, environmental, transportation or tradeoff engine"
)]
struct Args {
    /// Scoring request JSON (tagged with "kind")
    #[arg(short, long)]
    input: PathBuf,

    /// Scoring config JSON overriding the built-in tables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output JSON file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &args.config {
        Some(path) => ScoringConfig::from_file(path)
            .with_context(|| format!("loading scoring config {:?}", path))?,
        None => ScoringConfig::default(),
    };
    let scorers = Scorers::from_config(&config);

    let file = File::open(&args.input).with_context(|| format!("opening {:?}", args.input))?;
    let request: ScoringRequest = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing scoring request {:?}", args.input))?;
    info!("Scoring {} request from {:?}", request.kind(), args.input);

    let outcome = scorers.compute(&request)?;
    info!(
        "{} scoring complete, {} recommendations",
        outcome.kind(),
        outcome.recommendations().len()
    );

    match &args.output {
        Some(path) => {
            info!("Writing output to {:?}", path);
            let mut writer = BufWriter::new(File::create(path)?);
            write_outcome(&mut writer, &outcome)?;
        }
        None => {
            let stdout = std::io::stdout();
            write_outcome(&mut stdout.lock(), &outcome)?;
        }
    }

    Ok(())
}

/// Pretty JSON plus a trailing newline, flushed before returning.
fn write_outcome<W: Write>(writer: &mut W, outcome: &ScoringOutcome) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, outcome)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use supplier_scoring::CostInput;

    #[test]
    fn test_output_complete_before_writer_dropped() {
        let outcome = Scorers::default()
            .compute(&ScoringRequest::Economic(CostInput {
                material_cost: 1000.0,
                transportation_cost: 200.0,
                labor_cost: 300.0,
                overhead_cost: 150.0,
                tax_rate: 0.1,
                capacity: 1200.0,
                volume: 1000.0,
            }))
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outcome.json");
        let mut writer = BufWriter::new(File::create(&path).unwrap());
        write_outcome(&mut writer, &outcome).unwrap();

        // Writer still alive: everything must already be on disk
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.ends_with('\n'));
        let back: ScoringOutcome = serde_json::from_str(&text).unwrap();
        assert_eq!(back, outcome);
        drop(writer);
    }
}
