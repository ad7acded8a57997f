//! Synthetic lead file generator
//!
//! Usage:
//!   cargo run --release --bin generate_synthetic -- [OPTIONS]
//!
//! Options:
//!   --rows <N>       Number of leads to write (default: 1000)
//!   --seed <N>       Random seed for reproducibility (optional)
//!   --output <PATH>  Output CSV path (default: data/synthetic_leads.csv)

use anyhow::Result;
use clap::Parser;
use csv::WriterBuilder;
use lead_dashboard::synthetic::LeadGenerator;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::info;

/// Synthetic data generator for lead files
#[derive(Parser, Debug)]
#[command(name = "generate_synthetic")]
#[command(about = "Generate a synthetic lead CSV")]
struct Args {
    /// Number of leads to generate
    #[arg(long, default_value = "1000")]
    rows: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Output CSV path
    #[arg(long, default_value = "data/synthetic_leads.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let args = Args::parse();

    let mut rng: StdRng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let generator = LeadGenerator::new()?;

    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(&args.output)?;

    for (i, lead) in (0..args.rows).map(|_| generator.generate(&mut rng)).enumerate() {
        writer.serialize(&lead)?;
        if (i + 1) % 10000 == 0 {
            info!("Generated {}/{} leads...", i + 1, args.rows);
        }
    }
    writer.flush()?;

    info!("Wrote {} leads to {}", args.rows, args.output.display());
    Ok(())
}
