//! Billing dataset generator entry point.

use billing_datagen::config::GeneratorConfig;
use billing_datagen::services::{export_dataset, DatasetAssembler, GenerationMode};

use clap::Parser;
use datagen_core::observability::init_tracing;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "billing-datagen", about = "Synthesizes a subscription billing dataset")]
struct Args {
    /// Configuration file.
    #[arg(long, default_value = "config.yml")]
    config: PathBuf,

    /// Output directory; overrides the configured one.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// PRNG seed; overrides the configured one.
    #[arg(long)]
    seed: Option<u64>,

    /// Generate only the scripted scenarios.
    #[arg(long, conflicts_with = "random_only")]
    edge_cases_only: bool,

    /// Generate only the sampled population.
    #[arg(long)]
    random_only: bool,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = GeneratorConfig::load(&args.config).map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    // Initialize tracing
    init_tracing("billing-datagen", &config.log_level);

    let seed = args.seed.unwrap_or(config.seed);
    let mode = if args.edge_cases_only {
        GenerationMode::EdgeCasesOnly
    } else if args.random_only {
        GenerationMode::RandomOnly
    } else {
        GenerationMode::Full
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %args.config.display(),
        seed,
        ?mode,
        "Starting billing-datagen"
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let dataset = DatasetAssembler::new(&config)
        .assemble(mode, &mut rng)
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to assemble dataset");
            std::io::Error::other(format!("Generation error: {}", e))
        })?;

    let output_dir = args
        .output_dir
        .unwrap_or_else(|| PathBuf::from(&config.output_dir));
    export_dataset(&dataset, &output_dir).map_err(|e| {
        tracing::error!(error = %e, "Failed to export dataset");
        std::io::Error::other(format!("Export error: {}", e))
    })?;

    tracing::info!("Generation complete");
    Ok(())
}
