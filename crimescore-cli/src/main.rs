//! Crimescore CLI - district risk clustering and security scoring

#![deny(warnings)]

// Global invariants enforced:
// - Deterministic output ordering
// - A fixed --seed makes clustering reproducible across runs

use anyhow::Context;
use clap::{Parser, Subcommand};
use crimescore_core::config;
use crimescore_core::{render_json, render_text, DistrictAggregate, RiskEngine};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "crimescore")]
#[command(about = "District crime-risk clustering and security scoring")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train on a district dataset and report per-district tiers and scores
    Analyze {
        /// Path to a JSON dataset: district id -> aggregates
        dataset: PathBuf,

        /// Year the dataset describes
        #[arg(long)]
        year: i32,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Seed for reproducible clustering (overrides config file)
        #[arg(long)]
        seed: Option<u64>,

        /// Show only the N least safe districts
        #[arg(long)]
        top: Option<usize>,

        /// Only show districts at or below this security score
        #[arg(long)]
        max_score: Option<u8>,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Train on a dataset, then score a single observation for that year
    Score {
        /// Path to a JSON dataset: district id -> aggregates
        dataset: PathBuf,

        /// Year the dataset describes
        #[arg(long)]
        year: i32,

        /// Crime count of the observation
        #[arg(long)]
        crime: f64,

        /// Population density of the observation
        #[arg(long)]
        density: f64,

        /// Unemployment rate of the observation
        #[arg(long)]
        unemployment: f64,

        /// Seed for reproducible clustering (overrides config file)
        #[arg(long)]
        seed: Option<u64>,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Validate or inspect a configuration file
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without running analysis
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn load_dataset(path: &Path) -> anyhow::Result<HashMap<String, DistrictAggregate>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset: {}", path.display()))?;
    let dataset: HashMap<String, DistrictAggregate> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse dataset: {}", path.display()))?;
    Ok(dataset)
}

fn build_engine(config_path: Option<&Path>, seed: Option<u64>) -> anyhow::Result<RiskEngine> {
    let cwd = std::env::current_dir()?;
    let mut resolved = config::load_and_resolve(&cwd, config_path)?;
    if seed.is_some() {
        resolved.seed = seed;
    }
    Ok(RiskEngine::with_config(&resolved))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            dataset,
            year,
            format,
            seed,
            top,
            max_score,
            config: config_path,
        } => {
            let aggregates = load_dataset(&dataset)?;
            let mut engine = build_engine(config_path.as_deref(), seed)?;
            engine
                .train(&aggregates, year)
                .with_context(|| format!("training failed for year {}", year))?;

            let mut reports = engine.reports(&aggregates, year)?;
            if let Some(max) = max_score {
                reports.retain(|r| r.score <= max);
            }
            if let Some(top) = top {
                reports.truncate(top);
            }

            match format {
                OutputFormat::Text => print!("{}", render_text(&reports)),
                OutputFormat::Json => println!("{}", render_json(&reports)),
            }
        }
        Commands::Score {
            dataset,
            year,
            crime,
            density,
            unemployment,
            seed,
            config: config_path,
        } => {
            let aggregates = load_dataset(&dataset)?;
            let mut engine = build_engine(config_path.as_deref(), seed)?;
            engine
                .train(&aggregates, year)
                .with_context(|| format!("training failed for year {}", year))?;

            let score = engine.score(crime, density, unemployment, year)?;
            println!("{}", score);
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let cwd = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&cwd, path.as_deref())?;
                match &resolved.config_path {
                    Some(source) => println!("Config valid: {}", source.display()),
                    None => println!("No config file found; defaults are valid"),
                }
            }
            ConfigAction::Show { path } => {
                let cwd = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&cwd, path.as_deref())?;
                if let Some(source) = &resolved.config_path {
                    println!("# loaded from {}", source.display());
                }
                println!("weights.crime = {}", resolved.weights.crime);
                println!("weights.density = {}", resolved.weights.density);
                println!("weights.unemployment = {}", resolved.weights.unemployment);
                println!("weights.crime_exponent = {}", resolved.weights.crime_exponent);
                println!("clustering.max_iterations = {}", resolved.max_iterations);
                match resolved.seed {
                    Some(seed) => println!("clustering.seed = {}", seed),
                    None => println!("clustering.seed = (entropy)"),
                }
            }
        },
    }

    Ok(())
}
