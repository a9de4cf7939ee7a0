//! Perceived Load CLI
//!
//! Log today's perceived task load and print trailing averages:
//!
//! ```text
//! perceived-load 1.2          # log a reading, then report
//! perceived-load              # report only
//! perceived-load -l 7 -l 30   # custom windows
//! perceived-load config       # print a default config file
//! ```

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use perceived_load::config::{generate_default_config, Config};
use perceived_load::query::{carry_forward, load_averages};
use perceived_load::storage::Series;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "perceived-load")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Log perceived task load and report trailing averages")]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// New reading to log (optimum is 1.0)
    #[arg(allow_negative_numbers = true)]
    pub value: Option<f64>,

    /// Database file to use
    #[arg(long, value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Config file (default: search standard locations)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Lookback window in days (repeatable)
    #[arg(short = 'l', long = "lookback", value_name = "DAYS")]
    pub lookbacks: Vec<u32>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Config { output }) = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("Config written to {}", path.display());
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(db) = cli.db {
        config.database.path = db;
    }
    if !cli.lookbacks.is_empty() {
        config.report.lookbacks = cli.lookbacks;
    }

    perceived_load::logging::init(&config.logging);

    let path = config.database.resolved_path();
    let mut series =
        Series::open_or_empty(&path).with_context(|| format!("reading {}", path.display()))?;
    let now = Utc::now().timestamp_millis();

    if let Some(value) = cli.value {
        series.insert(now, value)?;
        series
            .write(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!("Logged {} to {:?}", value, path);
    } else {
        carry_forward(&mut series, now)?;
    }

    if series.is_empty() {
        println!("No readings recorded yet.");
        println!();
        println!("Log your first one with:");
        println!("  perceived-load 1.0");
        return Ok(());
    }

    let report = load_averages(series, now, &config.report.lookbacks).await?;

    match cli.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => println!("{}", report),
    }

    Ok(())
}
