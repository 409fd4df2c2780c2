//! `tracking-codes` command line

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tc_core::simulate::{default_seeds, load_seeds};
use tc_core::{init_tracing, Simulator, TrackingConfig};

/// Consent-gated tracking code tooling
#[derive(Parser, Debug)]
#[command(name = "tracking-codes")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a scripted consent and injection session
    Simulate {
        /// Configuration file (TOML); defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// JSON array of `{ "name", "script_content" }` seed inputs
        #[arg(short, long)]
        records: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a configuration file
    CheckConfig {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            config,
            records,
            json,
        } => {
            let config = match config {
                Some(path) => TrackingConfig::load(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => TrackingConfig::default(),
            };
            init_tracing(&config.logging)?;

            let seeds = match records {
                Some(path) => load_seeds(&path)?,
                None => default_seeds(),
            };

            let report = Simulator::new(config).run(&seeds).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.generate_text());
            }

            if !report.passed() {
                bail!("simulation found {} violation(s)", report.violations.len());
            }
        }
        Commands::CheckConfig { config } => {
            let loaded = TrackingConfig::load(&config)
                .with_context(|| format!("loading {}", config.display()))?;
            init_tracing(&loaded.logging)?;
            tracing::info!(path = %config.display(), "configuration is valid");

            println!("{} is valid", config.display());
            println!("{}", toml::to_string_pretty(&loaded)?);
        }
    }

    Ok(())
}
