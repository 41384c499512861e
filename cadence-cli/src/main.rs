//! # cadence
//!
//! Terminal breathing pacer.
//!
//! ## Commands
//!
//! - `run`: Pace breathing, reading control commands from stdin
//! - `render`: Print the render frame for a phase and progress
//! - `theme`: Print the configured theme as CSS custom properties
//!
//! ## Example
//!
//! ```bash
//! # Breathe at 5 seconds per half-cycle, emitting JSON frames for 30s
//! cadence run --tempo 5 --json --duration 30
//!
//! # Frame at the top of an inhale
//! cadence render --phase inhaling --progress 1.0
//! ```

use anyhow::Result;
use cadence_types::Phase;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{render, run, theme};
use config::Config;

/// Terminal breathing pacer.
#[derive(Parser, Debug)]
#[command(name = "cadence")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: cadence.toml in the config directory)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pace breathing, reading control commands from stdin
    Run {
        /// Seconds per half-cycle (overrides config)
        #[arg(long, short)]
        tempo: Option<f64>,

        /// Cue volume 0-100 (overrides config)
        #[arg(long, short)]
        volume: Option<u32>,

        /// Text shown over the circle
        #[arg(long, allow_hyphen_values = true)]
        text: Option<String>,

        /// Print one JSON frame per line instead of a bar
        #[arg(long)]
        json: bool,

        /// Stop after this many seconds
        #[arg(long, short)]
        duration: Option<f64>,
    },

    /// Print the render frame for a phase and progress
    Render {
        /// Phase to render (idle, inhaling, exhaling, stopped)
        #[arg(long, short)]
        phase: Phase,

        /// Progress through the half-cycle, 0.0-1.0
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        progress: f64,

        /// Text shown over the circle
        #[arg(long, allow_hyphen_values = true)]
        text: Option<String>,
    },

    /// Print the configured theme as CSS custom properties
    Theme,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so frames on stdout stay machine-readable
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            tempo,
            volume,
            text,
            json,
            duration,
        } => {
            let options = run::RunOptions {
                tempo,
                volume,
                text,
                json,
                duration,
            };
            run::run(config, options).await?;
        }
        Commands::Render {
            phase,
            progress,
            text,
        } => {
            render::run(phase, progress, text.as_deref())?;
        }
        Commands::Theme => {
            theme::run(&config);
        }
    }

    Ok(())
}
