//! Command-line interface for blueprint-lens
//!
//! Provides `analyze`, `context`, `survey`, `profiles` and `completions`
//! subcommands. Configuration is loaded once here and handed to each command.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::load_config;

mod analyze;
mod completions;
mod context;
mod profiles;
mod survey;
mod utils;

/// Analyze Camel Blueprint routes and build budgeted LLM context payloads
#[derive(Parser)]
#[command(name = "blueprint-lens")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (TOML or YAML); auto-discovered in the working directory otherwise
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract routes, beans, data sources, properties and external services
    Analyze(analyze::AnalyzeArgs),

    /// Build a size-bounded context payload for a summarization model
    Context(context::ContextArgs),

    /// Analyze every blueprint under the source directory
    Survey(survey::SurveyArgs),

    /// List the available optimization profiles
    Profiles,

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if let Commands::Completions(args) = &cli.command {
        return completions::run(args);
    }

    let work_dir = std::env::current_dir().context("Cannot determine working directory")?;
    let config = load_config(&work_dir, cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze(args) => analyze::run(args, &config),
        Commands::Context(args) => context::run(args, &config),
        Commands::Survey(args) => survey::run(args, &config),
        Commands::Profiles => profiles::run(&config),
        Commands::Completions(_) => Ok(()),
    }
}
