//! Shared CLI utilities.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::{Path, PathBuf};

use crate::domain::Config;
use crate::extract::EndpointTable;
use crate::fetch::DirectorySource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Directory holding the blueprints (overrides `source_dir` from config)
    #[arg(short, long, value_name = "DIR")]
    pub source: Option<PathBuf>,
}

impl SourceArgs {
    /// CLI flag, then configuration, then the working directory.
    pub fn open(&self, config: &Config) -> Result<DirectorySource> {
        let root = self
            .source
            .clone()
            .or_else(|| config.source_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        DirectorySource::new(root, &config.blueprint_globs).context("Invalid blueprint_globs")
    }
}

pub fn endpoint_table(config: &Config) -> EndpointTable {
    EndpointTable::with_extensions(&config.endpoint_schemes)
}

/// Write to `path`, or to stdout when no path is given.
pub fn emit(content: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)
                .with_context(|| format!("Failed writing {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => {
            print!("{}", content);
            if !content.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}
