//! Survey command implementation

use anyhow::Result;
use clap::Args;
use rayon::prelude::*;
use std::path::PathBuf;

use super::utils::{emit, endpoint_table, SourceArgs};
use crate::domain::Config;
use crate::fetch::BlueprintSource;
use crate::render::{build_report, write_report, SurveyEntry, SurveyFailure};

#[derive(Args)]
pub struct SurveyArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Write the JSON report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Omit `generated_at` so reports are reproducible
    #[arg(long)]
    pub no_timestamp: bool,
}

pub fn run(args: SurveyArgs, config: &Config) -> Result<()> {
    let source = args.source.open(config)?;
    let services = source.list_services()?;
    let table = endpoint_table(config);
    tracing::info!(root = %source.root().display(), services = services.len(), "surveying blueprints");

    let results: Vec<Result<SurveyEntry, SurveyFailure>> = services
        .par_iter()
        .map(|service| -> Result<SurveyEntry, SurveyFailure> {
            let blueprint = source.fetch(service).map_err(|e| SurveyFailure {
                service: service.clone(),
                error: e.to_string(),
            })?;
            let analysis = crate::analyze(&blueprint.service, &blueprint.text, &table);
            Ok(SurveyEntry::from_analysis(&blueprint.text, &analysis))
        })
        .collect();

    let mut entries = Vec::new();
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(entry) => entries.push(entry),
            Err(failure) => {
                tracing::warn!(service = %failure.service, error = %failure.error, "skipping blueprint");
                failures.push(failure);
            }
        }
    }

    let include_timestamp = !args.no_timestamp;
    match &args.report {
        Some(path) => {
            write_report(path, &entries, &failures, include_timestamp)?;
            eprintln!(
                "Surveyed {} blueprints ({} failed) -> {}",
                entries.len(),
                failures.len(),
                path.display()
            );
            Ok(())
        }
        None => {
            let report = build_report(&entries, &failures, include_timestamp)?;
            emit(&serde_json::to_string_pretty(&report)?, None)
        }
    }
}
