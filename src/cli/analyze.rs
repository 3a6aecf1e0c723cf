//! Analyze command implementation

use anyhow::Result;
use clap::Args;

use super::utils::{emit, endpoint_table, OutputFormat, SourceArgs};
use crate::domain::Config;
use crate::fetch::BlueprintSource;
use crate::render::{render_analysis_json, render_analysis_text};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Service id (blueprint file stem or directory name)
    #[arg(value_name = "SERVICE")]
    pub service: String,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

pub fn run(args: AnalyzeArgs, config: &Config) -> Result<()> {
    let source = args.source.open(config)?;
    let blueprint = source.fetch(&args.service)?;

    let analysis = crate::analyze(&blueprint.service, &blueprint.text, &endpoint_table(config));

    let rendered = match args.format {
        OutputFormat::Json => render_analysis_json(&analysis)?,
        OutputFormat::Text => render_analysis_text(&analysis),
    };
    emit(&rendered, None)
}
