//! Context command implementation

use anyhow::Result;
use clap::Args;
use serde_json::json;
use std::path::PathBuf;

use super::utils::{emit, endpoint_table, OutputFormat, SourceArgs};
use crate::budget::{build_payload, resolve_profile, structured_summary};
use crate::domain::Config;
use crate::fetch::BlueprintSource;
use crate::redact::Redactor;

#[derive(Args)]
pub struct ContextArgs {
    /// Service id (blueprint file stem or directory name)
    #[arg(value_name = "SERVICE")]
    pub service: String,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Optimization profile (user profile or preset); defaults to `default_profile`
    #[arg(short, long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Override the profile's character budget
    #[arg(long, value_name = "CHARS")]
    pub max_length: Option<usize>,

    /// Append the structured summary of the analysis
    #[arg(long)]
    pub structured: bool,

    /// Skip secret redaction
    #[arg(long)]
    pub no_redact: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the payload to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: ContextArgs, config: &Config) -> Result<()> {
    let profile_name = args.profile.clone().unwrap_or_else(|| config.default_profile.clone());
    let options = resolve_profile(&profile_name, config)?.with_max_length(args.max_length);

    let source = args.source.open(config)?;
    let blueprint = source.fetch(&args.service)?;

    let (text, redactions) = if config.redact && !args.no_redact {
        let outcome = Redactor::new().redact(&blueprint.text);
        if outcome.total() > 0 {
            tracing::info!(service = %blueprint.service, redactions = outcome.total(), "secrets redacted");
        }
        (outcome.content, outcome.counts)
    } else {
        (blueprint.text, Default::default())
    };

    let analysis = crate::analyze(&blueprint.service, &text, &endpoint_table(config));
    let payload = build_payload(&text, &analysis, &options);
    let structured = (args.structured || config.structured_data)
        .then(|| structured_summary(&analysis, &options))
        .filter(|summary| !summary.is_empty());

    let rendered = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "service": blueprint.service,
            "profile": profile_name,
            "options": options,
            "payload": payload,
            "structured": structured,
            "redactions": redactions,
        }))?,
        OutputFormat::Text => {
            let mut out = payload.text.clone();
            if let Some(summary) = &structured {
                out.push_str("\n\n");
                out.push_str(&summary.to_text());
            }
            out
        }
    };

    if args.format == OutputFormat::Text {
        eprintln!(
            "{}: ~{} tokens ({} chars{}) [profile: {}]",
            blueprint.service,
            payload.estimated_tokens,
            payload.text.chars().count(),
            if payload.truncated { ", truncated" } else { "" },
            profile_name
        );
    }
    emit(&rendered, args.output.as_deref())
}
