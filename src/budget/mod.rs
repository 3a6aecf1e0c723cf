//! Context budgeting: fit a blueprint and its facts into a bounded payload.
//!
//! Two strategies, selected by [`OptimizationOptions::include_full_xml`]:
//! the raw text cut to the character budget, or a reconstruction made of the
//! document header, capped per-category fragment lists and the root end tag.
//! Either result is truncated with the same marker rule.

pub mod fragments;
pub mod options;
pub mod structured;

pub use options::{preset, OptimizationOptions, PRESETS};
pub use structured::{structured_summary, StructuredSummary};

use crate::domain::{BlueprintAnalysis, Config};
use crate::utils::estimate_tokens;
use fragments::{FragmentGroup, FragmentScanner};
use serde::Serialize;
use thiserror::Error;

pub const TRUNCATION_MARKER: &str = "\n<!-- [truncated] -->";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BudgetError {
    #[error("unknown optimization profile '{name}' (available: {available})")]
    UnknownProfile { name: String, available: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextPayload {
    pub text: String,
    pub estimated_tokens: usize,
    pub truncated: bool,
}

/// Look a profile up in the user configuration, then among the presets.
pub fn resolve_profile(name: &str, config: &Config) -> Result<OptimizationOptions, BudgetError> {
    if let Some(options) = config.profiles.get(name) {
        return Ok(*options);
    }
    preset(name).ok_or_else(|| {
        let available: Vec<&str> = config
            .profiles
            .keys()
            .map(String::as_str)
            .chain(PRESETS.iter().map(|(n, _)| *n))
            .collect();
        BudgetError::UnknownProfile { name: name.to_string(), available: available.join(", ") }
    })
}

pub fn build_payload(
    raw: &str,
    analysis: &BlueprintAnalysis,
    options: &OptimizationOptions,
) -> ContextPayload {
    let assembled = if options.include_full_xml {
        raw.to_string()
    } else {
        reconstruct(raw, options)
    };

    let (text, truncated) = match options.max_length {
        Some(limit) => truncate_chars(&assembled, limit),
        None => (assembled, false),
    };
    tracing::debug!(
        service = %analysis.service_name,
        chars = text.chars().count(),
        truncated,
        "context payload built"
    );

    ContextPayload { estimated_tokens: estimate_tokens(&text), text, truncated }
}

fn reconstruct(raw: &str, options: &OptimizationOptions) -> String {
    let scanner = FragmentScanner::new(raw);

    let mut groups: Vec<FragmentGroup<'_>> = Vec::new();
    if options.include_routes {
        groups.push(scanner.routes());
    }
    if options.include_data_sources {
        groups.push(scanner.data_sources());
    }
    if options.include_external_services {
        groups.push(scanner.external_services());
    }
    if options.include_configuration {
        groups.push(scanner.configuration());
    }
    if options.include_dependencies {
        groups.push(scanner.dependencies());
    }

    let mut out = String::from(scanner.header());
    for group in groups.iter().filter(|g| g.total > 0) {
        out.push_str("\n  ");
        out.push_str(&group.heading());
        for fragment in &group.fragments {
            out.push_str("\n  ");
            out.push_str(fragment);
        }
    }
    let footer = scanner.footer();
    if !footer.is_empty() {
        out.push('\n');
        out.push_str(&footer);
    }
    out
}

/// Cut `text` to `limit` characters, appending the marker when anything was cut.
pub fn truncate_chars(text: &str, limit: usize) -> (String, bool) {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + TRUNCATION_MARKER.len());
            out.push_str(&text[..cut]);
            out.push_str(TRUNCATION_MARKER);
            (out, true)
        }
        None => (text.to_string(), false),
    }
}
