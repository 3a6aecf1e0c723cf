//! Output rendering (analysis JSON/text, survey reports)

pub mod report;
pub mod text;

pub use report::{build_report, write_report, SurveyEntry, SurveyFailure};
pub use text::render_analysis_text;

use crate::domain::BlueprintAnalysis;
use anyhow::Result;

pub fn render_analysis_json(analysis: &BlueprintAnalysis) -> Result<String> {
    Ok(serde_json::to_string_pretty(analysis)?)
}
