//! Survey report JSON generation.

use crate::domain::{BlueprintAnalysis, REPORT_SCHEMA_VERSION};
use crate::utils::fingerprint;
use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;

/// Per-service line of a survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurveyEntry {
    pub service: String,
    pub fingerprint: String,
    pub routes: usize,
    pub dependencies: usize,
    pub data_sources: usize,
    pub properties: usize,
    pub external_services: Vec<String>,
}

impl SurveyEntry {
    pub fn from_analysis(raw: &str, analysis: &BlueprintAnalysis) -> Self {
        Self {
            service: analysis.service_name.clone(),
            fingerprint: fingerprint(raw),
            routes: analysis.routes.len(),
            dependencies: analysis.dependencies.len(),
            data_sources: analysis.data_sources.len(),
            properties: analysis.properties.len(),
            external_services: analysis.external_services.iter().map(|s| s.name.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurveyFailure {
    pub service: String,
    pub error: String,
}

pub fn build_report(
    entries: &[SurveyEntry],
    failures: &[SurveyFailure],
    include_timestamp: bool,
) -> Result<Value> {
    let mut sorted_entries: Vec<&SurveyEntry> = entries.iter().collect();
    sorted_entries.sort_by(|a, b| a.service.cmp(&b.service));
    let mut sorted_failures: Vec<&SurveyFailure> = failures.iter().collect();
    sorted_failures.sort_by(|a, b| a.service.cmp(&b.service));

    let external_total: usize = entries.iter().map(|e| e.external_services.len()).sum();

    let mut report = Map::new();
    report.insert("schema_version".to_string(), Value::String(REPORT_SCHEMA_VERSION.to_string()));
    if include_timestamp {
        report.insert(
            "generated_at".to_string(),
            Value::String(Utc::now().format("%Y-%m-%dT%H:%M:%S+00:00").to_string()),
        );
    }
    report.insert(
        "totals".to_string(),
        serde_json::json!({
            "services": entries.len(),
            "failures": failures.len(),
            "external_services": external_total,
        }),
    );
    report.insert("services".to_string(), serde_json::to_value(sorted_entries)?);
    if !sorted_failures.is_empty() {
        report.insert("failures".to_string(), serde_json::to_value(sorted_failures)?);
    }
    Ok(Value::Object(report))
}

pub fn write_report(
    report_path: &Path,
    entries: &[SurveyEntry],
    failures: &[SurveyFailure],
    include_timestamp: bool,
) -> Result<()> {
    let report = build_report(entries, failures, include_timestamp)?;
    if let Some(parent) = report_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(report_path, serde_json::to_string_pretty(&report)?)?;
    Ok(())
}
