//! Core data types shared by the extractor, detector, budgeter and renderers.

use crate::budget::OptimizationOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// A route entry point and the classification of its consuming address.
///
/// `address` is the source of truth; `protocol`, `kind` and `path` are always
/// derived from it by the endpoint classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: String,
    pub address: String,
    pub protocol: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyKind {
    Database,
    Service,
}

impl DependencyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Database => "Database",
            Self::Service => "Service",
        }
    }
}

/// A named bean (or service reference) declared by the blueprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DependencyKind,
    pub description: String,
    pub properties: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    pub name: String,
    /// Database vendor when detectable, otherwise the connection-pool family.
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    pub value: String,
    pub description: String,
}

/// An outbound network dependency found in the blueprint.
///
/// When `config_property` is set, `endpoint` holds the placeholder name rather
/// than a literal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalService {
    pub name: String,
    pub endpoint: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub protocol: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_property: Option<String>,
}

impl ExternalService {
    pub fn is_symbolic(&self) -> bool {
        self.config_property.is_some()
    }
}

/// Everything extracted from one blueprint document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintAnalysis {
    pub service_name: String,
    pub routes: Vec<Route>,
    pub dependencies: Vec<Dependency>,
    pub data_sources: Vec<DataSource>,
    pub properties: Vec<Property>,
    pub external_services: Vec<ExternalService>,
}

impl BlueprintAnalysis {
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
            && self.dependencies.is_empty()
            && self.data_sources.is_empty()
            && self.properties.is_empty()
            && self.external_services.is_empty()
    }
}

/// An extra row for the endpoint classifier table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeEntry {
    pub prefix: String,
    pub protocol: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Application configuration (file + env + CLI).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding one blueprint per service.
    pub source_dir: Option<PathBuf>,
    /// Profile used by `context` when `--profile` is absent.
    pub default_profile: String,
    /// Globs matched against paths below a service directory.
    pub blueprint_globs: Vec<String>,
    /// Scrub secrets from the raw text before budgeting it into a payload.
    pub redact: bool,
    /// Append the structured-data rendering to context payloads.
    pub structured_data: bool,
    /// User-defined optimization profiles, looked up before the presets.
    pub profiles: BTreeMap<String, OptimizationOptions>,
    /// Extra classifier rows, tested before the built-in ones.
    pub endpoint_schemes: Vec<SchemeEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: None,
            default_profile: "default".to_string(),
            blueprint_globs: vec![
                "**/OSGI-INF/blueprint/*.xml".to_string(),
                "**/*blueprint*.xml".to_string(),
            ],
            redact: true,
            structured_data: false,
            profiles: BTreeMap::new(),
            endpoint_schemes: Vec::new(),
        }
    }
}
