//! Structured-data rendering built from the analysis rather than raw text.

use super::OptimizationOptions;
use crate::domain::{BlueprintAnalysis, DataSource, ExternalService, Route};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_services: Option<Vec<ExternalService>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_sources: Option<Vec<DataSource>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routes: Option<Vec<Route>>,
}

impl StructuredSummary {
    pub fn is_empty(&self) -> bool {
        self.external_services.is_none() && self.data_sources.is_none() && self.routes.is_none()
    }

    /// Compact text form for appending to a payload.
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        if let Some(services) = &self.external_services {
            out.push_str(&format!("## External services ({})\n", services.len()));
            for svc in services {
                out.push_str(&format!("- {} [{} / {}] {}", svc.name, svc.kind, svc.protocol, svc.endpoint));
                if let Some(property) = &svc.config_property {
                    out.push_str(&format!(" (config property: {})", property));
                }
                out.push('\n');
            }
        }

        if let Some(sources) = &self.data_sources {
            out.push_str(&format!("## Data sources ({})\n", sources.len()));
            for ds in sources {
                out.push_str(&format!("- {} [{}]\n", ds.name, ds.kind));
            }
        }

        if let Some(routes) = &self.routes {
            out.push_str(&format!("## Routes ({})\n", routes.len()));
            for route in routes {
                out.push_str(&format!("- {}: {} ({} / {})\n", route.id, route.address, route.protocol, route.kind));
            }
        }

        out
    }
}

/// Summarize the categories enabled in `options`.
pub fn structured_summary(analysis: &BlueprintAnalysis, options: &OptimizationOptions) -> StructuredSummary {
    StructuredSummary {
        external_services: options
            .include_external_services
            .then(|| analysis.external_services.clone()),
        data_sources: options.include_data_sources.then(|| analysis.data_sources.clone()),
        routes: options.include_routes.then(|| analysis.routes.clone()),
    }
}
