//! Fact extraction from the structural tree.

use crate::domain::{DataSource, Dependency, Property, Route};
use crate::parse::BlueprintDocument;

pub mod beans;
pub mod datasource;
pub mod endpoint;
pub mod properties;
pub mod routes;

pub use endpoint::{classify, EndpointClass, EndpointTable};

/// Structured facts read from one document.
#[derive(Debug, Clone, Default)]
pub struct Facts {
    pub routes: Vec<Route>,
    pub dependencies: Vec<Dependency>,
    pub data_sources: Vec<DataSource>,
    pub properties: Vec<Property>,
}

pub fn extract_facts(doc: &BlueprintDocument, table: &EndpointTable) -> Facts {
    let facts = Facts {
        routes: routes::extract_routes(doc, table),
        dependencies: beans::extract_dependencies(doc),
        data_sources: beans::extract_data_sources(doc),
        properties: properties::extract_properties(doc),
    };
    tracing::debug!(
        routes = facts.routes.len(),
        dependencies = facts.dependencies.len(),
        data_sources = facts.data_sources.len(),
        properties = facts.properties.len(),
        repairs = doc.repairs(),
        "extracted blueprint facts"
    );
    facts
}
