//! Tolerant markup parsing into an arena-backed element tree.
//!
//! Blueprint files are hand-maintained and frequently malformed, so parsing
//! never fails: `quick-xml` events build as much of the tree as the input
//! allows, and the builder counts what it had to repair.

mod builder;
pub mod document;

pub use builder::parse;
pub(crate) use builder::parse_attributes;
pub use document::{BlueprintDocument, NodeId, NodeRef};

/// Local part of a possibly prefixed tag name (`cxf:cxfEndpoint` → `cxfEndpoint`).
pub fn local_name(qualified: &str) -> &str {
    qualified.rsplit_once(':').map_or(qualified, |(_, local)| local)
}

/// Whether a tag name satisfies a query.
///
/// Prefixed queries (`jaxws:client`) compare the qualified name; bare queries
/// compare the local name so namespace prefixes do not matter.
pub fn tag_matches(qualified: &str, query: &str) -> bool {
    if query.contains(':') {
        qualified == query
    } else {
        local_name(qualified) == query
    }
}
