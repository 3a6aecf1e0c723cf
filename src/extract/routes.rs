//! Route extraction.

use super::endpoint::EndpointTable;
use crate::domain::Route;
use crate::parse::{BlueprintDocument, NodeRef};

pub fn extract_routes(doc: &BlueprintDocument, table: &EndpointTable) -> Vec<Route> {
    doc.find_all("route")
        .into_iter()
        .enumerate()
        .map(|(idx, route)| build_route(doc, route, idx, table))
        .collect()
}

fn build_route(doc: &BlueprintDocument, route: NodeRef<'_>, idx: usize, table: &EndpointTable) -> Route {
    let id = route
        .non_empty_attr("id")
        .map(str::to_string)
        .unwrap_or_else(|| format!("route-{}", idx + 1));
    let address = consumer_address(doc, route);
    let class = table.classify(&address);

    let description = route
        .first_child("description")
        .map(|d| d.text().to_string())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| {
            if address.is_empty() {
                format!("{} route without a consumer", class.kind)
            } else {
                format!("{} route consuming from {}", class.kind, address)
            }
        });

    Route {
        id,
        address,
        protocol: class.protocol,
        kind: class.kind,
        path: class.path,
        description,
    }
}

/// The `uri` of the route's first `from`, following `ref` to a declared
/// `<endpoint id=".." uri=".."/>` when the consumer is indirect.
fn consumer_address(doc: &BlueprintDocument, route: NodeRef<'_>) -> String {
    let Some(from) = route.first_child("from") else {
        return String::new();
    };
    if let Some(uri) = from.non_empty_attr("uri") {
        return uri.to_string();
    }
    from.non_empty_attr("ref")
        .and_then(|reference| {
            doc.element_by_id(reference)
                .and_then(|endpoint| endpoint.non_empty_attr("uri"))
                .or(Some(reference))
        })
        .map(str::to_string)
        .unwrap_or_default()
}
