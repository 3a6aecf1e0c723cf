//! Standalone configuration property extraction.

use crate::domain::Property;
use crate::parse::{BlueprintDocument, NodeRef};

/// Every `property` outside a `bean` that has both a name (or `key`) and a value.
pub fn extract_properties(doc: &BlueprintDocument) -> Vec<Property> {
    doc.find_all("property")
        .into_iter()
        .filter(|p| !p.parent().is_some_and(|parent| parent.is("bean")))
        .filter_map(|p| {
            let name = p.non_empty_attr("name").or_else(|| p.non_empty_attr("key"))?;
            let value = p.non_empty_attr("value")?;
            Some(Property {
                name: name.to_string(),
                value: value.to_string(),
                description: describe(p),
            })
        })
        .collect()
}

fn describe(property: NodeRef<'_>) -> String {
    if let Some(placeholder) = property.ancestor("property-placeholder") {
        return match placeholder.non_empty_attr("persistent-id") {
            Some(pid) => format!("Default value (persistent-id: {})", pid),
            None => "Default value".to_string(),
        };
    }
    if property.ancestor("camelContext").is_some() {
        return "Camel context property".to_string();
    }
    "Configuration property".to_string()
}
