//! Human-readable rendering of an analysis.

use crate::domain::BlueprintAnalysis;
use std::fmt::Write;

pub fn render_analysis_text(analysis: &BlueprintAnalysis) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Service: {}", analysis.service_name);

    let _ = writeln!(out, "\nRoutes ({})", analysis.routes.len());
    for route in &analysis.routes {
        let _ = writeln!(out, "  {:<24} {} [{} / {}]", route.id, route.address, route.protocol, route.kind);
    }

    let _ = writeln!(out, "\nExternal services ({})", analysis.external_services.len());
    for svc in &analysis.external_services {
        let _ = write!(out, "  {:<24} {} [{} / {}]", svc.name, svc.endpoint, svc.kind, svc.protocol);
        if let Some(property) = &svc.config_property {
            let _ = write!(out, " (config property: {})", property);
        }
        let _ = writeln!(out, "\n  {:<24} {}", "", svc.description);
    }

    let _ = writeln!(out, "\nData sources ({})", analysis.data_sources.len());
    for ds in &analysis.data_sources {
        let _ = writeln!(out, "  {:<24} {}", ds.name, ds.kind);
    }

    let _ = writeln!(out, "\nDependencies ({})", analysis.dependencies.len());
    for dep in &analysis.dependencies {
        let _ = writeln!(out, "  {:<24} {:<9} {}", dep.name, dep.kind.as_str(), dep.description);
    }

    let _ = writeln!(out, "\nProperties ({})", analysis.properties.len());
    for prop in &analysis.properties {
        let _ = writeln!(out, "  {} = {}", prop.name, prop.value);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dependency, DependencyKind, ExternalService};

    #[test]
    fn sections_list_counts_and_entries() {
        let analysis = BlueprintAnalysis {
            service_name: "orders".into(),
            dependencies: vec![Dependency {
                name: "processor".into(),
                kind: DependencyKind::Service,
                description: "Bean of class com.acme.Processor".into(),
                properties: vec![],
            }],
            external_services: vec![ExternalService {
                name: "partner.url".into(),
                endpoint: "partner.url".into(),
                kind: "SOAP Service".into(),
                protocol: "SOAP".into(),
                description: "SOAP client call via cxf:bean:partner".into(),
                config_property: Some("partner.url".into()),
            }],
            ..Default::default()
        };
        let text = render_analysis_text(&analysis);
        assert!(text.starts_with("Service: orders\n"));
        assert!(text.contains("Routes (0)"));
        assert!(text.contains("External services (1)"));
        assert!(text.contains("(config property: partner.url)"));
        assert!(text.contains("processor"));
        assert!(text.contains("Service   Bean of class com.acme.Processor"));
    }
}
