//! Containment-based deduplication of detected services.

use crate::domain::ExternalService;

/// Two records describe the same system when their names or endpoints are
/// equal or one contains the other. Empty strings never match.
pub fn same_service(a: &ExternalService, b: &ExternalService) -> bool {
    overlaps(&a.name, &b.name) || overlaps(&a.endpoint, &b.endpoint)
}

fn overlaps(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

/// Keep the first record of every group of overlapping records, in order.
pub fn dedup_services(services: Vec<ExternalService>) -> Vec<ExternalService> {
    let mut kept: Vec<ExternalService> = Vec::with_capacity(services.len());
    for service in services {
        if kept.iter().any(|existing| same_service(existing, &service)) {
            tracing::trace!(name = %service.name, "dropping duplicate external service");
            continue;
        }
        kept.push(service);
    }
    kept
}
