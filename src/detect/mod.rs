//! External-service detection over raw blueprint text.
//!
//! Rules run in a fixed order and their results are concatenated, then
//! collapsed by [`dedup::dedup_services`] and finally annotated with
//! orchestration hints. Detection never fails: unusable input yields an
//! empty list.

pub mod dedup;
pub mod orchestration;
pub mod placeholder;
pub mod rules;
pub mod scan;

use crate::domain::ExternalService;
use rules::{default_rules, DetectionContext, DetectionRule};
use scan::{client_sites, mask_inert, TagIndex};

pub struct ServiceDetector {
    rules: Vec<Box<dyn DetectionRule + Send + Sync>>,
}

impl Default for ServiceDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceDetector {
    pub fn new() -> Self {
        Self { rules: default_rules() }
    }

    /// Use a custom rule list. Order is merge order.
    pub fn with_rules(rules: Vec<Box<dyn DetectionRule + Send + Sync>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn detect(&self, text: &str) -> Vec<ExternalService> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let masked = mask_inert(text);
        let index = TagIndex::build(&masked);
        let client_sites = client_sites(&index);
        let ctx = DetectionContext { text: &masked, index, client_sites };

        let mut candidates = Vec::new();
        for rule in &self.rules {
            let found = rule.detect(&ctx);
            tracing::debug!(rule = rule.name(), count = found.len(), "detection rule finished");
            candidates.extend(found);
        }

        let mut services = dedup::dedup_services(candidates);
        for service in &mut services {
            orchestration::annotate(ctx.text, service);
        }
        services
    }
}

/// Detect external services with the default rule set.
pub fn detect_external_services(text: &str) -> Vec<ExternalService> {
    ServiceDetector::new().detect(text)
}
