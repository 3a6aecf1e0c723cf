//! Optimization options and the four named presets.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizationOptions {
    pub include_full_xml: bool,
    pub include_routes: bool,
    pub include_data_sources: bool,
    pub include_external_services: bool,
    pub include_configuration: bool,
    pub include_dependencies: bool,
    /// Character budget; `None` means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl Default for OptimizationOptions {
    fn default() -> Self {
        DEFAULT
    }
}

impl OptimizationOptions {
    pub fn with_max_length(mut self, max_length: Option<usize>) -> Self {
        if max_length.is_some() {
            self.max_length = max_length;
        }
        self
    }
}

pub const DEFAULT: OptimizationOptions = OptimizationOptions {
    include_full_xml: false,
    include_routes: true,
    include_data_sources: true,
    include_external_services: true,
    include_configuration: true,
    include_dependencies: true,
    max_length: Some(30_000),
};

pub const COMPACT: OptimizationOptions = OptimizationOptions {
    include_full_xml: true,
    include_routes: true,
    include_data_sources: true,
    include_external_services: true,
    include_configuration: true,
    include_dependencies: true,
    max_length: Some(12_000),
};

pub const FULL_PROCESSING: OptimizationOptions = OptimizationOptions {
    include_full_xml: true,
    include_routes: true,
    include_data_sources: true,
    include_external_services: true,
    include_configuration: true,
    include_dependencies: true,
    max_length: Some(120_000),
};

pub const MINIMAL_PROCESSING: OptimizationOptions = OptimizationOptions {
    include_full_xml: false,
    include_routes: true,
    include_data_sources: false,
    include_external_services: true,
    include_configuration: false,
    include_dependencies: false,
    max_length: Some(6_000),
};

pub const PRESETS: &[(&str, OptimizationOptions)] = &[
    ("default", DEFAULT),
    ("compact", COMPACT),
    ("full-processing", FULL_PROCESSING),
    ("minimal-processing", MINIMAL_PROCESSING),
];

pub fn preset(name: &str) -> Option<OptimizationOptions> {
    PRESETS.iter().find(|(n, _)| *n == name).map(|(_, options)| *options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_resolve_by_name() {
        assert_eq!(preset("default"), Some(DEFAULT));
        assert_eq!(preset("minimal-processing").and_then(|o| o.max_length), Some(6_000));
        assert!(preset("compact").is_some_and(|o| o.include_full_xml));
        assert_eq!(preset("turbo"), None);
    }

    #[test]
    fn camel_case_fields_with_defaults() {
        let options: OptimizationOptions =
            serde_json::from_str(r#"{"includeFullXml": true, "maxLength": 100}"#).unwrap();
        assert!(options.include_full_xml);
        assert!(options.include_routes);
        assert_eq!(options.max_length, Some(100));

        let unbounded: OptimizationOptions = serde_json::from_str(r#"{"includeDependencies": false}"#).unwrap();
        assert_eq!(unbounded.max_length, None);

        let json = serde_json::to_value(MINIMAL_PROCESSING).unwrap();
        assert_eq!(json["includeExternalServices"], true);
        assert_eq!(json["includeDataSources"], false);
    }

    #[test]
    fn max_length_override_only_when_given() {
        assert_eq!(DEFAULT.with_max_length(Some(10)).max_length, Some(10));
        assert_eq!(DEFAULT.with_max_length(None).max_length, Some(30_000));
    }
}
