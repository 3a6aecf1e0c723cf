//! Orchestration hints near a call site.

use crate::domain::ExternalService;
use once_cell::sync::Lazy;
use regex::Regex;

/// Lines on each side of the first occurrence that form the search window.
pub const WINDOW_LINES: usize = 10;

pub const ORCHESTRATION_SUFFIX: &str = " (orchestration detected)";

static XSLT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bxslt(?:-saxon)?:|<(?:[A-Za-z_][\w.-]*:)?xslt\b")
        .expect("valid xslt regex")
});

static REMOVE_HEADERS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"<(?:[A-Za-z_][\w.-]*:)?removeHeaders\b[^>]*\bpattern\s*=\s*["'](?:\*|Camel\*|CamelHttp\*|CamelCxf\*|org\.apache\.cxf\.\*)["']"#,
    )
    .expect("valid removeHeaders regex")
});

static SET_PROPERTY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"<(?:[A-Za-z_][\w.-]*:)?setProperty\b[^>]*\b(?:name|propertyName)\s*=\s*["']Camel[A-Za-z]"#,
    )
    .expect("valid setProperty regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    XsltTransform,
    HeaderRemoval,
    ExchangePropertySet,
}

/// Indicators present in the window around the first line containing `needle`.
pub fn indicators_near(text: &str, needle: &str) -> Vec<Indicator> {
    if needle.is_empty() {
        return Vec::new();
    }
    let lines: Vec<&str> = text.lines().collect();
    let Some(hit) = lines.iter().position(|line| line.contains(needle)) else {
        return Vec::new();
    };
    let start = hit.saturating_sub(WINDOW_LINES);
    let end = (hit + WINDOW_LINES + 1).min(lines.len());
    let window = lines[start..end].join("\n");

    let mut found = Vec::new();
    if XSLT_RE.is_match(&window) {
        found.push(Indicator::XsltTransform);
    }
    if REMOVE_HEADERS_RE.is_match(&window) {
        found.push(Indicator::HeaderRemoval);
    }
    if SET_PROPERTY_RE.is_match(&window) {
        found.push(Indicator::ExchangePropertySet);
    }
    found
}

/// Append the orchestration qualifier when any indicator surrounds the
/// service's first mention (by name, else by endpoint).
pub fn annotate(text: &str, service: &mut ExternalService) {
    let needle = if text.contains(service.name.as_str()) {
        service.name.as_str()
    } else {
        service.endpoint.as_str()
    };
    if !indicators_near(text, needle).is_empty()
        && !service.description.ends_with(ORCHESTRATION_SUFFIX)
    {
        service.description.push_str(ORCHESTRATION_SUFFIX);
    }
}
