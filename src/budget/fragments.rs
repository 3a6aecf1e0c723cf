//! Raw-text fragment extraction for reconstructed payloads.
//!
//! Fragments are located on the text with comments and CDATA masked, then
//! sliced out of the original text at the same offsets. Comments and CDATA
//! inside a kept element survive, while markup quoted inside them is never
//! picked.

use crate::detect::scan::{mask_inert, RawTag, TagIndex};
use crate::extract::datasource::is_data_source_class;

pub const ROUTE_CAP: usize = 10;
pub const DATA_SOURCE_CAP: usize = 5;
pub const EXTERNAL_SERVICE_CAP: usize = 8;
pub const CONFIGURATION_CAP: usize = 10;
pub const DEPENDENCY_CAP: usize = 15;

const CONFIGURATION_KINDS: &[&str] = &["property-placeholder", "propertyPlaceholder"];
const DECLARATION_KINDS: &[&str] = &["bean", "reference"];

/// One labelled category of fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentGroup<'a> {
    pub label: &'static str,
    pub fragments: Vec<&'a str>,
    /// Matching elements before the cap was applied.
    pub total: usize,
}

impl FragmentGroup<'_> {
    pub fn heading(&self) -> String {
        if self.total > self.fragments.len() {
            format!("<!-- {} (showing {} of {}) -->", self.label, self.fragments.len(), self.total)
        } else {
            format!("<!-- {} ({}) -->", self.label, self.total)
        }
    }
}

/// Element-level view of a document used to cut fragments.
pub struct FragmentScanner<'a> {
    raw: &'a str,
    masked: String,
    index: TagIndex,
}

impl<'a> FragmentScanner<'a> {
    pub fn new(raw: &'a str) -> Self {
        let masked = mask_inert(raw);
        let index = TagIndex::build(&masked);
        Self { raw, masked, index }
    }

    fn root(&self) -> Option<&RawTag> {
        self.index.tags().first()
    }

    /// Everything from the start of the text through the root opening tag.
    pub fn header(&self) -> &'a str {
        let raw = self.raw;
        self.root().map_or("", |root| &raw[..root.end])
    }

    /// Closing tag of the root element, empty when there is no root or the
    /// root closes itself.
    pub fn footer(&self) -> String {
        match self.root() {
            Some(root) if !root.self_closing => format!("</{}>", root.name),
            _ => String::new(),
        }
    }

    pub fn routes(&self) -> FragmentGroup<'a> {
        self.group("Routes", ROUTE_CAP, |tag| tag.is("route"))
    }

    pub fn data_sources(&self) -> FragmentGroup<'a> {
        self.group("Data sources", DATA_SOURCE_CAP, is_data_source_declaration)
    }

    pub fn external_services(&self) -> FragmentGroup<'a> {
        self.group("External service endpoints", EXTERNAL_SERVICE_CAP, |tag| {
            self.index.is_endpoint_declaration(tag)
        })
    }

    pub fn configuration(&self) -> FragmentGroup<'a> {
        self.group("Configuration", CONFIGURATION_CAP, |tag| tag.is_any(CONFIGURATION_KINDS))
    }

    pub fn dependencies(&self) -> FragmentGroup<'a> {
        self.group("Beans and service references", DEPENDENCY_CAP, |tag| {
            tag.is_any(DECLARATION_KINDS) && !is_data_source_declaration(tag)
        })
    }

    /// Top-level matches only: an element nested inside an earlier match of
    /// the same group is already part of that fragment.
    fn group(
        &self,
        label: &'static str,
        cap: usize,
        matches: impl Fn(&RawTag) -> bool,
    ) -> FragmentGroup<'a> {
        let raw = self.raw;
        let mut fragments = Vec::new();
        let mut total = 0usize;
        let mut covered_to = 0usize;

        for (position, tag) in self.index.tags().iter().enumerate().skip(1) {
            if tag.offset < covered_to || !matches(tag) {
                continue;
            }
            let end = self.element_end(position);
            covered_to = end;
            total += 1;
            if fragments.len() < cap {
                fragments.push(&raw[tag.offset..end]);
            }
        }

        FragmentGroup { label, fragments, total }
    }

    /// Byte offset one past the end of the element opened by the tag at
    /// `position`. An element whose end tag is missing is cut to its start tag.
    fn element_end(&self, position: usize) -> usize {
        let tags = self.index.tags();
        let start = &tags[position];
        if start.self_closing {
            return start.end;
        }

        let mut depth = 1usize;
        let mut cursor = start.end;
        let mut next_open = tags[position + 1..]
            .iter()
            .filter(|t| t.name == start.name && !t.self_closing)
            .map(|t| (t.offset, t.end))
            .peekable();

        while let Some((close_at, close_end)) = find_end_tag(&self.masked, &start.name, cursor) {
            while let Some(&(open_at, open_end)) = next_open.peek() {
                if open_at >= close_at {
                    break;
                }
                next_open.next();
                if open_at >= cursor {
                    depth += 1;
                    cursor = cursor.max(open_end);
                }
            }
            depth -= 1;
            cursor = close_end;
            if depth == 0 {
                return close_end;
            }
        }
        start.end
    }
}

fn is_data_source_declaration(tag: &RawTag) -> bool {
    if tag.is("bean") {
        return tag.attr("class").is_some_and(is_data_source_class);
    }
    tag.is("reference") && tag.attr("interface") == Some("javax.sql.DataSource")
}

/// Find `</name>` (optionally with whitespace before `>`) at or after `from`.
/// Returns (start of `</`, one past `>`).
fn find_end_tag(text: &str, name: &str, from: usize) -> Option<(usize, usize)> {
    let needle = format!("</{}", name);
    let mut search = from;
    while let Some(found) = text[search..].find(&needle) {
        let at = search + found;
        let after = at + needle.len();
        let rest = &text[after..];
        let trimmed = rest.trim_start();
        if trimmed.starts_with('>') {
            let gt = after + (rest.len() - trimmed.len());
            return Some((at, gt + 1));
        }
        search = after;
    }
    None
}
