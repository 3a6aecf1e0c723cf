//! Raw-text tag index used by the detection rules.
//!
//! Detection works on the source text rather than the element tree: tags are
//! matched with a regex, comments and CDATA sections are blanked out first
//! (keeping offsets and line breaks), and an id → tag lookup is built once
//! per pass.

use crate::parse::{parse_attributes, tag_matches};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static START_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<([A-Za-z_][-A-Za-z0-9_.]*(?::[A-Za-z_][-A-Za-z0-9_.]*)?)((?:[^<>"']|"[^"]*"|'[^']*')*)>"#)
        .expect("valid start tag regex")
});

static INERT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<!--.*?-->|<!\[CDATA\[.*?\]\]>").expect("valid comment/CDATA regex")
});

/// CXF declaration kinds recognised by local name alone.
const CXF_ENDPOINT_KINDS: &[&str] = &["cxfEndpoint", "rsClient", "rsServer"];

/// Flavour of a `<prefix:client>` declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientFlavor {
    JaxRs,
    JaxWs,
}

#[derive(Debug, Clone)]
pub struct RawTag {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    /// Byte offset of `<` in the source text.
    pub offset: usize,
    /// Byte offset one past the closing `>`.
    pub end: usize,
    /// Zero-based line of `<`.
    pub line: usize,
    pub self_closing: bool,
}

impl RawTag {
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn is(&self, query: &str) -> bool {
        tag_matches(&self.name, query)
    }

    pub fn is_any(&self, queries: &[&str]) -> bool {
        queries.iter().any(|q| self.is(q))
    }
}

/// Every start tag of a document plus an id lookup.
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    tags: Vec<RawTag>,
    by_id: HashMap<String, Vec<usize>>,
    /// Prefix → namespace URI, first `xmlns:<prefix>` declaration in the document wins.
    namespaces: HashMap<String, String>,
}

impl TagIndex {
    pub fn build(text: &str) -> Self {
        let mut tags = Vec::new();
        let mut by_id: HashMap<String, Vec<usize>> = HashMap::new();
        let mut namespaces: HashMap<String, String> = HashMap::new();
        let mut line = 0usize;
        let mut counted_to = 0usize;

        for caps in START_TAG_RE.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            line += text[counted_to..whole.start()].matches('\n').count();
            counted_to = whole.start();

            let raw_attributes = caps.get(2).map_or("", |m| m.as_str());
            let self_closing = raw_attributes.ends_with('/');
            let raw_attributes = raw_attributes.strip_suffix('/').unwrap_or(raw_attributes);
            let tag = RawTag {
                name: caps[1].to_string(),
                attributes: parse_attributes(raw_attributes),
                offset: whole.start(),
                end: whole.end(),
                line,
                self_closing,
            };
            if let Some(id) = tag.attr("id") {
                by_id.entry(id.to_string()).or_default().push(tags.len());
            }
            for (key, value) in &tag.attributes {
                if let Some(prefix) = key.strip_prefix("xmlns:") {
                    namespaces.entry(prefix.to_string()).or_insert_with(|| value.clone());
                }
            }
            tags.push(tag);
        }

        Self { tags, by_id, namespaces }
    }

    pub fn tags(&self) -> &[RawTag] {
        &self.tags
    }

    pub fn tags_named<'a>(&'a self, queries: &'a [&'a str]) -> impl Iterator<Item = &'a RawTag> + 'a {
        self.tags.iter().filter(move |t| t.is_any(queries))
    }

    /// JAX-RS or JAX-WS flavour of a `<prefix:client>` element, judged by the
    /// namespace bound to `prefix`, or by the prefix itself when it is unbound.
    pub fn client_flavor(&self, tag: &RawTag) -> Option<ClientFlavor> {
        let (prefix, local) = tag.name.split_once(':')?;
        if local != "client" {
            return None;
        }
        let marker = self.namespaces.get(prefix).map_or(prefix, String::as_str);
        if marker.contains("jaxrs") {
            Some(ClientFlavor::JaxRs)
        } else if marker.contains("jaxws") {
            Some(ClientFlavor::JaxWs)
        } else {
            None
        }
    }

    /// `cxfEndpoint`, `rsClient`, `rsServer` or a JAX-RS/JAX-WS client.
    pub fn is_endpoint_declaration(&self, tag: &RawTag) -> bool {
        tag.is_any(CXF_ENDPOINT_KINDS) || self.client_flavor(tag).is_some()
    }

    /// Locate the endpoint declaration for `id`.
    ///
    /// A known endpoint kind carrying an `address` wins; otherwise any element
    /// with that id and an `address` attribute is accepted.
    pub fn resolve_endpoint(&self, id: &str) -> Option<&RawTag> {
        let candidates: Vec<&RawTag> = self
            .by_id
            .get(id)
            .map(|idxs| idxs.iter().map(|&i| &self.tags[i]).collect())
            .unwrap_or_default();

        candidates
            .iter()
            .find(|t| self.is_endpoint_declaration(t) && t.attr("address").is_some())
            .or_else(|| candidates.iter().find(|t| t.attr("address").is_some()))
            .copied()
    }
}

/// Replace comments and CDATA sections with spaces, preserving byte offsets
/// and newlines.
pub fn mask_inert(text: &str) -> String {
    INERT_RE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            caps[0]
                .chars()
                .map(|c| if c == '\n' { "\n".to_string() } else { " ".repeat(c.len_utf8()) })
                .collect::<String>()
        })
        .into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientScheme {
    Cxf,
    CxfRs,
}

impl ClientScheme {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Cxf => "cxf:",
            Self::CxfRs => "cxfrs:",
        }
    }

    pub fn service_type(self) -> &'static str {
        match self {
            Self::Cxf => "SOAP Service",
            Self::CxfRs => "REST Client",
        }
    }

    pub fn protocol(self) -> &'static str {
        match self {
            Self::Cxf => "SOAP",
            Self::CxfRs => "REST",
        }
    }

    pub fn generic_name(self) -> &'static str {
        match self {
            Self::Cxf => "SOAP Service",
            Self::CxfRs => "REST Service",
        }
    }
}

/// Producer instructions: `to` and the dynamic/conditional `toD`.
pub const PRODUCER_TAGS: &[&str] = &["to", "toD"];

/// An outbound CXF call: a producer instruction with a `cxf:`/`cxfrs:` URI.
#[derive(Debug, Clone)]
pub struct ClientSite {
    pub scheme: ClientScheme,
    pub uri: String,
    pub line: usize,
}

impl ClientSite {
    /// URI text after the scheme, without a leading `//`.
    pub fn target(&self) -> &str {
        let rest = &self.uri[self.scheme.prefix().len()..];
        rest.strip_prefix("//").unwrap_or(rest)
    }

    /// The id of a `bean:<id>` target, without query options.
    pub fn bean_ref(&self) -> Option<&str> {
        let id = self.target().strip_prefix("bean:")?;
        let id = strip_query(id).trim();
        (!id.is_empty()).then_some(id)
    }
}

pub fn client_sites(index: &TagIndex) -> Vec<ClientSite> {
    index
        .tags_named(PRODUCER_TAGS)
        .filter_map(|tag| {
            let uri = tag.attr("uri")?;
            let scheme = if uri.starts_with("cxfrs:") {
                ClientScheme::CxfRs
            } else if uri.starts_with("cxf:") {
                ClientScheme::Cxf
            } else {
                return None;
            };
            Some(ClientSite { scheme, uri: uri.to_string(), line: tag.line })
        })
        .collect()
}

pub fn strip_query(uri: &str) -> &str {
    uri.split_once('?').map_or(uri, |(head, _)| head)
}

const LOOPBACK_TOKENS: &[&str] = &["localhost", "127.0.0.1", "0.0.0.0", "[::1]"];

pub fn is_literal_address(address: &str) -> bool {
    let address = address.trim();
    address.starts_with('/') || address.contains("://")
}

pub fn has_loopback_host(address: &str) -> bool {
    let lower = address.to_ascii_lowercase();
    LOOPBACK_TOKENS.iter().any(|token| lower.contains(token))
}
