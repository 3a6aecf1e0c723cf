//! Detection rules. Each rule scans the document independently and returns
//! candidate records in document order.

use super::placeholder::{extract_placeholder, is_local_style_placeholder};
use super::scan::{
    has_loopback_host, is_literal_address, strip_query, ClientFlavor, ClientScheme, ClientSite, RawTag,
    TagIndex, PRODUCER_TAGS,
};
use crate::domain::ExternalService;
use std::collections::BTreeSet;

/// Everything a rule may look at for one document.
pub struct DetectionContext<'a> {
    /// Source text with comments blanked out.
    pub text: &'a str,
    pub index: TagIndex,
    pub client_sites: Vec<ClientSite>,
}

pub trait DetectionRule {
    fn name(&self) -> &'static str;
    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<ExternalService>;
}

/// Rule order is merge order: earlier rules win deduplication.
pub fn default_rules() -> Vec<Box<dyn DetectionRule + Send + Sync>> {
    vec![
        Box::new(ClientSiteRule),
        Box::new(DeclaredClientRule),
        Box::new(ReferencedEndpointRule),
        Box::new(HttpProducerRule),
    ]
}

/// Local for declaration scanning: loopback host, relative path, or wrapped in
/// one of the local-style placeholder forms.
pub fn is_local_declaration(address: &str) -> bool {
    let address = address.trim();
    address.starts_with('/') || has_loopback_host(address) || is_local_style_placeholder(address)
}

/// Local for call sites: only literal addresses can be judged.
fn is_local_literal(address: &str) -> bool {
    is_literal_address(address) && (address.trim().starts_with('/') || has_loopback_host(address))
}

/// Split a declared address into (endpoint, config property).
fn endpoint_from_address(address: &str) -> (String, Option<String>) {
    if is_literal_address(address) {
        return (address.to_string(), None);
    }
    match extract_placeholder(address) {
        Some(name) => (name.clone(), Some(name)),
        None => (address.to_string(), None),
    }
}

/// `to`/`toD` instructions addressed with `cxf:` or `cxfrs:`.
pub struct ClientSiteRule;

impl ClientSiteRule {
    fn resolve(&self, ctx: &DetectionContext<'_>, site: &ClientSite) -> ExternalService {
        let scheme = site.scheme;
        let base = |name: String, endpoint: String, description: String, config: Option<String>| {
            ExternalService {
                name,
                endpoint,
                kind: scheme.service_type().to_string(),
                protocol: scheme.protocol().to_string(),
                description,
                config_property: config,
            }
        };
        let label = match scheme {
            ClientScheme::Cxf => "SOAP",
            ClientScheme::CxfRs => "REST",
        };

        if let Some(id) = site.bean_ref() {
            return match ctx.index.resolve_endpoint(id).and_then(|t| t.attr("address")) {
                Some(address) => {
                    let (endpoint, config) = endpoint_from_address(address);
                    base(
                        id.to_string(),
                        endpoint,
                        format!("{} client call via {}", label, strip_query(&site.uri)),
                        config,
                    )
                }
                None => base(
                    id.to_string(),
                    strip_query(&site.uri).to_string(),
                    format!(
                        "{} client call via {} (endpoint declaration not found)",
                        label,
                        strip_query(&site.uri)
                    ),
                    None,
                ),
            };
        }

        let target = site.target();
        if let Some(name) = extract_placeholder(target) {
            return base(
                name.clone(),
                name.clone(),
                format!("{} client addressed by placeholder {}", label, name),
                Some(name),
            );
        }

        base(
            scheme.generic_name().to_string(),
            strip_query(target).to_string(),
            format!("{} client call via {}", label, strip_query(&site.uri)),
            None,
        )
    }
}

impl DetectionRule for ClientSiteRule {
    fn name(&self) -> &'static str {
        "client-sites"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<ExternalService> {
        ctx.client_sites
            .iter()
            .map(|site| self.resolve(ctx, site))
            .filter(|svc| svc.config_property.is_some() || !is_local_literal(&svc.endpoint))
            .collect()
    }
}

/// `rsClient` and JAX-RS/JAX-WS `client` declarations. A `client` element is
/// recognised by the namespace its prefix is bound to, so `rs:client` bound to
/// the CXF JAX-RS namespace counts as much as `jaxrs:client`.
pub struct DeclaredClientRule;

impl DetectionRule for DeclaredClientRule {
    fn name(&self) -> &'static str {
        "declared-clients"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<ExternalService> {
        ctx.index
            .tags()
            .iter()
            .filter_map(|tag| {
                let (tag_name, kind, protocol) = if tag.is("rsClient") {
                    ("rsClient", "REST Client", "REST")
                } else {
                    match ctx.index.client_flavor(tag)? {
                        ClientFlavor::JaxRs => ("jaxrs:client", "REST Client", "REST"),
                        ClientFlavor::JaxWs => ("jaxws:client", "SOAP Service", "SOAP"),
                    }
                };
                declared_service(tag, kind, protocol, &format!("Declared {} ({})", kind, tag_name))
            })
            .collect()
    }
}

/// `cxfEndpoint`/`rsServer` declarations referenced from a client site.
pub struct ReferencedEndpointRule;

impl DetectionRule for ReferencedEndpointRule {
    fn name(&self) -> &'static str {
        "referenced-endpoints"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<ExternalService> {
        let referenced: BTreeSet<&str> =
            ctx.client_sites.iter().filter_map(ClientSite::bean_ref).collect();

        ctx.index
            .tags_named(&["cxfEndpoint", "rsServer"])
            .filter(|tag| tag.attr("id").is_some_and(|id| referenced.contains(id)))
            .filter_map(|tag| {
                let (kind, protocol) =
                    if tag.is("rsServer") { ("REST Client", "REST") } else { ("SOAP Service", "SOAP") };
                declared_service(tag, kind, protocol, "Endpoint declaration used by an outbound call")
            })
            .collect()
    }
}

fn declared_service(tag: &RawTag, kind: &str, protocol: &str, description: &str) -> Option<ExternalService> {
    let address = tag.attr("address")?;
    if is_local_declaration(address) {
        return None;
    }
    let (endpoint, config) = endpoint_from_address(address);
    let name = tag.attr("id").map(str::to_string).unwrap_or_else(|| endpoint.clone());
    Some(ExternalService {
        name,
        endpoint,
        kind: kind.to_string(),
        protocol: protocol.to_string(),
        description: description.to_string(),
        config_property: config,
    })
}

/// (scheme prefix, protocol)
const HTTP_SCHEMES: &[(&str, &str)] = &[
    ("https4:", "HTTPS"),
    ("http4:", "HTTP"),
    ("https:", "HTTPS"),
    ("http:", "HTTP"),
    ("netty-http:", "HTTP"),
];

/// Plain HTTP producers calling a non-local host.
pub struct HttpProducerRule;

impl DetectionRule for HttpProducerRule {
    fn name(&self) -> &'static str {
        "http-producers"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<ExternalService> {
        ctx.index
            .tags_named(PRODUCER_TAGS)
            .filter_map(|tag| {
                let uri = tag.attr("uri")?;
                let (prefix, protocol) =
                    HTTP_SCHEMES.iter().find(|(prefix, _)| uri.starts_with(prefix))?;
                let endpoint = strip_query(uri);
                let protocol = if *prefix == "netty-http:" && endpoint.contains("https://") {
                    "HTTPS"
                } else {
                    *protocol
                };

                if let Some(name) = extract_placeholder(endpoint) {
                    return Some(ExternalService {
                        name: name.clone(),
                        endpoint: name.clone(),
                        kind: "HTTP Client".to_string(),
                        protocol: protocol.to_string(),
                        description: format!("HTTP call via {}", endpoint),
                        config_property: Some(name),
                    });
                }

                let host = host_of(&endpoint[prefix.len()..])?;
                if has_loopback_host(host) || host == "::1" {
                    return None;
                }
                Some(ExternalService {
                    name: host.to_string(),
                    endpoint: endpoint.to_string(),
                    kind: "HTTP Client".to_string(),
                    protocol: protocol.to_string(),
                    description: format!("HTTP call via {}", endpoint),
                    config_property: None,
                })
            })
            .collect()
    }
}

/// Host (without port) of an address remainder such as `//host:8080/path`.
fn host_of(remainder: &str) -> Option<&str> {
    let rest = remainder.trim_start_matches("http://").trim_start_matches("https://");
    let rest = rest.trim_start_matches('/');
    let authority = rest.split('/').next().unwrap_or("");
    let authority = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    let host = if authority.starts_with('[') {
        authority.split_once(']').map_or(authority, |(h, _)| h).trim_start_matches('[')
    } else {
        authority.split(':').next().unwrap_or("")
    };
    (!host.is_empty()).then_some(host)
}
