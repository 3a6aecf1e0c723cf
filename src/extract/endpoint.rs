//! Endpoint classification by URI scheme.
//!
//! ORDER MATTERS: the first row whose prefix the address starts with wins, so
//! more specific prefixes (`direct-vm:`) must precede shorter ones (`direct:`).

use crate::domain::SchemeEntry;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointClass {
    pub protocol: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
}

impl EndpointClass {
    fn other() -> Self {
        Self { protocol: "Other".to_string(), kind: "Other".to_string(), path: String::new() }
    }
}

/// (prefix, protocol, type)
pub const BUILTIN_SCHEMES: &[(&str, &str, &str)] = &[
    ("rest:", "HTTP", "REST"),
    ("cxfrs:", "HTTP", "REST"),
    ("cxf:", "SOAP", "SOAP"),
    ("https:", "HTTPS", "HTTP"),
    ("http:", "HTTP", "HTTP"),
    ("direct-vm:", "Direct-VM", "Internal"),
    ("direct:", "Direct", "Internal"),
    ("vm:", "VM", "Internal"),
    ("seda:", "SEDA", "Internal"),
    ("timer:", "Timer", "Scheduled"),
    ("quartz:", "Quartz", "Scheduled"),
    ("file:", "File", "File System"),
    ("sftp:", "SFTP", "File Transfer"),
    ("ftp:", "FTP", "File Transfer"),
    ("jms:", "JMS", "Message Queue"),
    ("activemq:", "ActiveMQ", "Message Queue"),
    ("amqp:", "AMQP", "Message Queue"),
    ("kafka:", "Kafka", "Message Queue"),
    ("sql:", "SQL", "Database"),
    ("jdbc:", "JDBC", "Database"),
];

/// Ordered, first-match-wins scheme table.
#[derive(Debug, Clone)]
pub struct EndpointTable {
    rows: Vec<SchemeEntry>,
}

impl Default for EndpointTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EndpointTable {
    pub fn builtin() -> Self {
        Self::with_extensions(&[])
    }

    /// Caller rows are tested before the built-in ones.
    pub fn with_extensions(extra: &[SchemeEntry]) -> Self {
        let mut rows: Vec<SchemeEntry> =
            extra.iter().filter(|row| !row.prefix.is_empty()).cloned().collect();
        rows.extend(BUILTIN_SCHEMES.iter().map(|(prefix, protocol, kind)| SchemeEntry {
            prefix: (*prefix).to_string(),
            protocol: (*protocol).to_string(),
            kind: (*kind).to_string(),
        }));
        Self { rows }
    }

    pub fn rows(&self) -> &[SchemeEntry] {
        &self.rows
    }

    pub fn classify(&self, address: &str) -> EndpointClass {
        let address = address.trim();
        self.rows
            .iter()
            .find(|row| address.starts_with(row.prefix.as_str()))
            .map(|row| EndpointClass {
                protocol: row.protocol.clone(),
                kind: row.kind.clone(),
                path: endpoint_path(&address[row.prefix.len()..]),
            })
            .unwrap_or_else(EndpointClass::other)
    }
}

/// Classify against the built-in table only.
pub fn classify(address: &str) -> EndpointClass {
    EndpointTable::builtin().classify(address)
}

fn endpoint_path(remainder: &str) -> String {
    let remainder = remainder.strip_prefix("//").unwrap_or(remainder);
    remainder.split_once('?').map_or(remainder, |(path, _)| path).to_string()
}
