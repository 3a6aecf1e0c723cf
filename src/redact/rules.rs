//! Redaction rules
//!
//! ORDER MATTERS: specific patterns (PEM blocks, JWTs, cloud keys) must come
//! BEFORE the credential-slot patterns (connection strings, `password=`
//! options, password-like properties). A JWT inside a property value is then
//! reported as [JWT_TOKEN_REDACTED] rather than a generic secret.
//!
//! Rules that target a value slot capture it as the `secret` group. When
//! `skip_placeholders` is set and that slot holds a configuration
//! placeholder (`${db.password}`, `{{db.password}}`, ...) or an earlier
//! rule's marker, the match is left untouched.

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Clone)]
pub struct RedactionRule {
    pub name: &'static str,
    pub pattern: Regex,
    pub replacement: &'static str,
    pub skip_placeholders: bool,
}

/// Placeholder openers recognised in value slots.
pub const PLACEHOLDER_OPENERS: &[&str] = &["${", "$[", "{{", "[{", "{[", "[["];

pub fn is_exempt_value(value: &str) -> bool {
    let value = value.trim();
    PLACEHOLDER_OPENERS.iter().any(|open| value.starts_with(open)) || value.contains("_REDACTED]")
}

pub static DEFAULT_RULES: Lazy<Vec<RedactionRule>> = Lazy::new(|| {
    vec![
        // ── Private keys (PEM blocks) ─────────────────────────────────────────────
        RedactionRule {
            name: "private_key",
            pattern: Regex::new(
                r"-----BEGIN\s+(?:RSA\s+|DSA\s+|EC\s+|ENCRYPTED\s+|OPENSSH\s+)?PRIVATE\s+KEY-----[\s\S]*?-----END\s+(?:RSA\s+|DSA\s+|EC\s+|ENCRYPTED\s+|OPENSSH\s+)?PRIVATE\s+KEY-----",
            )
            .expect("valid regex"),
            replacement: "[PRIVATE_KEY_REDACTED]",
            skip_placeholders: false,
        },
        // ── JWT ──────────────────────────────────────────────────────────────────
        RedactionRule {
            name: "jwt_token",
            pattern: Regex::new(r"\beyJ[A-Za-z0-9\-_]+\.eyJ[A-Za-z0-9\-_]+\.[A-Za-z0-9\-_]+")
                .expect("valid regex"),
            replacement: "[JWT_TOKEN_REDACTED]",
            skip_placeholders: false,
        },
        // ── AWS ──────────────────────────────────────────────────────────────────
        RedactionRule {
            name: "aws_access_key",
            pattern: Regex::new(r"\bAKIA[0-9A-Z]{16}\b").expect("valid regex"),
            replacement: "[AWS_ACCESS_KEY_REDACTED]",
            skip_placeholders: false,
        },
        // ── Connection strings ────────────────────────────────────────────────────
        RedactionRule {
            name: "connection_string",
            pattern: Regex::new(
                r#"((?:jdbc:)?(?:postgres(?:ql)?|mysql|mariadb|sqlserver|oracle|mongodb|redis|amqps?)://[^:/@\s"'<>]+:)(?P<secret>[^@\s"'<>]+)(@)"#,
            )
            .expect("valid regex"),
            replacement: "${1}[PASSWORD_REDACTED]${3}",
            skip_placeholders: true,
        },
        // ── Basic auth in URLs ────────────────────────────────────────────────────
        RedactionRule {
            name: "url_auth",
            pattern: Regex::new(r#"(https?://[^:/@\s"'<>]+:)(?P<secret>[^@\s"'<>]+)(@)"#)
                .expect("valid regex"),
            replacement: "${1}[PASSWORD_REDACTED]${3}",
            skip_placeholders: true,
        },
        // ── Endpoint options (`?password=...&...`) ───────────────────────────────
        RedactionRule {
            name: "uri_password_option",
            pattern: Regex::new(
                r#"(?i)([?&;](?:password|passwd|pwd|secret|accessKey|secretKey|token|apiKey)=)(?P<secret>[^&;"'\s<>]+)"#,
            )
            .expect("valid regex"),
            replacement: "${1}[SECRET_REDACTED]",
            skip_placeholders: true,
        },
        // ── Password-like properties ─────────────────────────────────────────────
        // Must come AFTER the specific rules so their replacements win.
        RedactionRule {
            name: "secret_property",
            pattern: Regex::new(
                r#"(?i)(<(?:[\w.-]+:)?(?:property|entry)\b[^>]*?\b(?:name|key)\s*=\s*["'][^"']*(?:password|passwd|pwd|secret|token|credential|api[._-]?key)[^"']*["'][^>]*?\bvalue\s*=\s*["'])(?P<secret>[^"']+)(["'])"#,
            )
            .expect("valid regex"),
            replacement: "${1}[SECRET_REDACTED]${3}",
            skip_placeholders: true,
        },
        // ── HTTP Authorization values ─────────────────────────────────────────────
        RedactionRule {
            name: "auth_bearer",
            pattern: Regex::new(r"(?i)(Bearer\s+)(?P<secret>[A-Za-z0-9\-_.~+/]{20,}=*)")
                .expect("valid regex"),
            replacement: "${1}[BEARER_TOKEN_REDACTED]",
            skip_placeholders: false,
        },
    ]
});
