//! Bracket-style configuration placeholders.
//!
//! ORDER MATTERS: the forms are tried in this order and the first one found
//! anywhere in the text decides the extracted name.

/// (open, close)
pub const BRACKET_FORMS: [(&str, &str); 4] = [("[{", "}]"), ("{[", "]}"), ("{{", "}}"), ("[[", "]]")];

/// The two forms that mark a deployment-local value when they wrap a whole address.
const LOCAL_STYLE_FORMS: [(&str, &str); 2] = [("{[", "]}"), ("[[", "]]")];

/// Inner name of the first bracket placeholder found in `text`.
pub fn extract_placeholder(text: &str) -> Option<String> {
    BRACKET_FORMS.iter().find_map(|(open, close)| inner_name(text, open, close))
}

fn inner_name(text: &str, open: &str, close: &str) -> Option<String> {
    let start = text.find(open)? + open.len();
    let len = text[start..].find(close)?;
    let inner = text[start..start + len].trim();
    (!inner.is_empty()).then(|| inner.to_string())
}

/// Whether the whole address is a `{[ ]}` or `[[ ]]` placeholder.
pub fn is_local_style_placeholder(address: &str) -> bool {
    let address = address.trim();
    LOCAL_STYLE_FORMS.iter().any(|(open, close)| {
        address.len() > open.len() + close.len()
            && address.starts_with(open)
            && address.ends_with(close)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_form_extracts_inner_name() {
        assert_eq!(extract_placeholder("[{cfg.partner.url}]").as_deref(), Some("cfg.partner.url"));
        assert_eq!(extract_placeholder("{[cfg.partner.url]}").as_deref(), Some("cfg.partner.url"));
        assert_eq!(extract_placeholder("{{cfg.partner.url}}").as_deref(), Some("cfg.partner.url"));
        assert_eq!(extract_placeholder("[[cfg.partner.url]]").as_deref(), Some("cfg.partner.url"));
    }

    #[test]
    fn embedded_placeholder_is_found() {
        assert_eq!(
            extract_placeholder("https://{{partner.host}}/api").as_deref(),
            Some("partner.host")
        );
    }

    #[test]
    fn earlier_form_wins_when_several_present() {
        assert_eq!(extract_placeholder("{{second}} [{first}]").as_deref(), Some("first"));
        assert_eq!(extract_placeholder("[[fourth]] {{third}}").as_deref(), Some("third"));
    }

    #[test]
    fn literal_or_empty_placeholder_is_none() {
        assert_eq!(extract_placeholder("https://partner.example.com/ws"), None);
        assert_eq!(extract_placeholder("{{ }}"), None);
        assert_eq!(extract_placeholder("[{unclosed"), None);
    }

    #[test]
    fn local_style_wrapping() {
        assert!(is_local_style_placeholder("{[local.url]}"));
        assert!(is_local_style_placeholder(" [[local.url]] "));
        assert!(!is_local_style_placeholder("{{remote.url}}"));
        assert!(!is_local_style_placeholder("[{remote.url}]"));
        assert!(!is_local_style_placeholder("https://h/{[x]}"));
    }
}
