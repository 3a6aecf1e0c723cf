//! Blueprint decoding with BOM and charset detection.
//!
//! Blueprint files in older bundles are not always UTF-8. Decoding follows
//! this order:
//! - BOM detection (UTF-8, UTF-16 LE/BE)
//! - strict UTF-8 fast path
//! - the `encoding="..."` label of the XML declaration, when recognised
//! - fallback detection using chardetng
//!
//! Invalid sequences are replaced rather than rejected, so decoding itself
//! never fails.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use std::path::Path;

const DECLARATION_SAMPLE: usize = 256;

static DECLARED_ENCODING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*<\?xml[^>]*\bencoding\s*=\s*["']([A-Za-z0-9._-]+)["']"#)
        .expect("valid xml declaration regex")
});

/// Decode raw bytes into text.
///
/// # Returns
/// A tuple `(content, encoding_used)` with a lowercase encoding label
/// (e.g. "utf-8", "utf-8-sig", "utf-16le", "windows-1252").
pub fn decode_bytes(bytes: &[u8]) -> (String, String) {
    if let Some(rest) = bytes.strip_prefix(&[0xef, 0xbb, 0xbf]) {
        let (text, _) = UTF_8.decode_without_bom_handling(rest);
        return (text.into_owned(), "utf-8-sig".to_string());
    }
    if let Some(rest) = bytes.strip_prefix(&[0xff, 0xfe]) {
        let (text, _) = UTF_16LE.decode_without_bom_handling(rest);
        return (text.into_owned(), "utf-16le".to_string());
    }
    if let Some(rest) = bytes.strip_prefix(&[0xfe, 0xff]) {
        let (text, _) = UTF_16BE.decode_without_bom_handling(rest);
        return (text.into_owned(), "utf-16be".to_string());
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return (text.to_string(), "utf-8".to_string());
    }

    let encoding = declared_encoding(bytes).unwrap_or_else(|| {
        let mut detector = EncodingDetector::new();
        detector.feed(bytes, true);
        detector.guess(None, true)
    });
    let (text, _, _) = encoding.decode(bytes);
    (text.into_owned(), encoding.name().to_lowercase())
}

/// The encoding named by the XML declaration, ignoring UTF-16 labels on a
/// byte stream that was readable as ASCII.
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let sample = &bytes[..bytes.len().min(DECLARATION_SAMPLE)];
    let caps = DECLARED_ENCODING_RE.captures(sample)?;
    let encoding = Encoding::for_label(caps.get(1)?.as_bytes())?;
    (encoding != UTF_16LE && encoding != UTF_16BE).then_some(encoding)
}

/// Read and decode a blueprint file.
pub fn read_blueprint(path: &Path) -> std::io::Result<(String, String)> {
    let bytes = std::fs::read(path)?;
    Ok(decode_bytes(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_plain_utf8() {
        let (text, enc) = decode_bytes("<blueprint>🚀</blueprint>".as_bytes());
        assert_eq!(text, "<blueprint>🚀</blueprint>");
        assert_eq!(enc, "utf-8");
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let mut bytes = vec![0xef, 0xbb, 0xbf];
        bytes.extend_from_slice(b"<blueprint/>");
        let (text, enc) = decode_bytes(&bytes);
        assert_eq!(text, "<blueprint/>");
        assert_eq!(enc, "utf-8-sig");
    }

    #[test]
    fn test_utf16le_bom() {
        let mut bytes = vec![0xff, 0xfe];
        for unit in "<a/>".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let (text, enc) = decode_bytes(&bytes);
        assert_eq!(text, "<a/>");
        assert_eq!(enc, "utf-16le");
    }

    #[test]
    fn test_declared_latin1() {
        let mut bytes = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><d>caf".to_vec();
        bytes.push(0xe9);
        bytes.extend_from_slice(b"</d>");
        let (text, enc) = decode_bytes(&bytes);
        assert!(text.contains("café"));
        assert_eq!(enc, "windows-1252");
    }

    #[test]
    fn test_read_blueprint_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"<blueprint/>").unwrap();
        file.flush().unwrap();

        let (text, enc) = read_blueprint(file.path()).unwrap();
        assert_eq!(text, "<blueprint/>");
        assert_eq!(enc, "utf-8");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_blueprint(Path::new("/definitely/not/here.xml")).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
