//! Charset detection and byte-to-text decoding.

use std::borrow::Cow;

use encoding_rs::{BIG5, Encoding, GBK, SHIFT_JIS, UTF_8, WINDOWS_1252};

/// Encodings tried, in order, when the body is neither valid UTF-8 nor
/// decodable with its declared charset.
///
/// `iso-8859-1` resolves to the same decoder as `windows-1252` under the
/// WHATWG label table and is therefore not listed twice.
#[must_use]
pub fn default_fallbacks() -> Vec<&'static Encoding> {
    vec![WINDOWS_1252, SHIFT_JIS, GBK, BIG5]
}

/// Extracts the `charset` parameter from a `Content-Type` value.
///
/// Returns `None` when the value has no charset parameter.
#[must_use]
pub fn extract_charset(content_type: &str) -> Option<String> {
    if let Ok(parsed) = content_type.parse::<mime::Mime>() {
        return parsed
            .get_param(mime::CHARSET)
            .map(|name| name.as_str().trim_matches('"').to_string());
    }

    // Not a well-formed media type; look for the parameter by hand.
    let lower = content_type.to_ascii_lowercase();
    let idx = lower.rfind("charset=")?;
    let value = content_type[idx + "charset=".len()..]
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches('"');
    (!value.is_empty()).then(|| value.to_string())
}

/// Decodes `bytes` into text, never failing.
///
/// 1. A declared non-UTF-8 charset is tried first and used if it decodes
///    without errors.
/// 2. Otherwise the bytes are validated as UTF-8.
/// 3. Otherwise each fallback encoding is tried in order.
/// 4. Otherwise invalid sequences become U+FFFD.
#[must_use]
pub fn decode_bytes<'a>(
    bytes: &'a [u8],
    charset: Option<&str>,
    fallbacks: &[&'static Encoding],
) -> Cow<'a, str> {
    if let Some(encoding) = charset.and_then(|label| Encoding::for_label(label.trim().as_bytes()))
        && encoding != UTF_8
        && let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes)
    {
        return text;
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Cow::Borrowed(text);
    }

    for encoding in fallbacks {
        if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes) {
            tracing::debug!(encoding = encoding.name(), "decoded body with fallback encoding");
            return text;
        }
    }

    String::from_utf8_lossy(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn charset_from_content_type() {
        assert_eq!(
            extract_charset("text/html; charset=ISO-8859-1").map(|c| c.to_ascii_lowercase()),
            Some("iso-8859-1".to_string())
        );
        assert_eq!(
            extract_charset("application/json;charset=\"utf-8\"").as_deref(),
            Some("utf-8")
        );
        assert_eq!(extract_charset("application/json"), None);
        assert_eq!(extract_charset(""), None);
    }

    #[test]
    fn charset_from_malformed_content_type() {
        assert_eq!(
            extract_charset("garbage;; charset=gbk; x").as_deref(),
            Some("gbk")
        );
    }

    #[test]
    fn valid_utf8_is_unchanged() {
        let text = decode_bytes("héllo 世界".as_bytes(), None, &default_fallbacks());
        assert_eq!(text, "héllo 世界");
        assert!(matches!(text, Cow::Borrowed(_)));
    }

    #[test]
    fn declared_latin1_is_honoured() {
        let text = decode_bytes(b"caf\xe9", Some("iso-8859-1"), &default_fallbacks());
        assert_eq!(text, "café");
    }

    #[test]
    fn declared_utf8_with_invalid_bytes_uses_fallbacks() {
        let text = decode_bytes(b"caf\xe9", Some("utf-8"), &default_fallbacks());
        assert_eq!(text, "café");
    }

    #[test]
    fn unknown_charset_label_is_ignored() {
        let text = decode_bytes(b"plain", Some("x-not-a-charset"), &default_fallbacks());
        assert_eq!(text, "plain");
    }

    #[test]
    fn declared_shift_jis_is_decoded() {
        // "日本" in Shift_JIS
        let text = decode_bytes(&[0x93, 0xfa, 0x96, 0x7b], Some("shift_jis"), &default_fallbacks());
        assert_eq!(text, "日本");
    }

    #[test]
    fn no_fallbacks_yields_replacement_characters() {
        let text = decode_bytes(b"ok\xff\xfeok", None, &[]);
        assert_eq!(text, "ok\u{fffd}\u{fffd}ok");
    }
}
