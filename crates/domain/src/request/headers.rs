//! Request header block parsing.
//!
//! Headers are entered as newline-separated `Key: Value` lines.

use std::collections::BTreeMap;

/// Request headers keyed by name, as entered by the user.
///
/// Keys keep their original case. Lookups that must ignore case go through
/// [`header_value`].
pub type RequestHeaders = BTreeMap<String, String>;

/// Parses a newline-separated `Key: Value` block into headers.
///
/// Blank lines are ignored and lines without a colon or with an empty key
/// are dropped. When a key repeats, the last line wins.
///
/// # Examples
///
/// ```
/// use courier_domain::parse_header_block;
///
/// let headers = parse_header_block("Accept: application/json\n\nbogus\nX-Trace: a:b");
/// assert_eq!(headers.len(), 2);
/// assert_eq!(headers["X-Trace"], "a:b");
/// ```
#[must_use]
pub fn parse_header_block(input: &str) -> RequestHeaders {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| line.split_once(':'))
        .filter_map(|(key, value)| {
            let key = key.trim();
            (!key.is_empty()).then(|| (key.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Returns the value of a header, comparing names case-insensitively.
#[must_use]
pub fn header_value<'a>(headers: &'a RequestHeaders, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_simple_lines() {
        let headers = parse_header_block("Content-Type: application/json\nAuthorization: Bearer t");
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["Content-Type"], "application/json");
        assert_eq!(headers["Authorization"], "Bearer t");
    }

    #[test]
    fn drops_blank_and_malformed_lines() {
        let headers = parse_header_block("\n   \nno colon here\n: empty key\nX-Ok: yes\n");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers["X-Ok"], "yes");
    }

    #[test]
    fn splits_on_first_colon_only() {
        let headers = parse_header_block("Referer: http://example.com:8080/x");
        assert_eq!(headers["Referer"], "http://example.com:8080/x");
    }

    #[test]
    fn handles_crlf_line_endings() {
        let headers = parse_header_block("A: 1\r\nB: 2\r\n");
        assert_eq!(headers["A"], "1");
        assert_eq!(headers["B"], "2");
    }

    #[test]
    fn last_duplicate_wins() {
        let headers = parse_header_block("X-Id: 1\nX-Id: 2");
        assert_eq!(headers["X-Id"], "2");
    }

    #[test]
    fn header_value_ignores_case() {
        let headers = parse_header_block("user-agent: curl/8");
        assert_eq!(header_value(&headers, "User-Agent"), Some("curl/8"));
        assert_eq!(header_value(&headers, "Accept"), None);
    }
}
