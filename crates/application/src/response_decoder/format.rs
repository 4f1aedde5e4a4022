//! Display formatting for decoded bodies.

use serde::de::IgnoredAny;

/// Bodies larger than this are shown as a preview only.
pub const LARGE_BODY_BYTES: usize = 100 * 1024;

/// Number of characters kept in a preview.
pub const PREVIEW_CHARS: usize = 1000;

/// Appended to any preview that cut text off.
pub const TRUNCATION_NOTICE: &str = "...\n(Response truncated, too long to display fully)";

/// Keeps the first `max_chars` characters, appending the truncation notice
/// if anything was cut.
#[must_use]
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{TRUNCATION_NOTICE}", &text[..cut]),
        None => text.to_string(),
    }
}

/// Returns true if the content type denotes JSON.
#[must_use]
pub fn is_json(content_type: &str) -> bool {
    match content_type.parse::<mime::Mime>() {
        Ok(parsed) => {
            parsed.type_() == mime::APPLICATION
                && (parsed.subtype() == mime::JSON || parsed.suffix() == Some(mime::JSON))
        }
        Err(_) => content_type.contains("application/json"),
    }
}

/// Returns true if the content type denotes HTML.
#[must_use]
pub fn is_html(content_type: &str) -> bool {
    match content_type.parse::<mime::Mime>() {
        Ok(parsed) => parsed.type_() == mime::TEXT && parsed.subtype() == mime::HTML,
        Err(_) => content_type.contains("text/html"),
    }
}

/// Re-indents JSON with two spaces per level.
///
/// Only whitespace between tokens changes: numbers, string escapes and
/// repeated keys come through exactly as received. On a syntax error the
/// error and the raw text are returned together.
#[must_use]
pub fn pretty_json(text: &str) -> String {
    if let Err(err) = serde_json::from_str::<IgnoredAny>(text) {
        return format!("Error formatting JSON: {err}\nRaw response:\n{text}");
    }
    reindent(text)
}

/// Rewrites the whitespace of a document already known to be valid JSON.
fn reindent(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 2);
    let mut depth = 0_usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut opened = false;

    for ch in text.chars() {
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        if matches!(ch, ' ' | '\t' | '\n' | '\r') {
            continue;
        }

        // Empty containers stay on one line.
        let after_open = std::mem::take(&mut opened);
        if after_open && !matches!(ch, '}' | ']') {
            push_newline(&mut out, depth);
        }

        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            '{' | '[' => {
                out.push(ch);
                depth += 1;
                opened = true;
            }
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                if !after_open {
                    push_newline(&mut out, depth);
                }
                out.push(ch);
            }
            ',' => {
                out.push(ch);
                push_newline(&mut out, depth);
            }
            ':' => out.push_str(": "),
            _ => out.push(ch),
        }
    }
    out
}

fn push_newline(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str("  ");
    }
}

/// Applies the display policy to decoded text.
///
/// In order: large bodies become a preview, JSON is pretty-printed when
/// `auto_format_json` is set, HTML gets a labelled preview, anything else
/// passes through.
#[must_use]
pub fn format_body(text: &str, content_type: &str, auto_format_json: bool) -> String {
    if text.len() > LARGE_BODY_BYTES {
        return format!(
            "Large response ({} KB) - showing first {PREVIEW_CHARS} chars:\n{}",
            text.len() / 1024,
            truncate_preview(text, PREVIEW_CHARS)
        );
    }

    if auto_format_json && is_json(content_type) {
        return pretty_json(text);
    }

    if is_html(content_type) {
        return format!("HTML Response:\n{}", truncate_preview(text, PREVIEW_CHARS));
    }

    text.to_string()
}
