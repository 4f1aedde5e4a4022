//! Plain-text rendering of a response.

use std::fmt::Write;

use courier_domain::Response;

/// Renders the status line, headers and formatted body, or the error with
/// its suggestions.
#[must_use]
pub fn render(response: &Response, show_time: bool) -> String {
    let mut out = String::new();
    let elapsed = format!("{} ms", response.duration.as_millis());

    if let Some(error) = &response.error {
        let _ = writeln!(out, "Error: {}", error.title());
        let _ = writeln!(out, "{error}");
        if response.status != 0 {
            let _ = writeln!(out, "Status: {} {}", response.status, response.status_text);
        }
        if show_time {
            let _ = writeln!(out, "Time: {elapsed}");
        }
        let _ = writeln!(out, "\nSuggestions:");
        for hint in error.suggestions() {
            let _ = writeln!(out, "  - {hint}");
        }
        return out;
    }

    let _ = write!(out, "HTTP {} {}", response.status, response.status_text);
    if show_time {
        let _ = write!(out, " ({elapsed})");
    }
    out.push('\n');

    for (name, values) in &response.headers {
        for value in values {
            let _ = writeln!(out, "{name}: {value}");
        }
    }

    out.push('\n');
    out.push_str(&response.formatted_body);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
