//! Request description assembled by the caller before sending.

use super::{HttpMethod, RequestHeaders, parse_header_block};

/// The raw, unresolved request a caller wants to send.
///
/// URL, header values and body may contain `{{VAR}}` placeholders; they are
/// resolved against the active environment at send time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDraft {
    /// Optional display name; defaults to `"<METHOD> <url>"` when stored.
    pub name: Option<String>,
    /// HTTP method.
    pub method: HttpMethod,
    /// Target URL.
    pub url: String,
    /// Newline-separated `Key: Value` header block.
    pub headers_text: String,
    /// Raw request body.
    pub body: String,
}

impl RequestDraft {
    /// Creates a draft for the given method and URL.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            ..Self::default()
        }
    }

    /// Creates a GET draft.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the header block.
    #[must_use]
    pub fn with_headers_text(mut self, headers: impl Into<String>) -> Self {
        self.headers_text = headers.into();
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Parses the header block.
    #[must_use]
    pub fn headers(&self) -> RequestHeaders {
        parse_header_block(&self.headers_text)
    }

    /// Returns the stored display name.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("{} {}", self.method, self.url))
    }
}
