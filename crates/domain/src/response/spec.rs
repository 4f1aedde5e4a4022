//! Response type handed back to callers.

use std::collections::BTreeMap;
use std::time::Duration;

use super::ResponseError;

/// Response headers; a name may carry several values.
pub type ResponseHeaders = BTreeMap<String, Vec<String>>;

/// The outcome of one send.
///
/// A failed send still produces a `Response`: `error` is set and the
/// remaining fields hold whatever was received before the failure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Response {
    /// HTTP status code (0 if no status line arrived).
    pub status: u16,
    /// Status text (e.g., "OK", "Not Found").
    pub status_text: String,
    /// Response headers.
    pub headers: ResponseHeaders,
    /// Raw body text as received (lossily decoded).
    pub body: String,
    /// Decoded and formatted body for display.
    pub formatted_body: String,
    /// Elapsed time measured around the call.
    pub duration: Duration,
    /// Declared `Content-Length`, or the number of bytes read.
    pub content_length: Option<u64>,
    /// Why the request failed, if it did.
    pub error: Option<ResponseError>,
}

impl Response {
    /// Creates a response that only carries an error and timing.
    #[must_use]
    pub fn failed(error: ResponseError, duration: Duration) -> Self {
        Self {
            duration,
            error: Some(error),
            ..Self::default()
        }
    }

    /// Returns true if no error is set.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Returns true if the status code indicates a client or server error.
    #[must_use]
    pub const fn is_error_status(&self) -> bool {
        self.status >= 400 && self.status < 600
    }

    /// Returns the first value of a header, matching names case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, values)| values.first())
            .map(String::as_str)
    }

    /// Returns the `Content-Type` header, if present.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }
}
