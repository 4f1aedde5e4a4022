//! Request failure taxonomy carried inside a [`Response`](super::Response).
//!
//! None of these abort the caller: a failed send still yields a response
//! whose `error` explains what went wrong.

use std::time::Duration;

use thiserror::Error;

/// Why a request did not produce a displayable body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    /// The request deadline elapsed.
    #[error("Request timed out after {after:?}. The server took too long to respond.")]
    DeadlineExceeded {
        /// The configured timeout.
        after: Duration,
    },

    /// DNS lookup failed.
    #[error("Could not resolve host. Please check the URL and your internet connection.")]
    HostResolution,

    /// Nothing is listening on the target port.
    #[error("Connection refused. The server is not accepting connections.")]
    ConnectionRefused,

    /// TLS certificate validation failed.
    #[error(
        "SSL/TLS certificate error. The server's security certificate could not be verified."
    )]
    Certificate,

    /// The connection closed mid-exchange.
    #[error("Connection closed unexpectedly. The server terminated the connection.")]
    UnexpectedEof,

    /// A socket-level read or connect timed out.
    #[error("Connection timed out. The server is not responding.")]
    IoTimeout,

    /// The peer reset the connection.
    #[error("Connection was reset. The server closed the connection abruptly.")]
    ConnectionReset,

    /// Any other transport failure.
    #[error("Request failed: {0}")]
    Other(String),

    /// The declared `Content-Length` is above the body size limit.
    #[error("response too large ({:.1} MB) - size limit is 10MB", mebibytes(.content_length))]
    TooLarge {
        /// The declared content length in bytes.
        content_length: u64,
    },

    /// Reading the body failed after the status line arrived.
    #[error("failed to read response: {0}")]
    BodyRead(String),

    /// The backstop timer fired before the call reported back.
    #[error("forced timeout: request took longer than {after:?}")]
    ForcedTimeout {
        /// The configured timeout.
        after: Duration,
    },

    /// The request could not be built (bad URL, bad header).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[allow(clippy::cast_precision_loss, clippy::trivially_copy_pass_by_ref)]
fn mebibytes(bytes: &u64) -> f64 {
    *bytes as f64 / (1024.0 * 1024.0)
}

impl ResponseError {
    /// Returns a human-readable title for this error.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::DeadlineExceeded { .. } => "Request Timeout",
            Self::HostResolution => "DNS Resolution Failed",
            Self::ConnectionRefused => "Connection Refused",
            Self::Certificate => "SSL/TLS Error",
            Self::UnexpectedEof => "Connection Closed",
            Self::IoTimeout => "Connection Timeout",
            Self::ConnectionReset => "Connection Reset",
            Self::Other(_) => "Request Failed",
            Self::TooLarge { .. } => "Response Too Large",
            Self::BodyRead(_) => "Read Failed",
            Self::ForcedTimeout { .. } => "Forced Timeout",
            Self::InvalidRequest(_) => "Invalid Request",
        }
    }

    /// Returns user-friendly suggestions for this error.
    #[must_use]
    pub const fn suggestions(&self) -> &[&'static str] {
        match self {
            Self::DeadlineExceeded { .. } | Self::ForcedTimeout { .. } | Self::IoTimeout => &[
                "The server may be slow or overloaded",
                "Try increasing the timeout value",
                "Check your network connection",
            ],
            Self::HostResolution => &[
                "Check if the hostname is correct",
                "Verify your internet connection",
                "Try using an IP address instead",
            ],
            Self::ConnectionRefused | Self::ConnectionReset | Self::UnexpectedEof => &[
                "Check if the server is running",
                "Verify the port number is correct",
                "Check your firewall settings",
            ],
            Self::Certificate => &[
                "The server's SSL certificate may be invalid",
                "Check if the certificate has expired",
                "Verify the hostname matches the certificate",
            ],
            Self::TooLarge { .. } => &["Request a smaller page or range of the resource"],
            Self::InvalidRequest(_) => &[
                "Check that the URL starts with http:// or https://",
                "Verify there are no typos in the URL or headers",
            ],
            Self::Other(_) | Self::BodyRead(_) => &[
                "An unexpected error occurred",
                "Check the error details for more information",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deadline_message_includes_timeout() {
        let error = ResponseError::DeadlineExceeded {
            after: Duration::from_secs(5),
        };
        assert_eq!(
            error.to_string(),
            "Request timed out after 5s. The server took too long to respond."
        );
    }

    #[test]
    fn too_large_message_reports_megabytes() {
        let error = ResponseError::TooLarge {
            content_length: 11 * 1024 * 1024,
        };
        assert_eq!(
            error.to_string(),
            "response too large (11.0 MB) - size limit is 10MB"
        );
    }

    #[test]
    fn each_transport_category_has_distinct_message() {
        let errors = [
            ResponseError::HostResolution,
            ResponseError::ConnectionRefused,
            ResponseError::Certificate,
            ResponseError::UnexpectedEof,
            ResponseError::IoTimeout,
            ResponseError::ConnectionReset,
        ];
        let mut messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        messages.sort();
        messages.dedup();
        assert_eq!(messages.len(), errors.len());
    }

    #[test]
    fn suggestions_are_never_empty() {
        assert!(!ResponseError::Certificate.suggestions().is_empty());
        assert_eq!(ResponseError::HostResolution.title(), "DNS Resolution Failed");
    }
}
