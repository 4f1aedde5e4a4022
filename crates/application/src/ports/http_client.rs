//! HTTP Client port

use std::time::Duration;

use async_trait::async_trait;
use courier_domain::{HttpMethod, RequestHeaders, ResponseError, ResponseHeaders};

/// A fully resolved request ready for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Resolved URL.
    pub url: String,
    /// Resolved headers.
    pub headers: RequestHeaders,
    /// Body, present only for methods that send one.
    pub body: Option<String>,
    /// Client-level timeout.
    pub timeout: Duration,
    /// Maximum number of body bytes to read.
    pub body_limit: u64,
}

/// Status line and headers of a response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    /// HTTP status code.
    pub status: u16,
    /// Canonical reason phrase.
    pub status_text: String,
    /// Response headers.
    pub headers: ResponseHeaders,
    /// Declared `Content-Length`, if any.
    pub content_length: Option<u64>,
}

impl ResponseHead {
    /// Returns the `Content-Type` header or an empty string.
    #[must_use]
    pub fn content_type(&self) -> &str {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .and_then(|(_, values)| values.first())
            .map_or("", String::as_str)
    }
}

/// What happened when reading the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyOutcome {
    /// Up to `body_limit` bytes were read.
    Complete(Vec<u8>),
    /// The declared length exceeded `body_limit`; nothing was read.
    Oversized,
    /// The stream failed part way.
    Failed(String),
}

/// A response whose status line arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// Status and headers.
    pub head: ResponseHead,
    /// Body read result.
    pub body: BodyOutcome,
}

/// Transport failures, classified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HttpClientError {
    /// The request deadline elapsed.
    #[error("request timed out")]
    Timeout,

    /// Host name resolution failed.
    #[error("DNS resolution failed: {0}")]
    Dns(String),

    /// The connection was refused.
    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    /// TLS or certificate failure.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The connection closed unexpectedly.
    #[error("unexpected EOF: {0}")]
    UnexpectedEof(String),

    /// A socket operation timed out.
    #[error("I/O timeout: {0}")]
    IoTimeout(String),

    /// The connection was reset by the peer.
    #[error("connection reset: {0}")]
    ConnectionReset(String),

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

impl HttpClientError {
    /// Classifies a transport error from its rendered message chain.
    ///
    /// Checks run in a fixed order and the first match wins, so a message
    /// mentioning both a refused connection and a reset is a refusal.
    #[must_use]
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));
        let message = message.to_string();

        if has(&[
            "no such host",
            "dns error",
            "failed to lookup address",
            "name or service not known",
            "nodename nor servname",
        ]) {
            Self::Dns(message)
        } else if has(&["connection refused"]) {
            Self::ConnectionRefused(message)
        } else if has(&["certificate"]) {
            Self::Tls(message)
        } else if has(&["eof", "connection closed before message completed"]) {
            Self::UnexpectedEof(message)
        } else if has(&["i/o timeout", "timed out"]) {
            Self::IoTimeout(message)
        } else if has(&["connection reset"]) {
            Self::ConnectionReset(message)
        } else {
            Self::Other(message)
        }
    }

    /// Maps the failure into the response error shown to the user.
    #[must_use]
    pub fn into_response_error(self, timeout: Duration) -> ResponseError {
        match self {
            Self::Timeout => ResponseError::DeadlineExceeded { after: timeout },
            Self::Dns(_) => ResponseError::HostResolution,
            Self::ConnectionRefused(_) => ResponseError::ConnectionRefused,
            Self::Tls(_) => ResponseError::Certificate,
            Self::UnexpectedEof(_) => ResponseError::UnexpectedEof,
            Self::IoTimeout(_) => ResponseError::IoTimeout,
            Self::ConnectionReset(_) => ResponseError::ConnectionReset,
            Self::InvalidRequest(message) => ResponseError::InvalidRequest(message),
            Self::Other(message) => ResponseError::Other(message),
        }
    }
}

/// Port for executing HTTP requests.
///
/// Implementations honour `request.timeout` as their own client timeout,
/// refuse to read bodies whose declared length exceeds `request.body_limit`
/// and never read more than that many bytes.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends the request and reads the (capped) body.
    ///
    /// # Errors
    ///
    /// Returns a classified [`HttpClientError`] if no status line arrived.
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, HttpClientError>;
}
