//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! Bodies are streamed chunk by chunk and reading stops at the request's
//! byte limit, whatever the server declared.

use std::error::Error as StdError;
use std::io;

use async_trait::async_trait;
use courier_application::ports::{
    BodyOutcome, HttpClient, HttpClientError, OutboundRequest, RawResponse, ResponseHead,
};
use courier_domain::{HttpMethod, ResponseHeaders};
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Client, Method, Url};
use tracing::debug;

/// HTTP client implementation using reqwest.
///
/// Wraps a shared `reqwest::Client`; per-request timeouts come from
/// [`OutboundRequest::timeout`].
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client with default settings.
    ///
    /// Default configuration:
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    /// - No default `User-Agent`; the executor supplies one
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    /// Creates a new HTTP client with a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Options => Method::OPTIONS,
        }
    }

    /// Maps reqwest errors to the port's classification.
    fn map_error(error: &reqwest::Error) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout;
        }
        if error.is_builder() {
            return HttpClientError::InvalidRequest(error_chain(error));
        }
        if let Some(kind) = io_error_kind(error)
            && let Some(classified) = classify_io_kind(kind, error)
        {
            return classified;
        }
        HttpClientError::classify(&error_chain(error))
    }

    fn head(response: &reqwest::Response) -> ResponseHead {
        let status = response.status();

        let mut headers = ResponseHeaders::new();
        for (name, value) in response.headers() {
            headers
                .entry(name.as_str().to_string())
                .or_default()
                .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
        }

        let declared = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .or_else(|| response.content_length());

        ResponseHead {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            content_length: declared,
        }
    }

    async fn read_capped(mut response: reqwest::Response, limit: u64) -> BodyOutcome {
        let mut body = CappedBody::new(limit);

        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    if !body.push(&chunk) {
                        debug!(limit, "body read stopped at the size limit");
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => return BodyOutcome::Failed(error_chain(&err)),
            }
        }

        BodyOutcome::Complete(body.into_bytes())
    }
}

/// Body bytes collected up to a fixed limit.
#[derive(Debug)]
struct CappedBody {
    bytes: Vec<u8>,
    limit: usize,
}

impl CappedBody {
    fn new(limit: u64) -> Self {
        Self {
            bytes: Vec::new(),
            limit: usize::try_from(limit).unwrap_or(usize::MAX),
        }
    }

    /// Appends as much of `chunk` as fits. Returns false once the limit is
    /// reached and nothing more should be read.
    fn push(&mut self, chunk: &[u8]) -> bool {
        let remaining = self.limit.saturating_sub(self.bytes.len());
        if chunk.len() >= remaining {
            self.bytes.extend_from_slice(&chunk[..remaining]);
            return false;
        }
        self.bytes.extend_from_slice(chunk);
        true
    }

    fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, HttpClientError> {
        let url = Url::parse(&request.url)
            .map_err(|e| HttpClientError::InvalidRequest(format!("{e}: {}", request.url)))?;

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url)
            .timeout(request.timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| Self::map_error(&e))?;
        let head = Self::head(&response);

        let body = if head
            .content_length
            .is_some_and(|declared| declared > request.body_limit)
        {
            BodyOutcome::Oversized
        } else {
            Self::read_capped(response, request.body_limit).await
        };

        Ok(RawResponse { head, body })
    }
}

/// Renders an error and its sources as `outer: inner: ...`.
fn error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

fn io_error_kind(error: &(dyn StdError + 'static)) -> Option<io::ErrorKind> {
    let mut source = error.source();
    while let Some(cause) = source {
        if let Some(io_error) = cause.downcast_ref::<io::Error>() {
            return Some(io_error.kind());
        }
        source = cause.source();
    }
    None
}

fn classify_io_kind(
    kind: io::ErrorKind,
    error: &(dyn StdError + 'static),
) -> Option<HttpClientError> {
    let message = error_chain(error);
    match kind {
        io::ErrorKind::ConnectionRefused => Some(HttpClientError::ConnectionRefused(message)),
        io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted => {
            Some(HttpClientError::ConnectionReset(message))
        }
        io::ErrorKind::UnexpectedEof => Some(HttpClientError::UnexpectedEof(message)),
        io::ErrorKind::TimedOut => Some(HttpClientError::IoTimeout(message)),
        _ => None,
    }
}
