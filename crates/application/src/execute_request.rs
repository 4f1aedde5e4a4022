//! Request execution
//!
//! Sends one request and always produces a [`Response`]. Three bounds share
//! the configured timeout:
//!
//! 1. the HTTP client's own timeout, passed through [`OutboundRequest`],
//! 2. a deadline around the send in the producer task,
//! 3. a backstop at `timeout + BACKSTOP_GRACE` on the caller's side.
//!
//! The send runs on its own task and reports through a single-slot channel.
//! The caller takes whichever arrives first, the result or the backstop.
//! When the backstop wins, the producer is left to finish or hit its own
//! deadline in the background.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use courier_domain::{
    RequestDraft, RequestHeaders, RequestItem, Response, ResponseError, request::header_value,
};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::ports::{
    BodyOutcome, HttpClient, OutboundRequest, RawResponse, RequestStore, StoreError,
};
use crate::response_decoder::{DecoderOptions, ResponseDecoder};
use crate::variable_resolver::EnvironmentResolver;

/// Hard ceiling on the response body size.
pub const MAX_BODY_BYTES: u64 = 10 * 1024 * 1024;

/// Declared lengths above this are logged as large.
pub const LARGE_BODY_NOTICE_BYTES: u64 = 1024 * 1024;

/// Extra time the caller waits past the timeout before giving up.
pub const BACKSTOP_GRACE: Duration = Duration::from_secs(1);

/// `User-Agent` sent when the request does not carry one.
pub const DEFAULT_USER_AGENT: &str = concat!("courier/", env!("CARGO_PKG_VERSION"));

/// Handle to a history write running in the background.
#[derive(Debug)]
pub struct HistoryWrite(JoinHandle<Result<(), StoreError>>);

impl HistoryWrite {
    /// Waits for the write to finish.
    ///
    /// # Errors
    ///
    /// Returns the store's error, or an I/O error if the write task died.
    pub async fn wait(self) -> Result<(), StoreError> {
        self.0
            .await
            .map_err(|err| StoreError::Io(std::io::Error::other(err.to_string())))?
    }
}

/// A response plus the history write it triggered, if any.
#[derive(Debug)]
pub struct Execution {
    /// The response.
    pub response: Response,
    /// Background history write; `None` when nothing is recorded.
    pub history: Option<HistoryWrite>,
}

impl Execution {
    fn without_history(response: Response) -> Self {
        Self {
            response,
            history: None,
        }
    }
}

/// A draft after variable resolution.
#[derive(Debug, Clone)]
struct PreparedRequest {
    outbound: OutboundRequest,
    item: RequestItem,
}

/// Executes request drafts against an [`HttpClient`], recording history in a
/// [`RequestStore`].
pub struct RequestExecutor<C, S> {
    client: Arc<C>,
    store: Arc<S>,
}

impl<C, S> Clone for RequestExecutor<C, S> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            store: Arc::clone(&self.store),
        }
    }
}

impl<C, S> RequestExecutor<C, S>
where
    C: HttpClient + 'static,
    S: RequestStore + 'static,
{
    /// Creates a new executor.
    #[must_use]
    pub const fn new(client: Arc<C>, store: Arc<S>) -> Self {
        Self { client, store }
    }

    /// Sends the draft and returns the response.
    ///
    /// The history write, if any, continues in the background.
    pub async fn execute(&self, draft: &RequestDraft) -> Response {
        self.dispatch(draft).await.response
    }

    /// Sends the draft and returns the response together with a handle to
    /// the history write it started.
    pub async fn dispatch(&self, draft: &RequestDraft) -> Execution {
        let started = Instant::now();
        let config = self.store.config();
        let timeout = config.request_timeout();
        let resolver = EnvironmentResolver::from_store(self.store.as_ref());

        let prepared = prepare(draft, &resolver, timeout);
        debug!(
            method = %prepared.outbound.method,
            url = %prepared.outbound.url,
            timeout_ms = millis(timeout),
            "sending request"
        );

        let decoder = ResponseDecoder::new(DecoderOptions {
            auto_format_json: config.auto_format_json,
        });
        let save_history = config.save_history;
        let client = Arc::clone(&self.client);
        let store = Arc::clone(&self.store);
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (response, item) = perform(client.as_ref(), prepared, &decoder, started).await;
            let history = item
                .filter(|_| save_history)
                .map(|item| record_in_background(store, item));
            // The caller may already have given up.
            let _ = tx.send(Execution { response, history });
        });

        tokio::select! {
            result = rx => result.unwrap_or_else(|_| {
                Execution::without_history(Response::failed(
                    ResponseError::Other("request task ended without a result".to_string()),
                    started.elapsed(),
                ))
            }),
            () = tokio::time::sleep(timeout + BACKSTOP_GRACE) => {
                warn!(
                    timeout_ms = millis(timeout),
                    "backstop fired before the request reported back"
                );
                Execution::without_history(Response::failed(
                    ResponseError::ForcedTimeout { after: timeout },
                    started.elapsed(),
                ))
            }
        }
    }
}

fn prepare(
    draft: &RequestDraft,
    resolver: &EnvironmentResolver,
    timeout: Duration,
) -> PreparedRequest {
    let url = resolver.resolve(&draft.url);
    let headers = resolver.resolve_headers(&draft.headers());
    let body = resolver.resolve(&draft.body);

    let mut wire_headers: RequestHeaders = headers.clone();
    if header_value(&wire_headers, "user-agent").is_none() {
        wire_headers.insert("User-Agent".to_string(), DEFAULT_USER_AGENT.to_string());
    }

    let method = draft.method;
    let outbound = OutboundRequest {
        method,
        url: url.clone(),
        headers: wire_headers,
        body: (method.sends_body() && !body.is_empty()).then(|| body.clone()),
        timeout,
        body_limit: MAX_BODY_BYTES,
    };

    let mut item = RequestItem::new(method, url, Utc::now())
        .with_headers(headers)
        .with_body(body);
    if let Some(name) = &draft.name {
        item.name.clone_from(name);
    }

    PreparedRequest { outbound, item }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Runs the send under the deadline and turns the outcome into a response.
///
/// The request item comes back only when a body was read and decoded.
async fn perform<C: HttpClient + ?Sized>(
    client: &C,
    prepared: PreparedRequest,
    decoder: &ResponseDecoder,
    started: Instant,
) -> (Response, Option<RequestItem>) {
    let PreparedRequest { outbound, item } = prepared;
    let timeout = outbound.timeout;

    let raw = match tokio::time::timeout(timeout, client.send(outbound)).await {
        Ok(Ok(raw)) => raw,
        Ok(Err(err)) => {
            warn!(error = %err, "request failed");
            let response = Response::failed(err.into_response_error(timeout), started.elapsed());
            return (response, None);
        }
        Err(_) => {
            warn!(timeout_ms = millis(timeout), "request deadline exceeded");
            let response = Response::failed(
                ResponseError::DeadlineExceeded { after: timeout },
                started.elapsed(),
            );
            return (response, None);
        }
    };

    let response = build_response(raw, decoder, started.elapsed());
    let item = response.is_ok().then_some(item);
    (response, item)
}

fn build_response(raw: RawResponse, decoder: &ResponseDecoder, duration: Duration) -> Response {
    let RawResponse { head, body } = raw;

    if let Some(declared) = head.content_length
        && declared > LARGE_BODY_NOTICE_BYTES
    {
        info!(content_length = declared, "large response");
    }

    let content_type = head.content_type().to_string();
    let mut response = Response {
        status: head.status,
        status_text: head.status_text,
        headers: head.headers,
        duration,
        content_length: head.content_length,
        ..Response::default()
    };

    let declared_too_large = head
        .content_length
        .is_some_and(|declared| declared > MAX_BODY_BYTES);

    let bytes = match body {
        _ if declared_too_large => {
            response.error = Some(ResponseError::TooLarge {
                content_length: head.content_length.unwrap_or(MAX_BODY_BYTES),
            });
            return response;
        }
        BodyOutcome::Oversized => {
            response.error = Some(ResponseError::TooLarge {
                content_length: head.content_length.unwrap_or(MAX_BODY_BYTES),
            });
            return response;
        }
        BodyOutcome::Failed(message) => {
            warn!(error = %message, "failed to read response body");
            response.error = Some(ResponseError::BodyRead(message));
            return response;
        }
        BodyOutcome::Complete(bytes) => bytes,
    };

    response.formatted_body = decoder.decode_and_format(&bytes, &content_type);
    response.body = String::from_utf8_lossy(&bytes).into_owned();
    response.content_length = response.content_length.or(Some(bytes.len() as u64));
    response
}

fn record_in_background<S: RequestStore + 'static>(
    store: Arc<S>,
    item: RequestItem,
) -> HistoryWrite {
    HistoryWrite(tokio::task::spawn_blocking(move || {
        store
            .record_history(item)
            .inspect_err(|err| warn!(error = %err, "failed to record request history"))
    }))
}
