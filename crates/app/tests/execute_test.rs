//! End-to-end request execution through the reqwest adapter and the JSON
//! store, against local test servers.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use courier_application::{DEFAULT_USER_AGENT, MAX_BODY_BYTES, RequestExecutor};
use courier_domain::{Environment, HttpMethod, RequestDraft, ResponseError};
use courier_infrastructure::{JsonStore, ReqwestHttpClient};
use pretty_assertions::assert_eq;
use tempfile::{TempDir, tempdir};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    _dir: TempDir,
    store: Arc<JsonStore>,
    executor: RequestExecutor<ReqwestHttpClient, JsonStore>,
}

/// Opens a fresh store whose current environment points `BASE_URL` at `base_url`.
fn harness(base_url: &str, timeout_secs: i64) -> Harness {
    let dir = tempdir().expect("Failed to create temp directory");
    let store = Arc::new(JsonStore::open(dir.path()).expect("Failed to open store"));
    store
        .upsert_environment(Environment::new("test").with_variable("BASE_URL", base_url))
        .unwrap();
    store.set_current_environment("test").unwrap();
    store.update_config(|c| c.timeout = timeout_secs).unwrap();

    let client = Arc::new(ReqwestHttpClient::new().expect("Failed to build client"));
    let executor = RequestExecutor::new(client, Arc::clone(&store));
    Harness {
        _dir: dir,
        store,
        executor,
    }
}

/// Reads from `socket` until the end of the request head.
async fn read_request_head(socket: &mut TcpStream) {
    let mut request = Vec::new();
    let mut buf = [0_u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        request.extend_from_slice(&buf[..n]);
    }
}

#[tokio::test]
async fn test_json_response_is_formatted_and_recorded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"a":1}"#, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server.uri(), 5);
    let execution = h.executor.dispatch(&RequestDraft::get("{{BASE_URL}}/users")).await;
    execution
        .history
        .expect("history write should be scheduled")
        .wait()
        .await
        .unwrap();

    let response = execution.response;
    assert!(response.is_ok(), "unexpected error: {:?}", response.error);
    assert_eq!(response.status, 200);
    assert_eq!(response.status_text, "OK");
    assert_eq!(response.body, r#"{"a":1}"#);
    assert_eq!(response.formatted_body, "{\n  \"a\": 1\n}");
    assert_eq!(response.content_length, Some(7));
    assert_eq!(response.content_type(), Some("application/json"));

    let history = h.store.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].url, format!("{}/users", server.uri()));
    assert_eq!(history[0].method, HttpMethod::Get);
}

#[tokio::test]
async fn test_headers_and_body_are_resolved_and_user_agent_added() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/items"))
        .and(header("x-api-key", "secret-1"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .and(body_string(r#"{"key":"secret-1"}"#))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server.uri(), 5);
    h.store
        .upsert_environment(
            Environment::new("test")
                .with_variable("BASE_URL", server.uri())
                .with_variable("API_KEY", "secret-1"),
        )
        .unwrap();

    let draft = RequestDraft::new(HttpMethod::Post, "{{BASE_URL}}/items")
        .with_headers_text("X-Api-Key: {{API_KEY}}")
        .with_body(r#"{"key":"{{API_KEY}}"}"#);
    let response = h.executor.execute(&draft).await;

    assert_eq!(response.status, 201);
    assert_eq!(response.status_text, "Created");
}

#[tokio::test]
async fn test_error_status_is_still_a_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
        .mount(&server)
        .await;

    let h = harness(&server.uri(), 5);
    let execution = h.executor.dispatch(&RequestDraft::get("{{BASE_URL}}/missing")).await;
    if let Some(history) = execution.history {
        history.wait().await.unwrap();
    }

    assert!(execution.response.is_ok());
    assert!(execution.response.is_error_status());
    assert_eq!(execution.response.formatted_body, "nope");
    assert_eq!(h.store.history().len(), 1);
}

#[tokio::test]
async fn test_html_gets_labelled_preview() {
    let server = MockServer::start().await;
    let page = format!("<html>{}</html>", "x".repeat(2000));
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page, "text/html; charset=utf-8"))
        .mount(&server)
        .await;

    let h = harness(&server.uri(), 5);
    let response = h.executor.execute(&RequestDraft::get("{{BASE_URL}}/")).await;

    assert!(response.formatted_body.starts_with("HTML Response:\n<html>xxx"));
    assert!(
        response
            .formatted_body
            .ends_with("...\n(Response truncated, too long to display fully)")
    );
    assert_eq!(response.body.len(), 2013);
}

#[tokio::test]
async fn test_declared_charset_is_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"caf\xe9".to_vec(), "text/plain; charset=iso-8859-1"),
        )
        .mount(&server)
        .await;

    let h = harness(&server.uri(), 5);
    let response = h.executor.execute(&RequestDraft::get("{{BASE_URL}}/")).await;

    assert_eq!(response.formatted_body, "café");
}

#[tokio::test]
async fn test_slow_server_hits_deadline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let h = harness(&server.uri(), 1);
    let execution = h.executor.dispatch(&RequestDraft::get("{{BASE_URL}}/slow")).await;

    assert_eq!(
        execution.response.error,
        Some(ResponseError::DeadlineExceeded {
            after: Duration::from_secs(1)
        })
    );
    assert!(execution.response.duration < Duration::from_secs(2));
    assert!(execution.history.is_none());
    assert!(h.store.history().is_empty());
}

#[tokio::test]
async fn test_connection_refused_is_classified() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let h = harness(&format!("http://{addr}"), 5);
    let response = h.executor.execute(&RequestDraft::get("{{BASE_URL}}/")).await;

    assert_eq!(response.error, Some(ResponseError::ConnectionRefused));
    assert_eq!(response.status, 0);
    assert!(h.store.history().is_empty());
}

#[tokio::test]
async fn test_declared_oversize_body_is_not_read() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let declared: u64 = 11 * 1024 * 1024;

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request_head(&mut socket).await;
        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {declared}\r\n\r\n"
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        let _ = socket.write_all(&[b'x'; 4096]).await;
        tokio::time::sleep(Duration::from_millis(200)).await;
    });

    let h = harness(&format!("http://{addr}"), 5);
    let execution = h.executor.dispatch(&RequestDraft::get("{{BASE_URL}}/big")).await;
    server.abort();

    let response = execution.response;
    assert_eq!(
        response.error,
        Some(ResponseError::TooLarge {
            content_length: declared
        })
    );
    assert_eq!(
        response.error.as_ref().map(ToString::to_string).as_deref(),
        Some("response too large (11.0 MB) - size limit is 10MB")
    );
    assert_eq!(response.status, 200);
    assert_eq!(response.content_length, Some(declared));
    assert!(response.body.is_empty());
    assert!(response.formatted_body.is_empty());
    assert!(execution.history.is_none());
}

#[tokio::test]
async fn test_undeclared_body_is_cut_at_the_size_limit() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request_head(&mut socket).await;
        let head = "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nConnection: close\r\n\r\n";
        socket.write_all(head.as_bytes()).await.unwrap();
        let chunk = vec![b'z'; 64 * 1024];
        for _ in 0..(12 * 16) {
            if socket.write_all(&chunk).await.is_err() {
                break;
            }
        }
        let _ = socket.shutdown().await;
    });

    let h = harness(&format!("http://{addr}"), 5);
    let execution = h.executor.dispatch(&RequestDraft::get("{{BASE_URL}}/stream")).await;
    server.abort();

    let response = execution.response;
    assert!(response.is_ok(), "unexpected error: {:?}", response.error);
    assert_eq!(response.body.len(), usize::try_from(MAX_BODY_BYTES).unwrap());
    assert_eq!(response.content_length, Some(MAX_BODY_BYTES));
    assert!(
        response
            .formatted_body
            .starts_with("Large response (10240 KB) - showing first 1000 chars:\nzzz")
    );
}

#[tokio::test]
async fn test_history_disabled_records_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let h = harness(&server.uri(), 5);
    h.store.update_config(|c| c.save_history = false).unwrap();
    let execution = h.executor.dispatch(&RequestDraft::get("{{BASE_URL}}/")).await;

    assert!(execution.response.is_ok());
    assert!(execution.history.is_none());
    assert!(h.store.history().is_empty());
}
