//! End-to-end exchanges against the live mock server.
//!
//! # Design
//! Each test starts the mock server on a random port on a background
//! thread, then drives the client over real sockets. This exercises the
//! full pipeline (connect, send, receive, status/header/body extraction)
//! exactly as a caller would see it.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use httpc_core::HttpClient;

/// Start the mock server on a random port; returns its address.
fn spawn_mock_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });
    addr
}

fn no_headers() -> HashMap<String, String> {
    HashMap::new()
}

#[test]
fn get_success() {
    let addr = spawn_mock_server();
    let response = HttpClient::new().get(&format!("http://{addr}/ok"), &no_headers());

    assert_eq!(response.error, None);
    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, "ok");
    // Header names arrive exactly as the server's stack writes them.
    assert_eq!(response.headers.get("content-type").map(String::as_str), Some("text/plain"));
    assert!(response.is_success());
}

#[test]
fn post_json_sets_content_type_and_body() {
    let addr = spawn_mock_server();
    let document = serde_json::json!({"name": "John Doe", "age": 30});

    let response =
        HttpClient::new().post_json(&format!("http://{addr}/echo"), &document, &no_headers());

    assert!(response.is_success(), "error: {:?}", response.error);
    let echo: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(echo["content_type"], "application/json");
    assert_eq!(
        echo["body"],
        serde_json::Value::String(serde_json::to_string(&document).unwrap())
    );
}

#[test]
fn post_json_overrides_caller_content_type() {
    let addr = spawn_mock_server();
    let mut headers = HashMap::new();
    headers.insert("Content-Type".to_string(), "text/csv".to_string());

    let response = HttpClient::new().post_json(
        &format!("http://{addr}/echo"),
        &serde_json::json!({"k": 1}),
        &headers,
    );

    assert!(response.is_success(), "error: {:?}", response.error);
    let echo: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(echo["content_type"], "application/json");
}

#[test]
fn non_2xx_is_not_an_error() {
    let addr = spawn_mock_server();
    let response = HttpClient::new().get(&format!("http://{addr}/missing"), &no_headers());

    assert_eq!(response.error, None);
    assert_eq!(response.status_code, 404);
    assert!(!response.is_success());
}

#[test]
fn head_yields_empty_body() {
    let addr = spawn_mock_server();
    let response = HttpClient::new().head(&format!("http://{addr}/ok"), &no_headers());

    assert!(response.is_success(), "error: {:?}", response.error);
    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, "");
}

#[test]
fn duplicate_response_headers_resolve_last_wins() {
    let addr = spawn_mock_server();
    let response = HttpClient::new().get(&format!("http://{addr}/dup-headers"), &no_headers());

    assert!(response.is_success(), "error: {:?}", response.error);
    assert_eq!(response.headers.get("x-variant").map(String::as_str), Some("second"));
}

#[test]
fn post_with_empty_body_is_well_formed() {
    let addr = spawn_mock_server();
    let response = HttpClient::new().post(&format!("http://{addr}/echo"), b"", &no_headers());

    assert!(response.is_success(), "error: {:?}", response.error);
    let echo: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(echo["body"], "");
}

#[test]
fn put_and_patch_carry_bodies() {
    let addr = spawn_mock_server();
    let client = HttpClient::new();
    let url = format!("http://{addr}/echo");

    let response = client.put(&url, b"put-payload", &no_headers());
    assert!(response.is_success(), "error: {:?}", response.error);
    let echo: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(echo["body"], "put-payload");

    let response = client.patch(&url, b"patch-payload", &no_headers());
    assert!(response.is_success(), "error: {:?}", response.error);
    let echo: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(echo["body"], "patch-payload");
}

#[test]
fn delete_returns_204_with_empty_body() {
    let addr = spawn_mock_server();
    let response = HttpClient::new().delete(&format!("http://{addr}/empty"), &no_headers());

    assert!(response.is_success(), "error: {:?}", response.error);
    assert_eq!(response.status_code, 204);
    assert_eq!(response.body, "");
}

#[test]
fn options_on_get_route_reports_405() {
    let addr = spawn_mock_server();
    let response = HttpClient::new().options(&format!("http://{addr}/ok"), &no_headers());

    // A completed exchange, whatever the code: no error slot.
    assert_eq!(response.error, None);
    assert_eq!(response.status_code, 405);
    assert!(!response.is_success());
}

#[test]
fn caller_headers_reach_the_server() {
    let addr = spawn_mock_server();
    let mut headers = HashMap::new();
    headers.insert("Content-Type".to_string(), "text/markdown".to_string());

    let response =
        HttpClient::new().post(&format!("http://{addr}/echo"), b"# hi", &headers);

    assert!(response.is_success(), "error: {:?}", response.error);
    let echo: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(echo["content_type"], "text/markdown");
}

#[test]
fn user_agent_is_sent_and_configurable() {
    let addr = spawn_mock_server();
    let url = format!("http://{addr}/echo");

    let response = HttpClient::new().post(&url, b"x", &no_headers());
    let echo: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(echo["user_agent"], "httpc/1.0");

    let response = HttpClient::with_user_agent("probe/2.3").post(&url, b"x", &no_headers());
    let echo: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(echo["user_agent"], "probe/2.3");
}

#[test]
fn unreachable_host_reports_connect_failure() {
    // Grab a port nobody is listening on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let response = HttpClient::new().get(&format!("http://{addr}/"), &no_headers());

    assert_eq!(response.status_code, 0);
    let error = response.error.expect("connect failure must set error");
    assert!(error.starts_with("connect failed"), "got: {error}");
    assert!(response.body.is_empty());
    assert!(response.headers.is_empty());
}

#[test]
fn invalid_url_rejected_before_any_socket() {
    let response = HttpClient::new().get("not-a-url", &no_headers());

    assert_eq!(response.error.as_deref(), Some("Invalid URL format."));
    assert_eq!(response.status_code, 0);
    assert!(!response.is_success());
}

#[test]
fn deadline_expires_on_stalled_response() {
    let addr = spawn_mock_server();
    let client = HttpClient::new().timeout(Duration::from_millis(300));

    let response = client.get(&format!("http://{addr}/slow"), &no_headers());

    assert_eq!(response.status_code, 0);
    let error = response.error.expect("stalled response must set error");
    assert!(error.starts_with("receive failed"), "got: {error}");
}
