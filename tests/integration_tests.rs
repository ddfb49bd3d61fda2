//! Integration tests using wiremock to simulate HTTP servers.
//!
//! The mock server lives on a tokio runtime owned by each test, while the
//! requests themselves are sent from the test thread with the blocking
//! default transport.

use fetchy::{fetch, Error, ReqwestTransport, Request};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::runtime::Runtime;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct TestData {
    id: u32,
    name: String,
}

// Field order matters: the server must go away before its runtime.
struct TestServer {
    server: MockServer,
    rt: Runtime,
}

impl TestServer {
    fn start() -> Self {
        let rt = Runtime::new().unwrap();
        let server = rt.block_on(MockServer::start());
        Self { server, rt }
    }

    fn mount(&self, mock: Mock) {
        self.rt.block_on(mock.mount(&self.server));
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.server.uri(), path)
    }

    fn received(&self) -> Vec<wiremock::Request> {
        self.rt
            .block_on(self.server.received_requests())
            .expect("request recording is enabled")
    }
}

#[test]
fn test_successful_get_string() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("fetchy=debug")
        .with_test_writer()
        .try_init();

    let server = TestServer::start();
    server.mount(
        Mock::given(method("GET"))
            .and(path("/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello")),
    );

    let mut response = fetch(server.url("/1")).execute().unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.read_string().unwrap(), "hello");
    assert!(response.has_read());
}

#[test]
fn test_successful_post_json() {
    let server = TestServer::start();
    let request_data = TestData {
        id: 0,
        name: "New".to_string(),
    };
    let response_data = TestData {
        id: 1,
        name: "New".to_string(),
    };

    server.mount(
        Mock::given(method("POST"))
            .and(path("/test"))
            .and(header("content-type", "application/json"))
            .and(body_json(&request_data))
            .respond_with(ResponseTemplate::new(201).set_body_json(&response_data)),
    );

    let mut response = Request::new("post", server.url("/test"))
        .json(&request_data)
        .execute()
        .unwrap();

    assert_eq!(response.status().as_u16(), 201);
    assert_eq!(response.read_json::<TestData>().unwrap(), response_data);
}

#[test]
fn test_json_map_body_on_the_wire() {
    let server = TestServer::start();
    server.mount(Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)));

    let mut data = HashMap::new();
    data.insert("a", 1);
    Request::new("POST", server.url("/"))
        .json(&data)
        .execute()
        .unwrap();

    let received = server.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].body, br#"{"a":1}"#);
    assert_eq!(received[0].headers["content-type"], "application/json");
}

#[test]
fn test_request_state_is_replayed() {
    let server = TestServer::start();
    server.mount(Mock::given(method("PATCH")).respond_with(ResponseTemplate::new(204)));

    let response = fetch(server.url("/items/7"))
        .method("patch")
        .header("X-Trace", "first")
        .headers([("X-Trace", "second"), ("X-Other", "value")])
        .body("raw payload")
        .execute()
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);

    let received = server.received();
    let request = &received[0];
    assert_eq!(request.method.as_str(), "PATCH");
    assert_eq!(request.url.path(), "/items/7");
    assert_eq!(request.body, b"raw payload");
    assert_eq!(request.headers["x-other"], "value");

    let traces: Vec<_> = request.headers.get_all("x-trace").iter().collect();
    assert_eq!(traces, ["second"]);
}

#[test]
fn test_non_success_status_is_not_an_error() {
    let server = TestServer::start();
    server.mount(
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not found")),
    );

    let mut response = fetch(server.url("/missing")).execute().unwrap();

    assert!(!response.is_success());
    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(response.read_string().unwrap(), "Not found");
}

#[test]
fn test_deserialization_error() {
    let server = TestServer::start();
    server.mount(
        Mock::given(method("GET"))
            .and(path("/test"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not-json")),
    );

    let mut response = fetch(server.url("/test")).execute().unwrap();
    let result = response.read_json::<TestData>();

    match result {
        Err(Error::DeserializationFailed {
            raw_response,
            serde_error,
            status,
        }) => {
            assert_eq!(status.as_u16(), 200);
            assert_eq!(raw_response, "not-json");
            assert!(serde_error.contains("expected"));
        }
        _ => panic!("Expected DeserializationFailed, got {:?}", result),
    }
}

#[test]
fn test_double_read() {
    let server = TestServer::start();
    server.mount(
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("once")),
    );

    let mut response = fetch(server.url("/")).execute().unwrap();

    assert_eq!(response.read_bytes().unwrap(), b"once");
    assert!(matches!(response.read_bytes(), Err(Error::BodyAlreadyRead)));
    assert!(matches!(response.read_string(), Err(Error::BodyAlreadyRead)));
    assert!(matches!(
        response.read_json::<serde_json::Value>(),
        Err(Error::BodyAlreadyRead)
    ));
}

#[test]
fn test_response_headers() {
    let server = TestServer::start();
    server.mount(
        Mock::given(method("GET")).respond_with(
            ResponseTemplate::new(200)
                .set_body_string("{}")
                .insert_header("x-custom-header", "custom-value"),
        ),
    );

    let mut response = fetch(server.url("/")).execute().unwrap();
    response.read_bytes().unwrap();

    assert_eq!(response.header("x-custom-header"), Some("custom-value"));
    assert!(response.headers().contains_key("content-length"));
}

#[test]
fn test_transport_default_headers() {
    let server = TestServer::start();
    server.mount(
        Mock::given(method("GET"))
            .and(header("user-agent", "test-agent"))
            .and(header("accept", "text/plain"))
            .respond_with(ResponseTemplate::new(200)),
    );

    let transport = ReqwestTransport::builder()
        .user_agent("test-agent")
        .default_header("Accept", "application/json")
        .unwrap()
        .build()
        .unwrap();

    let response = fetch(server.url("/"))
        .header("Accept", "text/plain")
        .execute_with(&transport)
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
}

#[test]
fn test_transport_timeout() {
    let server = TestServer::start();
    server.mount(
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500))),
    );

    let transport = ReqwestTransport::builder()
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let result = fetch(server.url("/")).execute_with(&transport);
    assert!(matches!(result, Err(Error::Timeout)));
}

#[test]
fn test_connection_refused() {
    let result = fetch("http://127.0.0.1:1/").execute();

    match result {
        Err(Error::Network(_)) => {}
        other => panic!("Expected Network error, got {:?}", other),
    }
}

#[test]
fn test_invalid_url_is_not_sent() {
    let result = fetch("://missing-scheme").execute();
    assert!(matches!(result, Err(Error::InvalidUrl(_))));
}

#[test]
fn test_unserializable_json_is_not_sent() {
    let server = TestServer::start();
    server.mount(Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)));

    let mut data = HashMap::new();
    data.insert((1, 2), "tuple keys are not valid JSON object keys");

    let result = Request::new("POST", server.url("/")).json(&data).execute();

    assert!(matches!(result, Err(Error::SerializationFailed(_))));
    assert!(server.received().is_empty());
}
