//! Wire-level tests for the Gemini provider
//!
//! A local listener answers each connection in turn with a canned response and
//! hands back the raw requests it received.

use std::collections::HashMap;
use tally_llm::{GeminiProvider, LlmError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// One HTTP request as seen by the server
struct RecordedRequest {
    request_line: String,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

async fn read_request(socket: &mut TcpStream) -> RecordedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before the headers ended");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap().to_string();
    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
        .collect();

    let length: usize = headers
        .get("content-length")
        .map(|v| v.parse().unwrap())
        .unwrap_or(0);
    let mut body = buf[header_end..].to_vec();
    while body.len() < length {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before the body ended");
        body.extend_from_slice(&chunk[..n]);
    }

    RecordedRequest {
        request_line,
        headers,
        body,
    }
}

/// Answer one connection per response, in order
async fn serve(responses: Vec<(u16, String)>) -> (String, JoinHandle<Vec<RecordedRequest>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for (status, reply) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut socket).await);
            let response = format!(
                "HTTP/1.1 {} Status\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                reply.len(),
                reply
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        }
        requests
    });

    (url, handle)
}

#[tokio::test]
async fn test_generate_sends_key_header_and_prompt() {
    let reply = r#"{"candidates":[{"content":{"parts":[{"text":"[]"}],"role":"model"},"finishReason":"STOP"}]}"#;
    let (url, server) = serve(vec![(200, reply.to_string())]).await;
    let provider = GeminiProvider::new("g-key", "gemini-flash-latest")
        .unwrap()
        .with_endpoint(url);

    let text = provider.generate("extract these transactions").await.unwrap();
    assert_eq!(text, "[]");

    let requests = server.await.unwrap();
    let request = &requests[0];
    assert_eq!(
        request.request_line,
        "POST /v1beta/models/gemini-flash-latest:generateContent HTTP/1.1"
    );
    assert_eq!(request.headers["x-goog-api-key"], "g-key");
    assert!(!request.headers.contains_key("authorization"));

    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(body["contents"][0]["parts"][0]["text"], "extract these transactions");
}

#[tokio::test]
async fn test_generate_maps_error_statuses() {
    let (url, server) = serve(vec![
        (429, r#"{"error":{"code":429}}"#.to_string()),
        (403, r#"{"error":{"code":403,"message":"API key not valid"}}"#.to_string()),
        (404, r#"{"error":{"code":404}}"#.to_string()),
    ])
    .await;
    let provider = GeminiProvider::new("g-key", "gemini-missing")
        .unwrap()
        .with_endpoint(url);

    assert!(matches!(
        provider.generate("p").await,
        Err(LlmError::RateLimitExceeded)
    ));
    match provider.generate("p").await {
        Err(LlmError::Unauthorized(msg)) => assert!(msg.contains("API key not valid")),
        other => panic!("Expected Unauthorized, got {:?}", other),
    }
    assert!(matches!(
        provider.generate("p").await,
        Err(LlmError::ModelNotAvailable(m)) if m == "gemini-missing"
    ));

    assert_eq!(server.await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_models_follows_pagination() {
    let first = r#"{"models":[{"name":"models/gemini-flash-latest","supportedGenerationMethods":["generateContent"]}],"nextPageToken":"p2"}"#;
    let second = r#"{"models":[{"name":"models/text-embedding-004","supportedGenerationMethods":["embedContent"]}]}"#;
    let (url, server) = serve(vec![(200, first.to_string()), (200, second.to_string())]).await;
    let provider = GeminiProvider::new("g-key", "gemini-flash-latest")
        .unwrap()
        .with_endpoint(url);

    let models = provider.list_models().await.unwrap();

    let names: Vec<_> = models.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["models/gemini-flash-latest", "models/text-embedding-004"]);

    let requests = server.await.unwrap();
    assert_eq!(requests[0].request_line, "GET /v1beta/models?pageSize=100 HTTP/1.1");
    assert_eq!(
        requests[1].request_line,
        "GET /v1beta/models?pageSize=100&pageToken=p2 HTTP/1.1"
    );
    assert!(requests.iter().all(|r| r.headers["x-goog-api-key"] == "g-key"));
}
