#![allow(dead_code)]

use actix_web::{dev::ServerHandle, http::StatusCode, web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::{json, Value};
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener};
use std::sync::{Arc, Mutex};
use std::thread;

/// What the mock upstream saw for one request
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: String,
    pub api_key_header: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    status: u16,
    body: Value,
    hits: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// In-process stand-in for the Gemini API that answers every request with a
/// fixed status and body.
pub struct MockUpstream {
    pub base_url: String,
    hits: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: ServerHandle,
}

impl MockUpstream {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.hits.lock().unwrap().clone()
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

async fn upstream(req: HttpRequest, body: web::Bytes, state: web::Data<MockState>) -> HttpResponse {
    state.hits.lock().unwrap().push(RecordedRequest {
        path: req.path().to_string(),
        query: req.query_string().to_string(),
        api_key_header: req
            .headers()
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });
    HttpResponse::build(StatusCode::from_u16(state.status).unwrap()).json(&state.body)
}

pub async fn start_mock_upstream(status: u16, body: Value) -> MockUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let hits = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        status,
        body,
        hits: hits.clone(),
    };

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .default_service(web::to(upstream))
    })
    .workers(1)
    .listen(listener)
    .unwrap()
    .run();
    let handle = server.handle();
    actix_rt::spawn(server);

    MockUpstream {
        base_url: format!("http://127.0.0.1:{port}"),
        hits,
        handle,
    }
}

pub fn candidate_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP",
            "index": 0
        }],
        "modelVersion": "gemini-2.5-flash-lite"
    })
}

/// A local port with nothing listening on it
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Answers a single request with `status_line`, a `Content-Length` of
/// `declared_len` and only `body` on the wire, then closes the connection.
pub fn start_truncated_upstream(status_line: &str, declared_len: usize, body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {declared_len}\r\n\r\n{body}"
    );

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        read_full_request(&mut stream);
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        let _ = stream.shutdown(Shutdown::Write);
        // Drain until the client hangs up so the close is a clean FIN.
        let mut sink = [0u8; 512];
        while matches!(stream.read(&mut sink), Ok(n) if n > 0) {}
    });

    format!("http://127.0.0.1:{port}")
}

fn read_full_request(stream: &mut impl Read) {
    let mut received = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            return;
        }
        received.extend_from_slice(&chunk[..n]);
        if let Some(end) = received.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&received[..end]).to_ascii_lowercase();
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if received.len() >= end + 4 + content_length {
                return;
            }
        }
    }
}
