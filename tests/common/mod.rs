//! One-shot mock HTTP server for exercising the clients end to end.
#![allow(dead_code)]

use std::sync::Once;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

static TRACING: Once = Once::new();

/// Install the env-filtered subscriber once per test binary; run tests with
/// `RUST_LOG=auth0_client=debug` to see the client's request logging.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Serve the given canned responses in order, one connection each, and hand
/// back the raw requests once every response has been sent.
pub async fn spawn_server(responses: Vec<String>) -> (Url, JoinHandle<Vec<String>>) {
    init_tracing();
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("listener should expose addr");
    let base = Url::parse(&format!("http://{addr}/")).expect("base url should parse");

    let handle = tokio::spawn(async move {
        let mut requests = Vec::with_capacity(responses.len());
        for response in responses {
            let (mut socket, _) = listener.accept().await.expect("accept should succeed");
            requests.push(read_request(&mut socket).await);
            socket
                .write_all(response.as_bytes())
                .await
                .expect("response should write");
        }
        requests
    });

    (base, handle)
}

/// Read one HTTP/1.1 request, headers plus content-length body.
async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut raw = Vec::new();
    let mut chunk = [0_u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.expect("request should read");
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&raw);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())?
                })
                .unwrap_or(0);
            if raw.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&raw).into_owned()
}

pub fn json_response(status: &str, body: &str) -> String {
    response_with_headers(status, "content-type: application/json\r\n", body)
}

pub fn text_response(status: &str, body: &str) -> String {
    response_with_headers(status, "content-type: text/html\r\n", body)
}

pub fn rate_limited_response(body: &str) -> String {
    response_with_headers(
        "429 Too Many Requests",
        "content-type: application/json\r\nretry-after: 0\r\n",
        body,
    )
}

pub fn response_with_headers(status: &str, headers: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\n{headers}content-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    )
}
