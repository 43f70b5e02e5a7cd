use std::time::Duration;

use reqwest::header::{HeaderMap, ACCEPT, RETRY_AFTER};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::error;
use url::Url;

use crate::error::{error_from_status, ApiErrorBody, Error, Result};
use crate::retry::{with_retry, RetryPolicy};

/// Shared REST transport used by every endpoint group.
///
/// One instance wraps a pooled `reqwest::Client` plus the tenant base URL and
/// retry policy. Endpoint methods describe their call as an [`ApiRequest`]
/// and pick the response handling they need (`json`, `text`, or `empty`).
#[derive(Debug, Clone)]
pub(crate) struct RestClient {
    http: reqwest::Client,
    base: Url,
    retry: RetryPolicy,
}

impl RestClient {
    pub(crate) fn for_domain(domain: &str, timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        let base = Url::parse(&format!("https://{domain}/"))
            .map_err(|e| Error::Configuration(format!("invalid tenant domain {domain:?}: {e}")))?;
        Self::for_base_url(base, timeout, retry)
    }

    pub(crate) fn for_base_url(base: Url, timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        if base.cannot_be_a_base() {
            return Err(Error::Configuration(format!(
                "base url {base} cannot carry path segments"
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Unexpected(anyhow::anyhow!("failed to build http client: {e}")))?;

        Ok(Self { http, base, retry })
    }

    /// Absolute URL for the given path segments. Segments are
    /// percent-encoded, which matters for user IDs like `auth0|abc123`.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .expect("base url validated at construction");
            path.pop_if_empty();
            path.extend(segments);
        }
        url
    }

    pub(crate) async fn json<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        let response = self.execute(request).await?;
        response.json::<T>().await.map_err(|e| {
            error!(error = %e, "failed to decode auth0 response body");
            Error::Decode(e)
        })
    }

    pub(crate) async fn text(&self, request: &ApiRequest) -> Result<String> {
        let response = self.execute(request).await?;
        response.text().await.map_err(|e| {
            error!(error = %e, "failed to read auth0 response body");
            Error::Decode(e)
        })
    }

    pub(crate) async fn empty(&self, request: &ApiRequest) -> Result<()> {
        self.execute(request).await.map(|_| ())
    }

    async fn execute(&self, request: &ApiRequest) -> Result<reqwest::Response> {
        with_retry(&self.retry, || self.send_once(request)).await
    }

    async fn send_once(&self, request: &ApiRequest) -> Result<reqwest::Response> {
        let mut builder = self
            .http
            .request(request.method.clone(), request.url.clone())
            .header(ACCEPT, "application/json");

        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            error!(
                error = %e,
                method = %request.method,
                url = %request.url,
                "failed to send request to auth0"
            );
            Error::Transport(e)
        })?;

        if response.status().is_success() {
            return Ok(response);
        }

        Err(handle_error(response).await)
    }
}

/// Translate a non-success response into an [`Error`].
///
/// The body is parsed as an Auth0 error payload when possible; otherwise the
/// status alone decides the variant. `Retry-After` is captured either way so
/// the retry layer can honor it.
pub(crate) async fn handle_error(response: reqwest::Response) -> Error {
    let status = response.status();
    let retry_after = parse_retry_after(response.headers());

    match response.json::<ApiErrorBody>().await {
        Ok(body) => body.into_error(status.as_u16(), retry_after),
        Err(_) => {
            error!(
                status = %status,
                "auth0 request failed with unparsable error body"
            );
            error_from_status(status.as_u16(), retry_after)
        }
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// A single API call, held in a resend-safe form.
///
/// The body is serialized to a `serde_json::Value` up front so a retried
/// request rebuilds identically.
#[derive(Debug, Clone)]
pub(crate) struct ApiRequest {
    method: Method,
    url: Url,
    bearer: Option<String>,
    body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub(crate) fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            bearer: None,
            body: None,
        }
    }

    pub(crate) fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    pub(crate) fn post(url: Url) -> Self {
        Self::new(Method::POST, url)
    }

    pub(crate) fn patch(url: Url) -> Self {
        Self::new(Method::PATCH, url)
    }

    pub(crate) fn delete(url: Url) -> Self {
        Self::new(Method::DELETE, url)
    }

    pub(crate) fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    pub(crate) fn json<B: Serialize>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body).map_err(|e| {
            Error::Unexpected(anyhow::anyhow!("failed to serialize request body: {e}"))
        })?);
        Ok(self)
    }

    pub(crate) fn query(mut self, pairs: &[(&str, String)]) -> Self {
        if !pairs.is_empty() {
            let mut qp = self.url.query_pairs_mut();
            for (key, value) in pairs {
                qp.append_pair(key, value);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::RetryPolicy;
    use serde::Deserialize;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn client_for(addr: std::net::SocketAddr) -> RestClient {
        let base = Url::parse(&format!("http://{addr}/")).expect("base url should parse");
        RestClient::for_base_url(
            base,
            Duration::from_secs(5),
            RetryPolicy {
                max_attempts: 3,
                initial_backoff: Duration::from_millis(5),
                max_backoff: Duration::from_millis(20),
                multiplier: 2.0,
                jitter: 0.0,
            },
        )
        .expect("client should build")
    }

    async fn serve_responses(listener: TcpListener, responses: Vec<String>) {
        for response in responses {
            let (mut socket, _) = listener.accept().await.expect("accept should succeed");
            let mut buffer = [0_u8; 4096];
            let _ = socket.read(&mut buffer).await;
            socket
                .write_all(response.as_bytes())
                .await
                .expect("response should write");
        }
    }

    fn http_response(status: &str, headers: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\n{headers}connection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[derive(Debug, Deserialize)]
    struct Pong {
        ok: bool,
    }

    #[test]
    fn endpoint_percent_encodes_segments() {
        let base = Url::parse("https://tenant.auth0.com/").expect("url should parse");
        let client = RestClient::for_base_url(base, Duration::from_secs(1), RetryPolicy::none())
            .expect("client should build");

        let url = client.endpoint(&["api", "v2", "users", "auth0|abc 123"]);
        assert_eq!(
            url.as_str(),
            "https://tenant.auth0.com/api/v2/users/auth0%7Cabc%20123"
        );
    }

    #[test]
    fn query_pairs_are_appended() {
        let url = Url::parse("https://tenant.auth0.com/api/v2/users").expect("url should parse");
        let request = ApiRequest::get(url).query(&[
            ("page", "2".to_string()),
            ("q", "email:\"a@b.c\"".to_string()),
        ]);
        assert_eq!(
            request.url.query(),
            Some("page=2&q=email%3A%22a%40b.c%22")
        );
    }

    #[test]
    fn retry_after_header_parses_seconds() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, "7".parse().expect("header value"));
        assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(7)));

        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, "soon".parse().expect("header value"));
        assert_eq!(parse_retry_after(&headers), None);

        assert_eq!(parse_retry_after(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn decodes_successful_json_response() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("address should exist");
        let server = tokio::spawn(serve_responses(
            listener,
            vec![http_response("200 OK", "", r#"{"ok":true}"#)],
        ));

        let client = client_for(addr);
        let request = ApiRequest::get(client.endpoint(&["ping"]));
        let pong: Pong = client.json(&request).await.expect("request should succeed");

        assert!(pong.ok);
        server.await.expect("server task should complete");
    }

    #[tokio::test]
    async fn retries_429_then_succeeds() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("address should exist");
        let server = tokio::spawn(serve_responses(
            listener,
            vec![
                http_response(
                    "429 Too Many Requests",
                    "retry-after: 0\r\n",
                    r#"{"error":"too_many_requests","error_description":"rate limit"}"#,
                ),
                http_response("200 OK", "", r#"{"ok":true}"#),
            ],
        ));

        let client = client_for(addr);
        let request = ApiRequest::get(client.endpoint(&["ping"]));
        let pong: Pong = client.json(&request).await.expect("retry should succeed");

        assert!(pong.ok);
        server.await.expect("server task should complete");
    }

    #[tokio::test]
    async fn surfaces_api_error_body() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("address should exist");
        let server = tokio::spawn(serve_responses(
            listener,
            vec![http_response(
                "409 Conflict",
                "",
                r#"{"code":"user_exists","description":"The user already exists."}"#,
            )],
        ));

        let client = client_for(addr);
        let request = ApiRequest::get(client.endpoint(&["ping"]));
        let result: Result<Pong> = client.json(&request).await;

        assert!(matches!(
            result,
            Err(Error::Api { status: 409, ref code, .. }) if code == "user_exists"
        ));
        server.await.expect("server task should complete");
    }

    #[tokio::test]
    async fn unparsable_error_maps_by_status() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("address should exist");
        let server = tokio::spawn(serve_responses(
            listener,
            vec![
                "HTTP/1.1 401 Unauthorized\r\ncontent-type: text/plain\r\ncontent-length: 6\r\nconnection: close\r\n\r\nnope!!"
                    .to_string(),
            ],
        ));

        let client = client_for(addr);
        let request = ApiRequest::get(client.endpoint(&["ping"]));
        let result: Result<Pong> = client.json(&request).await;

        assert!(matches!(result, Err(Error::Unauthorized)));
        server.await.expect("server task should complete");
    }

    #[tokio::test]
    async fn persistent_429_exhausts_retry_budget() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("address should exist");
        let limited = http_response(
            "429 Too Many Requests",
            "retry-after: 0\r\n",
            r#"{"error":"too_many_requests","error_description":"rate limit"}"#,
        );
        let server = tokio::spawn(serve_responses(
            listener,
            vec![limited.clone(), limited.clone(), limited],
        ));

        let client = client_for(addr);
        let request = ApiRequest::get(client.endpoint(&["ping"]));
        let result: Result<Pong> = client.json(&request).await;

        assert!(matches!(
            result,
            Err(Error::RetryExhausted { attempts: 3, .. })
        ));
        server.await.expect("server task should complete");
    }
}
