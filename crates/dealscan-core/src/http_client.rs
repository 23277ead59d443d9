use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::warn;

/// Per-request ceiling applied to every outbound call.
pub const DEFAULT_TIMEOUT_MS: u64 = 20_000;

/// Desktop browser identity; both exchanges reject obvious bot agents.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Minimal HTTP method set needed by the adapters and the notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// HTTP request envelope used by adapter transport calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
    pub timeout_ms: u64,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_headers(mut self, headers: &[(&str, &str)]) -> Self {
        for (name, value) in headers {
            self.headers
                .insert(name.to_ascii_lowercase(), (*value).to_owned());
        }
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// HTTP response envelope returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Transport-level HTTP error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    message: String,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for HttpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HttpError {}

/// Transport contract shared by adapters and the notifier.
pub trait HttpClient: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;
}

/// Production HTTP client backed by reqwest.
///
/// A client built with [`ReqwestHttpClient::with_cookie_jar`] keeps every
/// cookie the servers set and replays it on later requests from the same
/// client. Dropping the client discards the session.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Arc<reqwest::Client>,
}

impl ReqwestHttpClient {
    /// Stateless client presenting a browser user agent.
    pub fn browser() -> Self {
        Self::build(false)
    }

    /// Browser client with a session cookie store.
    pub fn with_cookie_jar() -> Self {
        Self::build(true)
    }

    /// Wrap a preconfigured reqwest client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    fn build(cookie_store: bool) -> Self {
        let builder = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .cookie_store(cookie_store);
        Self::with_client(client_or_plain(builder, cookie_store))
    }
}

fn client_or_plain(builder: reqwest::ClientBuilder, cookie_store: bool) -> reqwest::Client {
    builder.build().unwrap_or_else(|error| {
        warn!(
            %error,
            cookie_store,
            "http client setup failed, falling back to a plain client without browser user agent or cookie store"
        );
        reqwest::Client::new()
    })
}

impl HttpClient for ReqwestHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            let mut builder = match request.method {
                HttpMethod::Get => self.client.get(&request.url),
                HttpMethod::Post => self.client.post(&request.url),
            };

            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }

            builder = builder.timeout(Duration::from_millis(request.timeout_ms));

            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(|e| {
                if e.is_timeout() {
                    HttpError::new(format!("request timeout: {}", e.without_url()))
                } else if e.is_connect() {
                    HttpError::new(format!("connection failed: {}", e.without_url()))
                } else {
                    HttpError::new(format!("request failed: {}", e.without_url()))
                }
            })?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| HttpError::new(format!("failed to read response body: {}", e.without_url())))?;

            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, Clone)]
enum StubReply {
    Respond(HttpResponse),
    Fail(String),
}

/// Deterministic offline transport for tests.
///
/// Routes match on URL prefix; the longest matching prefix wins. Unmatched
/// requests fail as unreachable. Every request is recorded in order.
#[derive(Debug, Default)]
pub struct StubHttpClient {
    routes: Vec<(String, StubReply)>,
    log: Mutex<Vec<HttpRequest>>,
}

impl StubHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url_prefix: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        self.routes.push((
            url_prefix.into(),
            StubReply::Respond(HttpResponse::new(status, body)),
        ));
        self
    }

    pub fn fail(mut self, url_prefix: impl Into<String>, message: impl Into<String>) -> Self {
        self.routes
            .push((url_prefix.into(), StubReply::Fail(message.into())));
        self
    }

    /// Requests seen so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.log
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    pub fn request_urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }

    fn reply_for(&self, url: &str) -> StubReply {
        self.routes
            .iter()
            .filter(|(prefix, _)| url.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| StubReply::Fail(format!("connection failed: {url} is unreachable")))
    }
}

impl HttpClient for StubHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            let reply = self.reply_for(&request.url);
            if let Ok(mut log) = self.log.lock() {
                log.push(request);
            }
            match reply {
                StubReply::Respond(response) => Ok(response),
                StubReply::Fail(message) => Err(HttpError::new(message)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().expect("log buffer")).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("log buffer").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn failed_client_setup_is_logged_before_falling_back() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();

        // A control character makes the user agent header invalid, so the builder refuses.
        let builder = reqwest::Client::builder()
            .user_agent("broken\nagent")
            .cookie_store(true);
        tracing::subscriber::with_default(subscriber, || {
            let _client = client_or_plain(builder, true);
        });

        let output = logs.contents();
        assert!(output.contains("http client setup failed"), "logs: {output}");
        assert!(output.contains("cookie_store=true"), "logs: {output}");
    }

    #[test]
    fn header_names_are_lowercased() {
        let request = HttpRequest::get("https://example.test/deals")
            .with_header("Referer", "https://example.test/");

        assert_eq!(
            request.headers.get("referer").map(String::as_str),
            Some("https://example.test/")
        );
    }

    #[test]
    fn requests_default_to_twenty_second_timeout() {
        let request = HttpRequest::post("https://example.test/send");
        assert_eq!(request.timeout_ms, 20_000);
        assert_eq!(request.method, HttpMethod::Post);
    }

    #[tokio::test]
    async fn stub_prefers_longest_matching_prefix() {
        let stub = StubHttpClient::new()
            .respond("https://example.test/", 200, "root")
            .respond("https://example.test/api/", 200, "api");

        let response = stub
            .execute(HttpRequest::get("https://example.test/api/deals"))
            .await
            .expect("routed");
        assert_eq!(response.body, "api");
    }

    #[tokio::test]
    async fn stub_fails_unrouted_urls_and_records_them() {
        let stub = StubHttpClient::new();
        let error = stub
            .execute(HttpRequest::get("https://nowhere.test/"))
            .await
            .expect_err("unrouted");

        assert!(error.message().contains("unreachable"));
        assert_eq!(stub.request_urls(), vec!["https://nowhere.test/".to_owned()]);
    }
}
