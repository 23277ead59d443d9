use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::NotifyError;

const TELEGRAM_API: &str = "https://api.telegram.org";

#[derive(Debug, Deserialize)]
struct TelegramReply {
    #[serde(default)]
    ok: bool,
}

/// Telegram Bot API sender. One attempt per message, no retry.
pub struct TelegramNotifier {
    http_client: Arc<dyn HttpClient>,
    token: String,
    api_base: String,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("token", &"<redacted>")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl TelegramNotifier {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::browser()), token)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, token: impl Into<String>) -> Self {
        Self {
            http_client,
            token: token.into(),
            api_base: String::from(TELEGRAM_API),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_owned();
        self
    }

    /// Post `text` to `chat_id` via `sendMessage`.
    ///
    /// Success requires the reply's `ok` flag; any other reply is returned as
    /// [`NotifyError::Rejected`] with the API's own body.
    pub async fn send(&self, chat_id: &str, text: &str) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.token);
        let body = format!(
            "chat_id={}&text={}",
            urlencoding::encode(chat_id),
            urlencoding::encode(text)
        );
        let request = HttpRequest::post(url)
            .with_header("content-type", "application/x-www-form-urlencoded")
            .with_body(body);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| NotifyError::Transport(self.redact(error.message())))?;

        let reply: TelegramReply =
            serde_json::from_str(&response.body).map_err(|_| NotifyError::InvalidResponse {
                status: response.status,
                body: self.redact(&response.body),
            })?;

        if !reply.ok {
            return Err(NotifyError::Rejected {
                payload: self.redact(&response.body),
            });
        }

        info!(chars = text.chars().count(), "telegram message delivered");
        Ok(())
    }

    fn redact(&self, text: &str) -> String {
        if self.token.is_empty() {
            return text.to_owned();
        }
        text.replace(&self.token, "<redacted>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{HttpMethod, StubHttpClient};

    const SEND_URL: &str = "https://api.telegram.org/bot123:secret/sendMessage";

    #[tokio::test]
    async fn posts_form_encoded_chat_and_text() {
        let stub = Arc::new(StubHttpClient::new().respond(SEND_URL, 200, r#"{"ok":true,"result":{}}"#));
        let notifier = TelegramNotifier::with_http_client(stub.clone(), "123:secret");

        notifier.send("-100200", "NSE\n- a & b").await.expect("delivered");

        let requests = stub.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(
            request.headers.get("content-type").map(String::as_str),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(
            request.body.as_deref(),
            Some("chat_id=-100200&text=NSE%0A-%20a%20%26%20b")
        );
    }

    #[tokio::test]
    async fn false_ok_flag_surfaces_api_payload() {
        let body = r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#;
        let stub = Arc::new(StubHttpClient::new().respond(SEND_URL, 400, body));
        let notifier = TelegramNotifier::with_http_client(stub, "123:secret");

        let err = notifier.send("nope", "hi").await.expect_err("rejected");
        match err {
            NotifyError::Rejected { payload } => assert!(payload.contains("chat not found")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreadable_reply_is_invalid_response() {
        let stub = Arc::new(StubHttpClient::new().respond(SEND_URL, 502, "<html>bad gateway</html>"));
        let notifier = TelegramNotifier::with_http_client(stub, "123:secret");

        let err = notifier.send("1", "hi").await.expect_err("invalid");
        assert!(matches!(err, NotifyError::InvalidResponse { status: 502, .. }));
    }

    #[tokio::test]
    async fn transport_errors_never_leak_the_token() {
        let stub = Arc::new(StubHttpClient::new().fail(
            SEND_URL,
            "connection failed: https://api.telegram.org/bot123:secret/sendMessage",
        ));
        let notifier = TelegramNotifier::with_http_client(stub, "123:secret");

        let err = notifier.send("1", "hi").await.expect_err("transport");
        assert!(matches!(err, NotifyError::Transport(_)));
        assert!(!err.to_string().contains("123:secret"));
    }
}
