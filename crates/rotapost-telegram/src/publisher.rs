//! One-shot message publisher for the Telegram Bot API.
//!
//! Wire contract: `POST {base}/bot{token}/sendMessage` with
//! `{chat_id, text, parse_mode: "HTML"}`. Success is HTTP 2xx *and*
//! `ok: true` in the body; anything else is classified as a transport
//! failure or an API rejection.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::PublishError;

/// Hard cap on one Bot API call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Envelope every Bot API response is wrapped in.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<serde_json::Value>,
}

/// Sends single messages to one channel. Cheap to clone via the shared
/// reqwest client; holds no mutable state.
#[derive(Debug, Clone)]
pub struct Publisher {
    client: reqwest::Client,
    api_base: String,
    token: String,
    chat_id: String,
}

impl Publisher {
    /// `api_base` is the Bot API origin (`https://api.telegram.org` in
    /// production, a mock server in tests).
    pub fn new(api_base: &str, token: &str, chat_id: &str) -> Result<Self, PublishError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PublishError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
            chat_id: chat_id.to_string(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.token)
    }

    /// Send one HTML-formatted message to the channel.
    pub async fn send(&self, text: &str) -> Result<(), PublishError> {
        self.call(
            "sendMessage",
            json!({
                "chat_id": self.chat_id,
                "text": text,
                "parse_mode": "HTML",
            }),
        )
        .await?;
        debug!(chars = text.len(), "message accepted by Bot API");
        Ok(())
    }

    /// Verify the bot can see the channel; returns its title.
    pub async fn check_channel(&self) -> Result<String, PublishError> {
        let envelope = self
            .call("getChat", json!({ "chat_id": self.chat_id }))
            .await?;
        let title = envelope
            .result
            .as_ref()
            .and_then(|r| r.get("title"))
            .and_then(|t| t.as_str())
            .unwrap_or(&self.chat_id)
            .to_string();
        Ok(title)
    }

    async fn call(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> Result<ApiEnvelope, PublishError> {
        let response = self
            .client
            .post(self.method_url(method))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PublishError::Transport("request timed out".to_string())
                } else {
                    PublishError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        let envelope: ApiEnvelope = match response.json().await {
            Ok(env) => env,
            Err(e) => {
                // A 2xx with an unreadable body is still a failed call.
                warn!(%status, "unparseable Bot API response: {e}");
                return Err(PublishError::Api(format!(
                    "unparseable response (HTTP {status})"
                )));
            }
        };

        if status.is_success() && envelope.ok {
            Ok(envelope)
        } else {
            let detail = envelope
                .description
                .unwrap_or_else(|| format!("HTTP {status}"));
            Err(PublishError::Api(detail))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn publisher(server: &MockServer) -> Publisher {
        Publisher::new(&server.uri(), "TEST:TOKEN", "@channel").unwrap()
    }

    #[tokio::test]
    async fn ok_true_is_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST:TOKEN/sendMessage"))
            .and(body_partial_json(serde_json::json!({
                "chat_id": "@channel",
                "parse_mode": "HTML",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": { "message_id": 42 },
            })))
            .mount(&server)
            .await;

        let result = publisher(&server).await.send("<b>hello</b>").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn http_200_with_ok_false_is_an_api_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": false,
                "description": "chat not found",
            })))
            .mount(&server)
            .await;

        let err = publisher(&server).await.send("hello").await.unwrap_err();
        match err {
            PublishError::Api(detail) => assert_eq!(detail, "chat not found"),
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_2xx_is_an_api_rejection_with_description() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "ok": false,
                "description": "bot was kicked from the channel",
            })))
            .mount(&server)
            .await;

        let err = publisher(&server).await.send("hello").await.unwrap_err();
        assert!(matches!(&err, PublishError::Api(d) if d.contains("kicked")));
    }

    #[tokio::test]
    async fn refused_connection_is_a_transport_failure() {
        // Nothing is listening on this port.
        let publisher = Publisher::new("http://127.0.0.1:9", "TEST:TOKEN", "@channel").unwrap();
        let err = publisher.send("hello").await.unwrap_err();
        assert!(matches!(err, PublishError::Transport(_)));
    }

    #[tokio::test]
    async fn check_channel_returns_the_title() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST:TOKEN/getChat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": { "id": -100123, "title": "Safety Channel" },
            })))
            .mount(&server)
            .await;

        let title = publisher(&server).await.check_channel().await.unwrap();
        assert_eq!(title, "Safety Channel");
    }
}
