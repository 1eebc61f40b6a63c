//! Telegram Bot API transport.
//!
//! Thin client over the two outbound text operations this crate cares
//! about: `sendMessage` and `editMessageText`. The [`Transport`] trait is
//! the seam [`crate::intercept::SafeTransport`] decorates.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::config::DeliveryLimits;
use crate::convert::md_to_html;
use crate::error::TransportError;
use crate::sanitize::sanitize_markdown;
use crate::split::{prepare_html_parts, truncate_safe};

/// Rendering mode requested for an outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    /// Legacy Markdown — rejects the whole payload on unbalanced entities.
    Markdown,
    /// HTML — deterministic; invalid markup degrades to plain text.
    #[serde(rename = "HTML")]
    Html,
}

/// Outbound text operations of a messaging transport.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a new text message to a chat.
    async fn send_text(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<(), TransportError>;

    /// Edit the text of an existing message.
    async fn edit_text(
        &self,
        chat_id: &str,
        message_id: i64,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<(), TransportError>;
}

/// Telegram Bot API client.
pub struct TelegramTransport {
    bot_token: SecretString,
    client: reqwest::Client,
    limits: DeliveryLimits,
}

impl TelegramTransport {
    pub fn new(bot_token: SecretString) -> Self {
        Self {
            bot_token,
            client: reqwest::Client::new(),
            limits: DeliveryLimits::default(),
        }
    }

    /// Override the default delivery limits.
    pub fn with_limits(mut self, limits: DeliveryLimits) -> Self {
        self.limits = limits;
        self
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "https://api.telegram.org/bot{}/{method}",
            self.bot_token.expose_secret()
        )
    }

    async fn call(&self, method: &str, body: serde_json::Value) -> Result<(), TransportError> {
        let resp = self
            .client
            .post(self.api_url(method))
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let detail = resp.text().await.unwrap_or_default();
            tracing::warn!(method, status, "Telegram API call rejected");
            return Err(TransportError::ApiRejected {
                method: method.to_string(),
                status,
                detail,
            });
        }
        Ok(())
    }

    /// Run the full safety pipeline on `text` and send every resulting
    /// part, in order, as a separate HTML-mode message.
    pub async fn send_rendered(&self, chat_id: &str, text: &str) -> Result<(), TransportError> {
        let parts = prepare_html_parts(text, self.limits.max_len);
        for part in &parts {
            self.send_text(chat_id, part, Some(ParseMode::Html)).await?;
        }
        tracing::info!(chat_id, parts = parts.len(), "rendered message delivered");
        Ok(())
    }

    /// Send `text` as one bounded HTML message, truncating at a safe
    /// boundary when it is too long. The preview/summary path; use
    /// [`Self::send_rendered`] for full multi-part delivery.
    pub async fn send_preview(&self, chat_id: &str, text: &str) -> Result<(), TransportError> {
        let clean = sanitize_markdown(text);
        let bounded = truncate_safe(&clean, self.limits.max_len, &self.limits.truncation_suffix);
        // Truncation can cut a marker pair in half; repair before converting.
        let html = md_to_html(&sanitize_markdown(&bounded));
        self.send_text(chat_id, &html, Some(ParseMode::Html)).await
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_text(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<(), TransportError> {
        let mut body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
        });
        if let Some(mode) = parse_mode {
            body["parse_mode"] = serde_json::json!(mode);
        }
        self.call("sendMessage", body).await
    }

    async fn edit_text(
        &self,
        chat_id: &str,
        message_id: i64,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<(), TransportError> {
        let mut body = serde_json::json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text,
        });
        if let Some(mode) = parse_mode {
            body["parse_mode"] = serde_json::json!(mode);
        }
        self.call("editMessageText", body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_embeds_token_and_method() {
        let t = TelegramTransport::new(SecretString::from("123:ABC".to_string()));
        assert_eq!(
            t.api_url("sendMessage"),
            "https://api.telegram.org/bot123:ABC/sendMessage"
        );
        assert_eq!(
            t.api_url("editMessageText"),
            "https://api.telegram.org/bot123:ABC/editMessageText"
        );
    }

    #[test]
    fn parse_mode_serializes_to_api_strings() {
        assert_eq!(
            serde_json::json!(ParseMode::Markdown),
            serde_json::json!("Markdown")
        );
        assert_eq!(serde_json::json!(ParseMode::Html), serde_json::json!("HTML"));
    }

    #[tokio::test]
    async fn send_text_fails_without_server() {
        let t = TelegramTransport::new(SecretString::from("fake-token".to_string()));
        let result = t.send_text("123", "hello", None).await;
        assert!(result.is_err());
    }
}
