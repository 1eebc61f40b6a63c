//! Transport-layer Markdown → HTML intercept.
//!
//! Wraps a [`Transport`] so every outbound call requesting legacy Markdown
//! rendering is rewritten to converted HTML before delegation. Covers the
//! two text-send paths (new message and edit), which is every path a
//! payload can take out of this crate. No retries, no state, no error
//! translation.

use async_trait::async_trait;

use crate::convert::md_to_html;
use crate::error::TransportError;
use crate::transport::{ParseMode, Transport};

/// Decorator that auto-converts Markdown payloads to HTML.
pub struct SafeTransport<T> {
    inner: T,
}

impl<T> SafeTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Access the wrapped transport.
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: Transport> Transport for SafeTransport<T> {
    async fn send_text(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<(), TransportError> {
        match parse_mode {
            Some(ParseMode::Markdown) => {
                let html = md_to_html(text);
                self.inner
                    .send_text(chat_id, &html, Some(ParseMode::Html))
                    .await
            }
            other => self.inner.send_text(chat_id, text, other).await,
        }
    }

    async fn edit_text(
        &self,
        chat_id: &str,
        message_id: i64,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<(), TransportError> {
        match parse_mode {
            Some(ParseMode::Markdown) => {
                let html = md_to_html(text);
                self.inner
                    .edit_text(chat_id, message_id, &html, Some(ParseMode::Html))
                    .await
            }
            other => self.inner.edit_text(chat_id, message_id, text, other).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every call instead of talking to a network.
    #[derive(Default)]
    struct RecordingTransport {
        calls: Mutex<Vec<(String, String, Option<ParseMode>)>>,
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send_text(
            &self,
            chat_id: &str,
            text: &str,
            parse_mode: Option<ParseMode>,
        ) -> Result<(), TransportError> {
            self.calls.lock().unwrap().push((
                format!("send:{chat_id}"),
                text.to_string(),
                parse_mode,
            ));
            Ok(())
        }

        async fn edit_text(
            &self,
            chat_id: &str,
            message_id: i64,
            text: &str,
            parse_mode: Option<ParseMode>,
        ) -> Result<(), TransportError> {
            self.calls.lock().unwrap().push((
                format!("edit:{chat_id}:{message_id}"),
                text.to_string(),
                parse_mode,
            ));
            Ok(())
        }
    }

    #[tokio::test]
    async fn markdown_send_converted_to_html() {
        let safe = SafeTransport::new(RecordingTransport::default());
        safe.send_text("42", "**hi**", Some(ParseMode::Markdown))
            .await
            .unwrap();

        let calls = safe.inner().calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![(
                "send:42".to_string(),
                "<b>hi</b>".to_string(),
                Some(ParseMode::Html)
            )]
        );
    }

    #[tokio::test]
    async fn markdown_edit_converted_to_html() {
        let safe = SafeTransport::new(RecordingTransport::default());
        safe.edit_text("42", 7, "`code`", Some(ParseMode::Markdown))
            .await
            .unwrap();

        let calls = safe.inner().calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![(
                "edit:42:7".to_string(),
                "<code>code</code>".to_string(),
                Some(ParseMode::Html)
            )]
        );
    }

    #[tokio::test]
    async fn html_mode_passes_through_untouched() {
        let safe = SafeTransport::new(RecordingTransport::default());
        safe.send_text("42", "<b>already html</b>", Some(ParseMode::Html))
            .await
            .unwrap();

        let calls = safe.inner().calls.lock().unwrap();
        assert_eq!(calls[0].1, "<b>already html</b>");
        assert_eq!(calls[0].2, Some(ParseMode::Html));
    }

    #[tokio::test]
    async fn plain_mode_passes_through_untouched() {
        let safe = SafeTransport::new(RecordingTransport::default());
        safe.send_text("42", "*raw*", None).await.unwrap();

        let calls = safe.inner().calls.lock().unwrap();
        assert_eq!(calls[0].1, "*raw*");
        assert_eq!(calls[0].2, None);
    }

    #[tokio::test]
    async fn malformed_markdown_still_delivered() {
        let safe = SafeTransport::new(RecordingTransport::default());
        safe.send_text("42", "broken *bold and <tag>", Some(ParseMode::Markdown))
            .await
            .unwrap();

        let calls = safe.inner().calls.lock().unwrap();
        assert_eq!(calls[0].1, "broken *bold and &lt;tag&gt;");
        assert_eq!(calls[0].2, Some(ParseMode::Html));
    }
}
