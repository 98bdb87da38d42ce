use crate::render::render_event;
use async_trait::async_trait;
use kawase_core::analysis::error::SinkError;
use kawase_core::analysis::port::{AnalysisEvent, DecisionSink};
use serde::Serialize;

/// # Summary
/// A sink implementation that pushes analysis events via Telegram Bot API.
///
/// # Invariants
/// * `bot_token` must be valid.
/// * `chat_id` must be accessible by the bot.
pub struct TelegramSink {
    /// The Bot API token.
    bot_token: String,
    /// The target Chat ID.
    chat_id: String,
    /// The HTTP client used for requests.
    client: reqwest::Client,
}

/// # Summary
/// Payload structure for Telegram `sendMessage` API.
#[derive(Serialize)]
struct TelegramMessage {
    chat_id: String,
    text: String,
    parse_mode: String,
}

impl TelegramSink {
    /// # Summary
    /// Creates a new `TelegramSink`.
    ///
    /// # Logic
    /// Initializes the struct with provided credentials and a default HTTP client.
    ///
    /// # Arguments
    /// * `bot_token` - The Telegram Bot API token.
    /// * `chat_id` - The target chat ID to send messages to.
    ///
    /// # Returns
    /// * A new instance of `TelegramSink`.
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            bot_token,
            chat_id,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl DecisionSink for TelegramSink {
    /// # Summary
    /// Sends the rendered event to the configured Telegram chat.
    ///
    /// # Logic
    /// 1. Renders the event as a subject and body.
    /// 2. Formats the message with a bold subject line.
    /// 3. Sends a POST request to the Telegram API.
    /// 4. Checks the response status and returns success or failure.
    ///
    /// # Arguments
    /// * `event` - The analysis event to deliver.
    ///
    /// # Returns
    /// * `Ok(())` if the message was sent successfully.
    /// * `Err(SinkError)` if a network error occurs or the API returns a non-success status.
    async fn publish(&self, event: &AnalysisEvent) -> Result<(), SinkError> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);
        let (subject, body) = render_event(event);
        // Simple formatting: Bold subject + newline + body
        let text = format!("*{}*\n{}", subject, body);

        let payload = TelegramMessage {
            chat_id: self.chat_id.clone(),
            text,
            parse_mode: "Markdown".to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SinkError::Delivery(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SinkError::Delivery(format!(
                "Telegram API error: {}",
                error_text
            )));
        }

        Ok(())
    }
}
