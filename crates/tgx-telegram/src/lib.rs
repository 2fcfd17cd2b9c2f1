//! Telegram adapter (teloxide).
//!
//! Implements the `tgx-core` attachment-source and operator-notifier ports
//! over the Telegram Bot API, and routes channel posts into the relay engine.

use async_trait::async_trait;

use teloxide::{net::Download, prelude::*};

use tokio::time::sleep;

pub mod convert;
pub mod router;

pub use teloxide::Bot;

use tgx_core::{
    domain::{AttachmentId, ChannelId},
    errors::Error,
    ports::{AttachmentSource, OperatorNotifier},
    Result,
};

/// Retry once on Telegram flood control, mapping any other failure through `map_err`.
async fn with_retry<T, Fut>(
    mut op: impl FnMut() -> Fut,
    map_err: impl Fn(teloxide::RequestError) -> Error,
) -> Result<T>
where
    Fut: std::future::IntoFuture<Output = std::result::Result<T, teloxide::RequestError>>,
    Fut::IntoFuture: Send,
{
    const MAX_RETRIES: usize = 1;
    let mut attempts = 0usize;
    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(teloxide::RequestError::RetryAfter(d)) if attempts < MAX_RETRIES => {
                attempts += 1;
                tracing::debug!(wait_secs = d.as_secs(), "telegram flood control; retrying");
                sleep(d).await;
            }
            Err(other) => return Err(map_err(other)),
        }
    }
}

/// Reads channel attachments through the bot's file API.
#[derive(Clone)]
pub struct TelegramSource {
    bot: Bot,
}

impl TelegramSource {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl AttachmentSource for TelegramSource {
    async fn fetch_attachment(
        &self,
        channel: &ChannelId,
        attachment: &AttachmentId,
    ) -> Result<Vec<u8>> {
        let file = with_retry(
            || self.bot.get_file(attachment.0.clone()),
            |e| Error::Fetch(format!("telegram get_file failed in {channel}: {e}")),
        )
        .await?;

        let mut buf: Vec<u8> = Vec::new();
        self.bot
            .download_file(&file.path, &mut buf)
            .await
            .map_err(|e| Error::Fetch(format!("telegram download failed in {channel}: {e}")))?;

        Ok(buf)
    }
}

/// Sends plain-text failure notices to one operator chat.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: i64,
}

impl TelegramNotifier {
    pub fn new(bot: Bot, chat_id: i64) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl OperatorNotifier for TelegramNotifier {
    async fn notify_operator(&self, text: &str) -> Result<()> {
        with_retry(
            || {
                self.bot
                    .send_message(teloxide::types::ChatId(self.chat_id), text.to_string())
            },
            |e| Error::Notify(format!("telegram error: {e}")),
        )
        .await?;
        Ok(())
    }
}
