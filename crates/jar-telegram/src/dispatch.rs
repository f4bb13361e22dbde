//! Outbound message dispatch.
//!
//! The [`Messenger`] trait is the seam between the delivery pipeline and
//! the messaging API, so the pipeline can be exercised against a stub in
//! tests. The real implementation wraps a [`teloxide::Bot`]. There is no
//! deduplication: every call issues an independent API call.

use async_trait::async_trait;
use teloxide::prelude::*;
use tracing::debug;

use crate::error::{BotError, Result};

/// Sends final message text to a chat.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Sends `text` to `chat_id`. Fails with [`BotError::Delivery`] when
    /// the messaging API rejects the call.
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()>;
}

/// Messenger backed by the Telegram bot API.
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    /// Wraps a bot handle.
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .await
            .map_err(|e| BotError::Delivery(e.to_string()))?;
        debug!(chat_id = %chat_id, chars = text.len(), "message sent");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Stub messengers shared by the crate's unit tests.

    use std::sync::Mutex;

    use super::*;

    /// Records every send instead of calling the network.
    #[derive(Default)]
    pub struct RecordingMessenger {
        pub sent: Mutex<Vec<(i64, String)>>,
    }

    #[async_trait]
    impl Messenger for RecordingMessenger {
        async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
            self.sent
                .lock()
                .unwrap()
                .push((chat_id, text.to_string()));
            Ok(())
        }
    }

    /// Rejects every send, like a revoked token or blocked user.
    pub struct FailingMessenger;

    #[async_trait]
    impl Messenger for FailingMessenger {
        async fn send_text(&self, _chat_id: i64, _text: &str) -> Result<()> {
            Err(BotError::Delivery("messaging API rejected the call".to_string()))
        }
    }
}
