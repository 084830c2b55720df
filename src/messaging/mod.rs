pub mod format;
#[cfg(test)]
mod tests;

use async_trait::async_trait;
use chrono::Utc;
use mockall::automock;
use teloxide::{
    prelude::*,
    types::{ChatId, ParseMode},
};
use thiserror::Error;

use crate::{bot_handler::BotHandlerError, license::License, service::RenewalOutcome};

/// Errors from the messaging channel.
#[derive(Debug, Error)]
pub enum MessagingError {
    /// The Telegram API request failed.
    #[error("Teloxide API request failed: {0}")]
    TeloxideRequest(#[from] teloxide::RequestError),
}

type Result<T> = std::result::Result<T, MessagingError>;

/// Trait for sending replies to the operator.
#[automock]
#[async_trait]
pub trait MessagingService: Send + Sync {
    /// Sends the fixed blocked-sender reply.
    async fn send_access_denied_msg(&self, chat_id: ChatId) -> Result<()>;

    /// Sends the welcome message.
    async fn send_start_msg(&self, chat_id: ChatId, first_name: &str) -> Result<()>;

    /// Sends the static command reference.
    async fn send_help_msg(&self, chat_id: ChatId) -> Result<()>;

    /// Sends a usage line for a malformed command.
    async fn send_usage_msg(&self, chat_id: ChatId, usage: &str) -> Result<()>;

    /// Confirms an activation with the new key and expiry.
    async fn send_activated_msg(
        &self,
        chat_id: ChatId,
        license: &License,
        months: u32,
    ) -> Result<()>;

    /// Confirms a renewal with the new expiry.
    async fn send_renewed_msg(
        &self,
        chat_id: ChatId,
        outcome: &RenewalOutcome,
        months: u32,
    ) -> Result<()>;

    /// Confirms a cancellation.
    async fn send_cancelled_msg(&self, chat_id: ChatId, license: &License) -> Result<()>;

    /// Sends the full record view.
    async fn send_status_msg(&self, chat_id: ChatId, license: &License) -> Result<()>;

    /// Sends the list of all records.
    async fn send_list_msg(&self, chat_id: ChatId, licenses: &[License]) -> Result<()>;

    /// Sends the reply for a handler error.
    async fn send_error_msg(&self, chat_id: ChatId, error: &BotHandlerError) -> Result<()>;
}

/// Telegram messaging service.
pub struct TelegramMessagingService {
    bot: Bot,
}

impl TelegramMessagingService {
    /// Creates a new `TelegramMessagingService`.
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    async fn send_text(&self, chat_id: ChatId, text: String) -> Result<()> {
        self.bot
            .send_message(chat_id, text)
            .parse_mode(ParseMode::Html)
            .await
            .map(|_| ())
            .map_err(MessagingError::TeloxideRequest)
    }
}

#[async_trait]
impl MessagingService for TelegramMessagingService {
    async fn send_access_denied_msg(&self, chat_id: ChatId) -> Result<()> {
        self.send_text(chat_id, format::ACCESS_DENIED_TEXT.to_string()).await
    }

    async fn send_start_msg(&self, chat_id: ChatId, first_name: &str) -> Result<()> {
        self.send_text(chat_id, format::start_text(first_name)).await
    }

    async fn send_help_msg(&self, chat_id: ChatId) -> Result<()> {
        self.send_text(chat_id, format::HELP_TEXT.to_string()).await
    }

    async fn send_usage_msg(&self, chat_id: ChatId, usage: &str) -> Result<()> {
        self.send_text(chat_id, usage.to_string()).await
    }

    async fn send_activated_msg(
        &self,
        chat_id: ChatId,
        license: &License,
        months: u32,
    ) -> Result<()> {
        self.send_text(chat_id, format::activated_text(license, months)).await
    }

    async fn send_renewed_msg(
        &self,
        chat_id: ChatId,
        outcome: &RenewalOutcome,
        months: u32,
    ) -> Result<()> {
        self.send_text(chat_id, format::renewed_text(outcome, months)).await
    }

    async fn send_cancelled_msg(&self, chat_id: ChatId, license: &License) -> Result<()> {
        self.send_text(chat_id, format::cancelled_text(license)).await
    }

    async fn send_status_msg(&self, chat_id: ChatId, license: &License) -> Result<()> {
        let today = Utc::now().date_naive();
        self.send_text(chat_id, format::status_text(license, today)).await
    }

    async fn send_list_msg(&self, chat_id: ChatId, licenses: &[License]) -> Result<()> {
        let today = Utc::now().date_naive();
        self.send_text(chat_id, format::list_text(licenses, today)).await
    }

    async fn send_error_msg(&self, chat_id: ChatId, error: &BotHandlerError) -> Result<()> {
        self.send_text(chat_id, format::error_text(error)).await
    }
}
