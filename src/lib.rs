#![warn(missing_docs)]
//! A Telegram bot for managing software license keys.
//!
//! A single authorized operator issues, renews, cancels, and queries
//! licenses; the license list lives as a JSON file in a GitHub
//! repository, updated through the contents API with an optimistic
//! revision check on every write.

/// The main handler for the bot's commands.
pub mod bot_handler;
/// The configuration for the application.
pub mod config;
/// The dispatcher for routing updates to the correct handlers.
pub mod dispatcher;
/// The license record, key generation, and date arithmetic.
pub mod license;
/// The service for sending replies to the operator.
pub mod messaging;
/// The license operations on top of the store.
pub mod service;
/// The persistence layer for the license document.
pub mod store;

use std::sync::Arc;

use teloxide::prelude::*;

use crate::{
    bot_handler::BotHandler, config::Config, dispatcher::BotDispatcher,
    messaging::TelegramMessagingService, service::DefaultLicenseService, store::github::GithubStore,
};

/// Runs the bot.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let bot = Bot::new(config.telegram_bot_token.clone());

    let store = Arc::new(GithubStore::new(
        &config.github_token,
        &config.github_api_url,
        &config.github_owner,
        &config.github_repo,
        &config.license_file_path,
    )?);
    let license_service = Arc::new(DefaultLicenseService::new(store));
    let messaging_service = Arc::new(TelegramMessagingService::new(bot.clone()));

    let handler = Arc::new(BotHandler::new(
        messaging_service,
        license_service,
        config.authorized_user_ids.clone(),
    ));

    tracing::info!(
        "Starting license bot for {}/{} ({} authorized operator(s))",
        config.github_owner,
        config.github_repo,
        config.authorized_user_ids.len()
    );

    let mut dispatcher = BotDispatcher::new(handler).build(bot);
    tracing::debug!("Dispatcher built successfully.");

    dispatcher.dispatch().await;

    Ok(())
}
