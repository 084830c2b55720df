pub mod commands;
#[cfg(test)]
mod test_helpers;

use std::sync::Arc;

use teloxide::{types::Message, types::UserId, utils::command::BotCommands};
use thiserror::Error;
use tracing::warn;

use crate::{
    messaging::{MessagingError, MessagingService},
    service::{LicenseService, LicenseServiceError},
};

/// The bot's command surface. Command names follow the original
/// operator workflow, in Portuguese.
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Comandos disponíveis:")]
pub enum Command {
    /// Welcome message.
    #[command(description = "mensagem de boas-vindas.")]
    Start,
    /// Command reference.
    #[command(description = "referência de comandos.")]
    Ajuda,
    /// Activate a new license: `/ativar CPF_CNPJ MESES [PLANO]`.
    #[command(description = "ativar CPF_CNPJ MESES [PLANO] - ativa uma nova licença.")]
    Ativar(String),
    /// Renew a license: `/renovar CPF_CNPJ MESES`.
    #[command(description = "renovar CPF_CNPJ MESES - renova uma licença.")]
    Renovar(String),
    /// Cancel a license: `/cancelar CPF_CNPJ`.
    #[command(description = "cancelar CPF_CNPJ - cancela uma licença.")]
    Cancelar(String),
    /// Show one license: `/status CPF_CNPJ`.
    #[command(description = "status CPF_CNPJ - mostra uma licença.")]
    Status(String),
    /// List all licenses.
    #[command(description = "lista todas as licenças.")]
    Listar,
}

/// Errors surfaced while handling a command.
#[derive(Debug, Error)]
pub enum BotHandlerError {
    /// The operator's arguments did not parse or failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A license operation failed.
    #[error(transparent)]
    License(#[from] LicenseServiceError),
    /// A reply could not be delivered.
    #[error("messaging error: {0}")]
    Messaging(#[from] MessagingError),
}

/// Result alias for handler operations.
pub type BotHandlerResult<T> = Result<T, BotHandlerError>;

/// Routes authorized commands to their handlers and converts every
/// command-level error into a user-visible reply.
pub struct BotHandler {
    pub(crate) messaging_service: Arc<dyn MessagingService>,
    pub(crate) license_service: Arc<dyn LicenseService>,
    authorized_user_ids: Vec<UserId>,
}

impl BotHandler {
    /// Creates a new `BotHandler` instance.
    pub fn new(
        messaging_service: Arc<dyn MessagingService>,
        license_service: Arc<dyn LicenseService>,
        authorized_user_ids: Vec<UserId>,
    ) -> Self {
        Self { messaging_service, license_service, authorized_user_ids }
    }

    /// Dispatches the incoming command to the appropriate handler.
    ///
    /// Unauthorized senders get the fixed blocked reply and nothing
    /// else runs. Command-level errors are answered in-chat; only a
    /// failure to send a reply propagates.
    pub async fn handle_commands(&self, msg: &Message, cmd: Command) -> BotHandlerResult<()> {
        if !self.is_authorized(msg) {
            warn!("Blocked command from unauthorized sender in chat {}", msg.chat.id);
            self.messaging_service.send_access_denied_msg(msg.chat.id).await?;
            return Ok(());
        }

        let ctx = commands::Context { handler: self, message: msg };
        let result = match cmd {
            Command::Start => commands::start::handle(&ctx).await,
            Command::Ajuda => commands::ajuda::handle(&ctx).await,
            Command::Ativar(args) => commands::ativar::handle(&ctx, &args).await,
            Command::Renovar(args) => commands::renovar::handle(&ctx, &args).await,
            Command::Cancelar(args) => commands::cancelar::handle(&ctx, &args).await,
            Command::Status(args) => commands::status::handle(&ctx, &args).await,
            Command::Listar => commands::listar::handle(&ctx).await,
        };

        match result {
            Ok(()) => Ok(()),
            Err(BotHandlerError::Messaging(e)) => Err(BotHandlerError::Messaging(e)),
            Err(error) => {
                self.messaging_service.send_error_msg(msg.chat.id, &error).await?;
                Ok(())
            }
        }
    }

    /// Answers a message that looks like a command but did not parse
    /// as one with the command reference.
    pub async fn handle_unknown_command(&self, msg: &Message) -> BotHandlerResult<()> {
        if !self.is_authorized(msg) {
            self.messaging_service.send_access_denied_msg(msg.chat.id).await?;
            return Ok(());
        }
        self.messaging_service.send_help_msg(msg.chat.id).await?;
        Ok(())
    }

    /// A sender is authorized only when present and on the allow-list.
    fn is_authorized(&self, msg: &Message) -> bool {
        msg.from.as_ref().is_some_and(|user| self.authorized_user_ids.contains(&user.id))
    }
}
