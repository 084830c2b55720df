pub mod ajuda;
pub mod ativar;
pub mod cancelar;
pub mod listar;
pub mod renovar;
pub mod start;
pub mod status;

use teloxide::types::Message;

use crate::{
    bot_handler::{BotHandler, BotHandlerError, BotHandlerResult},
    license::CpfCnpj,
};

/// Longest license period an operator can grant in one command.
pub const MAX_MONTHS: u32 = 24;

/// Groups the data needed by all command handlers.
pub struct Context<'a> {
    /// The owning handler, for access to its services.
    pub handler: &'a BotHandler,
    /// The incoming message.
    pub message: &'a Message,
}

/// Parses a CPF/CNPJ argument, mapping the failure to an
/// operator-readable validation reply.
fn parse_cpf_cnpj(raw: &str) -> BotHandlerResult<CpfCnpj> {
    raw.parse().map_err(|_| {
        BotHandlerError::InvalidInput("CPF/CNPJ inválido. Use 11 ou 14 dígitos.".to_string())
    })
}

/// Parses and bounds the months argument.
fn parse_months(raw: &str) -> BotHandlerResult<u32> {
    raw.parse::<u32>()
        .ok()
        .filter(|months| (1..=MAX_MONTHS).contains(months))
        .ok_or_else(|| {
            BotHandlerError::InvalidInput(format!(
                "MESES deve ser um número entre 1 e {MAX_MONTHS}."
            ))
        })
}
