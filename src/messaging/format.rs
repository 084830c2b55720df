//! Pure reply formatting. Everything here maps an operation result or
//! error to the display string sent back to the operator, with no side
//! effects, so the texts are unit-testable without a bot.

use chrono::NaiveDate;
use teloxide::utils::html;

use crate::{
    bot_handler::BotHandlerError,
    license::{License, LicenseStatus},
    service::{LicenseServiceError, RenewalOutcome},
    store::StoreError,
};

/// Reply for senders outside the allow-list.
pub const ACCESS_DENIED_TEXT: &str = "🚫 Acesso negado.";

/// Static command reference for /ajuda and unrecognized commands.
pub const HELP_TEXT: &str = "📚 COMANDOS\n\n\
    /ativar 12345678901 3 - Ativa por 3 meses\n\
    /ativar 12345678901 12 empresa - Ativa por 12 meses no plano \"empresa\"\n\
    /renovar 12345678901 1 - Renova +1 mês\n\
    /cancelar 12345678901 - Cancela\n\
    /status 12345678901 - Ver situação\n\
    /listar - Ver todas\n\
    /ajuda - Esta mensagem";

/// Rows shown by /listar before the list is cut off.
const MAX_LIST_ROWS: usize = 15;

/// Welcome message for /start.
pub fn start_text(first_name: &str) -> String {
    format!(
        "Olá, {}! 👋\n\nComandos:\n\
         /ativar CPF_CNPJ MESES [PLANO]\n\
         /renovar CPF_CNPJ MESES\n\
         /cancelar CPF_CNPJ\n\
         /status CPF_CNPJ\n\
         /listar\n\
         /ajuda",
        html::escape(first_name)
    )
}

fn status_emoji(status: LicenseStatus) -> &'static str {
    match status {
        LicenseStatus::Active => "🟢",
        LicenseStatus::Expired => "🔴",
        LicenseStatus::Cancelled => "⚫",
    }
}

fn months_label(months: u32) -> String {
    if months == 1 { "1 mês".to_string() } else { format!("{months} meses") }
}

fn days_remaining_text(expires_at: NaiveDate, today: NaiveDate) -> String {
    let days = (expires_at - today).num_days();
    if days < 0 {
        format!("VENCIDA ({}d)", -days)
    } else if days == 0 {
        "VENCE HOJE".to_string()
    } else {
        format!("Faltam {days}d")
    }
}

/// Confirmation for a successful activation.
pub fn activated_text(license: &License, months: u32) -> String {
    format!(
        "✅ LICENÇA ATIVADA!\n\n\
         📄 CPF/CNPJ: {}\n\
         📦 Plano: {}\n\
         📅 Validade: {} ({})\n\
         🔑 Chave: <code>{}</code>",
        license.cpf_cnpj,
        html::escape(&license.plan),
        license.expires_at,
        months_label(months),
        license.key,
    )
}

/// Confirmation for a renewal or reactivation.
pub fn renewed_text(outcome: &RenewalOutcome, months: u32) -> String {
    let title = if outcome.reactivated { "♻️ LICENÇA REATIVADA!" } else { "✅ LICENÇA RENOVADA!" };
    let mut text = format!(
        "{title}\n\n\
         📄 CPF/CNPJ: {}\n\
         📅 Início: {}\n\
         📅 Validade: {}\n\
         ⏱️ Período: {}",
        outcome.license.cpf_cnpj,
        outcome.base_date,
        outcome.license.expires_at,
        months_label(months),
    );
    if outcome.reactivated {
        text.push_str(&format!("\n🔑 Nova chave: <code>{}</code>", outcome.license.key));
    }
    text
}

/// Confirmation for a cancellation.
pub fn cancelled_text(license: &License) -> String {
    format!(
        "✅ LICENÇA CANCELADA!\n\n\
         📄 CPF/CNPJ: {}\n\
         A chave <code>{}</code> não é mais válida.",
        license.cpf_cnpj, license.key,
    )
}

/// Full record view for /status.
pub fn status_text(license: &License, today: NaiveDate) -> String {
    let status = license.effective_status(today);
    format!(
        "{} STATUS\n\n\
         📄 CPF/CNPJ: {}\n\
         📦 Plano: {}\n\
         📅 Criada em: {}\n\
         📅 Expira: {}\n\
         ⏰ {}\n\
         🔑 <code>{}</code>",
        status_emoji(status),
        license.cpf_cnpj,
        html::escape(&license.plan),
        license.created_at,
        license.expires_at,
        days_remaining_text(license.expires_at, today),
        license.key,
    )
}

/// Summary table for /listar, masked ids, capped at [`MAX_LIST_ROWS`].
pub fn list_text(licenses: &[License], today: NaiveDate) -> String {
    if licenses.is_empty() {
        return "Nenhuma licença cadastrada.".to_string();
    }

    let mut lines = vec!["📋 LICENÇAS\n".to_string()];
    for license in licenses.iter().take(MAX_LIST_ROWS) {
        lines.push(format!(
            "{} {} | {} | {}",
            status_emoji(license.effective_status(today)),
            license.cpf_cnpj.masked(),
            html::escape(&license.plan),
            license.expires_at,
        ));
    }
    if licenses.len() > MAX_LIST_ROWS {
        lines.push(format!("… e mais {}", licenses.len() - MAX_LIST_ROWS));
    }
    lines.push(format!("\nTotal: {}", licenses.len()));
    lines.join("\n")
}

/// Maps every handler error to a distinct, user-readable reply.
pub fn error_text(error: &BotHandlerError) -> String {
    match error {
        BotHandlerError::InvalidInput(msg) => format!("⚠️ {}", html::escape(msg)),
        BotHandlerError::License(LicenseServiceError::AlreadyRegistered(cpf_cnpj)) => format!(
            "⚠️ Já existe licença para {cpf_cnpj}.\nUse /renovar ou /cancelar."
        ),
        BotHandlerError::License(LicenseServiceError::NotFound(cpf_cnpj)) => {
            format!("❌ Licença não encontrada: {cpf_cnpj}")
        }
        BotHandlerError::License(LicenseServiceError::Store(StoreError::Conflict)) => {
            "⚠️ O arquivo de licenças foi alterado por outra edição.\n\
             Nada foi sobrescrito. Repita o comando."
                .to_string()
        }
        BotHandlerError::License(LicenseServiceError::Store(_)) => {
            "❌ Falha ao acessar o repositório de licenças.\n\
             Verifique a conexão e repita o comando."
                .to_string()
        }
        BotHandlerError::Messaging(_) => "❌ Erro ao enviar a resposta.".to_string(),
    }
}
