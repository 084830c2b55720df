use crate::bot_handler::{
    BotHandlerResult,
    commands::{Context, parse_cpf_cnpj, parse_months},
};

const USAGE: &str = "Uso: /renovar CPF_CNPJ MESES\n\
    Exemplo: /renovar 12345678901 1";

pub async fn handle(ctx: &Context<'_>, args: &str) -> BotHandlerResult<()> {
    let mut parts = args.split_whitespace();
    let (Some(cpf_raw), Some(months_raw)) = (parts.next(), parts.next()) else {
        ctx.handler.messaging_service.send_usage_msg(ctx.message.chat.id, USAGE).await?;
        return Ok(());
    };

    let cpf_cnpj = parse_cpf_cnpj(cpf_raw)?;
    let months = parse_months(months_raw)?;

    let outcome = ctx.handler.license_service.renew(&cpf_cnpj, months).await?;
    ctx.handler.messaging_service.send_renewed_msg(ctx.message.chat.id, &outcome, months).await?;
    Ok(())
}
