use crate::bot_handler::{
    BotHandlerResult,
    commands::{Context, parse_cpf_cnpj, parse_months},
};

const USAGE: &str = "Uso: /ativar CPF_CNPJ MESES [PLANO]\n\
    Exemplo: /ativar 12345678901 3\n\
    Exemplo: /ativar 12345678901 12 empresa";

pub async fn handle(ctx: &Context<'_>, args: &str) -> BotHandlerResult<()> {
    let mut parts = args.split_whitespace();
    let (Some(cpf_raw), Some(months_raw)) = (parts.next(), parts.next()) else {
        ctx.handler.messaging_service.send_usage_msg(ctx.message.chat.id, USAGE).await?;
        return Ok(());
    };

    let cpf_cnpj = parse_cpf_cnpj(cpf_raw)?;
    let months = parse_months(months_raw)?;
    let plan = {
        let rest = parts.collect::<Vec<_>>().join(" ");
        (!rest.is_empty()).then_some(rest)
    };

    let license = ctx.handler.license_service.activate(&cpf_cnpj, months, plan).await?;
    ctx.handler.messaging_service.send_activated_msg(ctx.message.chat.id, &license, months).await?;
    Ok(())
}
