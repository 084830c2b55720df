use crate::bot_handler::{
    BotHandlerResult,
    commands::{Context, parse_cpf_cnpj},
};

const USAGE: &str = "Uso: /cancelar CPF_CNPJ\n\
    Exemplo: /cancelar 12345678901";

pub async fn handle(ctx: &Context<'_>, args: &str) -> BotHandlerResult<()> {
    let Some(cpf_raw) = args.split_whitespace().next() else {
        ctx.handler.messaging_service.send_usage_msg(ctx.message.chat.id, USAGE).await?;
        return Ok(());
    };

    let cpf_cnpj = parse_cpf_cnpj(cpf_raw)?;
    let license = ctx.handler.license_service.cancel(&cpf_cnpj).await?;
    ctx.handler.messaging_service.send_cancelled_msg(ctx.message.chat.id, &license).await?;
    Ok(())
}
