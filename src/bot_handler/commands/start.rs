use crate::bot_handler::{BotHandlerResult, commands::Context};

pub async fn handle(ctx: &Context<'_>) -> BotHandlerResult<()> {
    let first_name =
        ctx.message.from.as_ref().map(|user| user.first_name.as_str()).unwrap_or("operador");
    ctx.handler.messaging_service.send_start_msg(ctx.message.chat.id, first_name).await?;
    Ok(())
}
