use crate::bot_handler::{BotHandlerResult, commands::Context};

pub async fn handle(ctx: &Context<'_>) -> BotHandlerResult<()> {
    let licenses = ctx.handler.license_service.list().await?;
    ctx.handler.messaging_service.send_list_msg(ctx.message.chat.id, &licenses).await?;
    Ok(())
}
