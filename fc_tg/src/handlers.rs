use std::sync::Arc;

use fc_calc::PositionCalculator;
use teloxide::prelude::*;

use crate::controller::ConversationController;
use crate::error_handling::report_failure;
use crate::error_handling::send_reply;

/// Handle one incoming Telegram message
pub async fn handle_message<C>(bot: Bot, msg: Message, controller: Arc<ConversationController<C>>) -> ResponseResult<()>
where
    C: PositionCalculator,
{
    let chat_id = msg.chat.id;

    // Channel posts and service messages have no sender
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let user_id = user.id.0;

    let Some(text) = msg.text() else {
        tracing::debug!(user_id, "Ignoring non-text message");
        return send_reply(&bot, chat_id, controller.on_unsupported(user_id)).await;
    };

    match controller.handle(user_id, text) {
        Ok(reply) => send_reply(&bot, chat_id, reply).await,
        Err(err) => report_failure(&bot, chat_id, user_id, &err).await,
    }
}
