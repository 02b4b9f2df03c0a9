use teloxide::ApiError;
use teloxide::RequestError;
use teloxide::prelude::*;
use teloxide::types::ChatId;

use crate::controller::Reply;
use crate::error::BotError;
use crate::markup::reply_markup;

/// Send a reply; users who blocked the bot or were deactivated are skipped
pub async fn send_reply(bot: &Bot, chat_id: ChatId, reply: Reply) -> Result<(), RequestError> {
    match bot.send_message(chat_id, reply.text).reply_markup(reply_markup(&reply.keyboard)).await {
        Ok(_) => Ok(()),
        Err(RequestError::Api(ApiError::BotBlocked)) => {
            tracing::warn!("Bot was blocked by user {chat_id}");
            Ok(())
        }
        Err(RequestError::Api(ApiError::UserDeactivated)) => {
            tracing::warn!("User {chat_id} is deactivated");
            Ok(())
        }
        Err(err) => {
            tracing::error!("Failed to send reply to {chat_id}: {err}");
            Err(err)
        }
    }
}

/// Log a handler failure and tell the user something went wrong
pub async fn report_failure(bot: &Bot, chat_id: ChatId, user_id: u64, err: &BotError) -> Result<(), RequestError> {
    tracing::error!(user_id, "Failed to handle message: {err}");
    send_reply(bot, chat_id, Reply::failure()).await
}
