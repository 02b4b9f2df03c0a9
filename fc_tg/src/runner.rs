use std::sync::Arc;

use fc_app::config_loader::BotConfigFile;
use fc_app::config_loader::TOKEN_ENV_VAR;
use fc_app::keep_alive::Shutdown;
use fc_app::keep_alive::spawn_keep_alive;
use fc_calc::FuturesCalculator;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use teloxide::utils::command::BotCommands;

use crate::bot_commands::Command;
use crate::controller::ConversationController;
use crate::error::BotError;
use crate::handlers::handle_message;

/// Build the controller and run the Telegram dispatcher until Ctrl+C.
///
/// Fails with [`BotError::MissingToken`] before touching the network when no
/// token is given.
pub async fn run(config: BotConfigFile, token: Option<String>) -> Result<(), BotError> {
    let token = token.ok_or(BotError::MissingToken)?;

    let calculator = FuturesCalculator::new(config.calculator.clone()).map_err(BotError::Config)?;
    tracing::info!(
        leverage = %config.calculator.leverage,
        taker_fee_bps = %config.calculator.taker_fee_bps,
        "Calculator configured"
    );

    let controller = Arc::new(ConversationController::new(calculator, config.popular_pairs.clone()));

    let bot = Bot::new(token);
    tracing::info!("Telegram bot Initialised");

    if let Err(err) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::warn!("Failed to register bot commands: {err}");
    }

    let shutdown = Shutdown::new();
    let keep_alive = spawn_keep_alive(config.keep_alive_interval(), &shutdown);

    let handler = Update::filter_message().endpoint({
        let controller = controller.clone();
        move |bot: Bot, msg: Message| {
            let controller = controller.clone();
            async move { handle_message(bot, msg, controller).await }
        }
    });

    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .default_handler(|update| async move {
            tracing::debug!("Ignoring unsupported update {:?}", update.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("Error while handling update"))
        .enable_ctrlc_handler()
        .build();

    tracing::info!("Starting Telegram bot dispatcher...");
    if config.drop_pending_updates {
        let listener = Polling::builder(bot).drop_pending_updates().build();
        dispatcher.dispatch_with_listener(listener, LoggingErrorHandler::with_custom_text("Error from the update listener")).await;
    } else {
        dispatcher.dispatch().await;
    }

    shutdown.trigger();
    match keep_alive.await {
        Ok(beats) => tracing::info!(beats, sessions = controller.sessions().len(), "Bot stopped"),
        Err(err) => tracing::warn!("Keep-alive task failed: {err}"),
    }

    Ok(())
}

/// Map the outcome of [`run`] to the process result. A missing token is
/// logged once as an error and ends the process cleanly.
pub fn finish(result: Result<(), BotError>) -> Result<(), BotError> {
    match result {
        Err(BotError::MissingToken) => {
            tracing::error!("❌ {TOKEN_ENV_VAR} not found, bot not started");
            Ok(())
        }
        other => other,
    }
}
