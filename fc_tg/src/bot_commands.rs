use teloxide::utils::command::BotCommands;

/// Commands registered in the Telegram command menu.
///
/// Incoming text is routed by [`crate::menu::Event::classify`]; this enum only
/// feeds `set_my_commands`.
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Futures Calculator Commands:")]
pub enum Command {
    #[command(description = "Show the main menu")]
    Start,

    #[command(description = "Start a new position calculation")]
    New,

    #[command(description = "Show how to use the calculator")]
    Help,

    #[command(description = "Cancel the current entry")]
    Cancel,
}
