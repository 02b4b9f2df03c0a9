use fc_calc::CalcError;

/// Errors surfaced by the controller and the bot runner
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("TELEGRAM_BOT_TOKEN not found")]
    MissingToken,

    #[error("Bot configuration rejected: {0}")]
    Config(CalcError),

    #[error("Calculation failed: {0}")]
    Calculation(#[from] CalcError),

    #[error("Session of user {user_id} reached the last step with missing values")]
    IncompleteSession { user_id: u64 },
}
