use crate::state::FormState;

pub const NEW_ENTRY_BUTTON: &str = "📊 NEW ENTRY";
pub const HELP_BUTTON: &str = "ℹ️ HOW TO USE";
pub const BACK_BUTTON: &str = "🔙 BACK";
pub const CANCEL_KEYWORD: &str = "cancel";
pub const LONG_BUTTON: &str = "🟢 LONG";
pub const SHORT_BUTTON: &str = "🔴 SHORT";

const PAIRS_PER_ROW: usize = 3;

/// What an incoming text message asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<'a> {
    Start,
    NewEntry,
    Help,
    Cancel,
    UnknownCommand(&'a str),
    /// Free text answering the current form step
    Text(&'a str),
}

impl<'a> Event<'a> {
    pub fn classify(text: &'a str) -> Self {
        let text = text.trim();

        if let Some(command) = text.strip_prefix('/') {
            // "/start@my_bot payload" -> "start"
            let name = command.split_whitespace().next().unwrap_or_default();
            let name = name.split('@').next().unwrap_or_default();

            return match name.to_ascii_lowercase().as_str() {
                "start" => Event::Start,
                "new" => Event::NewEntry,
                "help" => Event::Help,
                "cancel" => Event::Cancel,
                _ => Event::UnknownCommand(text),
            };
        }

        match text {
            NEW_ENTRY_BUTTON => Event::NewEntry,
            HELP_BUTTON => Event::Help,
            BACK_BUTTON => Event::Cancel,
            _ if text.eq_ignore_ascii_case(CANCEL_KEYWORD) => Event::Cancel,
            _ => Event::Text(text),
        }
    }
}

/// Reply keyboard attached to an outgoing message, independent of any chat SDK
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// The persistent two-button main menu
    MainMenu,
    /// Quick-pick pair buttons plus back
    Pairs(Vec<String>),
    /// LONG / SHORT plus back
    PositionSide,
    /// Only the back button
    Back,
}

impl Keyboard {
    /// Keyboard shown while waiting for input in `state`
    pub fn for_state(state: FormState, popular_pairs: &[String]) -> Self {
        match state {
            FormState::Idle => Keyboard::MainMenu,
            FormState::SelectPair => Keyboard::Pairs(popular_pairs.to_vec()),
            FormState::SelectPosition => Keyboard::PositionSide,
            FormState::EntryPrice | FormState::StopLoss | FormState::RiskAmount | FormState::TakeProfit => Keyboard::Back,
        }
    }

    /// Button labels row by row
    pub fn rows(&self) -> Vec<Vec<String>> {
        let back = vec![BACK_BUTTON.to_string()];
        match self {
            Keyboard::MainMenu => vec![vec![NEW_ENTRY_BUTTON.to_string(), HELP_BUTTON.to_string()]],
            Keyboard::Pairs(pairs) => pairs.chunks(PAIRS_PER_ROW).map(<[String]>::to_vec).chain(std::iter::once(back)).collect(),
            Keyboard::PositionSide => vec![vec![LONG_BUTTON.to_string(), SHORT_BUTTON.to_string()], back],
            Keyboard::Back => vec![back],
        }
    }
}
