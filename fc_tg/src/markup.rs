use teloxide::types::KeyboardButton;
use teloxide::types::KeyboardMarkup;
use teloxide::types::ReplyMarkup;

use crate::menu::Keyboard;

/// Render an SDK-independent keyboard as a Telegram reply keyboard
pub fn reply_markup(keyboard: &Keyboard) -> ReplyMarkup {
    let rows = keyboard.rows().into_iter().map(|row| row.into_iter().map(KeyboardButton::new).collect::<Vec<_>>());

    let mut markup = KeyboardMarkup::new(rows).resize_keyboard();
    if *keyboard == Keyboard::MainMenu {
        markup = markup.persistent();
    }

    ReplyMarkup::Keyboard(markup)
}
