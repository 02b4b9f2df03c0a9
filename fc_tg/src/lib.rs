//! # fc_tg
//!
//! Telegram front end for the futures calculator: the transport independent
//! conversation controller plus the teloxide adapter that feeds it.

pub mod bot_commands;
pub mod controller;
pub mod error;
pub mod error_handling;
pub mod handlers;
pub mod markup;
pub mod menu;
pub mod messages;
pub mod runner;
pub mod session;
pub mod state;

pub use bot_commands::Command;
pub use controller::ConversationController;
pub use controller::Reply;
pub use error::BotError;
pub use handlers::handle_message;
pub use menu::Event;
pub use menu::Keyboard;
pub use runner::finish;
pub use runner::run;
pub use session::Session;
pub use session::SessionStore;
pub use state::FormState;
