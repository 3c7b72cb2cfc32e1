pub mod alert;
pub mod chat;
pub mod deck;
pub mod home;
pub mod screen;
pub mod session;

#[cfg(test)]
mod testing;

pub use alert::{alert_channel, Alert, AlertBridge, AlertQueue};
pub use chat::AiChat;
pub use deck::{Face, FlashcardDeck};
pub use home::{HomeScreen, InputMode};
pub use screen::ScreenScope;
pub use session::SessionManager;
