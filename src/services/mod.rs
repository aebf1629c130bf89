// Service exports
pub mod search;
pub mod telegram;

pub use search::{SearchClient, SearchError};
pub use telegram::{TelegramClient, TelegramError};
