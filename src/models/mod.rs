// Model exports
pub mod domain;
pub mod requests;
pub mod telegram;

pub use domain::{MatchRecord, PresentableItem};
pub use requests::{
    GetFileRequest, GetUpdatesRequest, InputMediaPhoto, SendMediaGroupRequest, SendMessageRequest,
    SendPhotoRequest,
};
pub use telegram::{ApiResponse, Chat, Message, PhotoSize, TelegramFile, Update, User};
