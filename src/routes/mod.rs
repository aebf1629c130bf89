// Route exports
pub mod photos;

pub use photos::{handle_photo, handle_text, search_photo, AppState, PipelineError};

use crate::models::Update;

/// Route one update to its handler
///
/// Photos go through the search pipeline, text gets the usage prompt and
/// everything else is ignored.
pub async fn dispatch(state: &AppState, update: Update) {
    let Some(message) = update.message else {
        tracing::trace!("Ignoring update {} without message", update.update_id);
        return;
    };

    if message.photo.as_ref().is_some_and(|p| !p.is_empty()) {
        photos::handle_photo(state, &message).await;
    } else if message.text.is_some() {
        photos::handle_text(state, &message).await;
    } else {
        tracing::trace!("Ignoring message {} in chat {}", message.message_id, message.chat.id);
    }
}
