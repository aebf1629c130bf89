use crate::core::{decode, format_results, DecodeError};
use crate::models::{Message, PresentableItem};
use crate::services::{SearchClient, SearchError, TelegramClient, TelegramError};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

pub const PROMPT_TEXT: &str = "Send a photo to search";
pub const NO_MATCHES_TEXT: &str = "No matches found";
pub const UNEXPECTED_RESPONSE_TEXT: &str = "Search service returned an unexpected response";

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub telegram: Arc<TelegramClient>,
    pub search: Arc<SearchClient>,
    pub max_items: usize,
    pub download_dir: PathBuf,
    pub keep_downloads: bool,
}

/// Anything that can stop a photo from turning into an album
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Photo download failed: {0}")]
    Download(#[from] TelegramError),

    #[error("Search upload failed: {0}")]
    Search(#[from] SearchError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl PipelineError {
    /// Text shown to the user for this failure
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Decode(DecodeError::UpstreamError(detail)) => {
                format!("Request processing error {:?}", detail)
            }
            PipelineError::Decode(DecodeError::MalformedResponse { .. }) => {
                UNEXPECTED_RESPONSE_TEXT.to_string()
            }
            other => format!("Request processing error {:?}", other.to_string()),
        }
    }
}

/// Reply to any text message with usage instructions
pub async fn handle_text(state: &AppState, message: &Message) {
    if let Err(e) = state.telegram.send_text_message(message.chat.id, PROMPT_TEXT).await {
        tracing::error!("Error while sending message to {}: {}", message.chat.id, e);
    }
}

/// Run a received photo through the search pipeline and reply with the results
pub async fn handle_photo(state: &AppState, message: &Message) {
    let chat_id = message.chat.id;

    let Some(photo) = message.largest_photo() else {
        return;
    };

    tracing::info!(
        "Photo received: chat={}, user={:?}, file_id={}",
        chat_id,
        message.from.as_ref().and_then(|u| u.username.as_deref()),
        photo.file_id
    );

    let reply = match search_photo(state, &photo.file_id).await {
        Ok(items) if items.is_empty() => {
            tracing::info!("No matches for chat {}", chat_id);
            state.telegram.send_text_message(chat_id, NO_MATCHES_TEXT).await
        }
        Ok(items) => {
            tracing::info!("Sending {} matches to chat {}", items.len(), chat_id);
            state.telegram.send_album(chat_id, &items).await
        }
        Err(e) => {
            match &e {
                PipelineError::Decode(DecodeError::UpstreamError(detail)) => {
                    tracing::info!(
                        "Search service rejected photo from chat {}: {}",
                        chat_id,
                        detail
                    );
                }
                other => tracing::error!("Search failed for chat {}: {}", chat_id, other),
            }
            state.telegram.send_text_message(chat_id, &e.user_message()).await
        }
    };

    if let Err(e) = reply {
        tracing::error!("Error while sending reply to {}: {}", chat_id, e);
    }
}

/// Download, upload, decode and format one photo
///
/// The downloaded file is removed afterwards unless `keep_downloads` is set,
/// whether or not the search succeeded.
pub async fn search_photo(
    state: &AppState,
    file_id: &str,
) -> Result<Vec<PresentableItem>, PipelineError> {
    let path = state.telegram.download_file(file_id, &state.download_dir).await?;

    let body = state.search.upload(&path).await;

    if !state.keep_downloads {
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!("Failed to remove {}: {}", path.display(), e);
        }
    }

    let body = body?;

    let records = decode(&body).map_err(|e| {
        if let DecodeError::MalformedResponse { .. } = e {
            let preview: String = String::from_utf8_lossy(&body).chars().take(200).collect();
            tracing::error!("Unexpected search response ({}): {}", e, preview);
        }
        e
    })?;

    tracing::debug!("Decoded {} matches", records.len());

    Ok(format_results(records, state.max_items))
}
