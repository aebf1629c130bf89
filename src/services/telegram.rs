use crate::models::{
    ApiResponse, GetFileRequest, GetUpdatesRequest, InputMediaPhoto, PresentableItem,
    SendMediaGroupRequest, SendMessageRequest, SendPhotoRequest, TelegramFile, Update,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with the Telegram Bot API
///
/// Request URLs embed the bot token, so reqwest errors are stored without
/// their URL.
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("HTTP request failed: {0}")]
    RequestError(reqwest::Error),

    #[error("Telegram API error {code}: {description}")]
    ApiError { code: i64, description: String },

    #[error("File {0} has no download path")]
    MissingFilePath(String),

    #[error("Failed to store download: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for TelegramError {
    fn from(err: reqwest::Error) -> Self {
        TelegramError::RequestError(err.without_url())
    }
}

/// Telegram Bot API client
///
/// Handles all communication with Telegram including:
/// - Long-polling for updates
/// - Downloading photos sent to the bot
/// - Sending text replies and result albums
#[derive(Debug, Clone)]
pub struct TelegramClient {
    base_url: String,
    token: String,
    client: Client,
}

impl TelegramClient {
    /// Create a new Telegram client
    ///
    /// `timeout` must exceed the long-polling timeout or getUpdates calls
    /// will be cut off client-side.
    pub fn new(base_url: String, token: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            token,
            client,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url.trim_end_matches('/'), self.token, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.base_url.trim_end_matches('/'), self.token, file_path)
    }

    /// Call a Bot API method and unwrap its response envelope
    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, TelegramError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await?;

        let envelope: ApiResponse<T> = response.json().await?;

        match envelope {
            ApiResponse { ok: true, result: Some(result), .. } => Ok(result),
            ApiResponse { error_code, description, .. } => Err(TelegramError::ApiError {
                code: error_code.unwrap_or_default(),
                description: description
                    .unwrap_or_else(|| format!("{} returned no result", method)),
            }),
        }
    }

    /// Fetch pending updates, blocking server-side for up to `timeout_secs`
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: timeout_secs,
            allowed_updates: vec!["message".to_string()],
        };

        self.call("getUpdates", &request).await
    }

    /// Resolve a file id to its download path
    pub async fn get_file(&self, file_id: &str) -> Result<TelegramFile, TelegramError> {
        self.call("getFile", &GetFileRequest { file_id }).await
    }

    /// Download a file into `dest_dir` under a fresh unique name
    pub async fn download_file(
        &self,
        file_id: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, TelegramError> {
        let file = self.get_file(file_id).await?;
        let file_path = file
            .file_path
            .ok_or_else(|| TelegramError::MissingFilePath(file.file_id.clone()))?;

        tracing::debug!("Downloading file {} from {}", file_id, file_path);

        let response = self.client.get(self.file_url(&file_path)).send().await?;

        if !response.status().is_success() {
            return Err(TelegramError::ApiError {
                code: i64::from(response.status().as_u16()),
                description: format!("Failed to download {}", file_path),
            });
        }

        let bytes = response.bytes().await?;

        let extension = Path::new(&file_path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("jpg");
        let destination = dest_dir.join(format!("{}.{}", uuid::Uuid::new_v4(), extension));

        tokio::fs::create_dir_all(dest_dir).await?;
        tokio::fs::write(&destination, &bytes).await?;

        tracing::debug!("Stored {} bytes at {}", bytes.len(), destination.display());

        Ok(destination)
    }

    /// Send a plain text message
    pub async fn send_text_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let _: serde_json::Value = self
            .call("sendMessage", &SendMessageRequest { chat_id, text })
            .await?;
        Ok(())
    }

    /// Send result photos as one album
    ///
    /// Telegram rejects media groups with a single entry, so one item goes
    /// out through sendPhoto. No items sends nothing.
    pub async fn send_album(
        &self,
        chat_id: i64,
        items: &[PresentableItem],
    ) -> Result<(), TelegramError> {
        match items {
            [] => Ok(()),
            [item] => {
                let request = SendPhotoRequest {
                    chat_id,
                    photo: &item.image_url,
                    caption: item.caption(),
                };
                let _: serde_json::Value = self.call("sendPhoto", &request).await?;
                Ok(())
            }
            items => {
                let media = items
                    .iter()
                    .map(|item| InputMediaPhoto::new(&item.image_url, item.caption()))
                    .collect();
                let request = SendMediaGroupRequest { chat_id, media };
                let _: serde_json::Value = self.call("sendMediaGroup", &request).await?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TelegramClient {
        TelegramClient::new(
            "https://api.telegram.test/".to_string(),
            "123:abc".to_string(),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_method_url() {
        assert_eq!(
            client().method_url("getUpdates"),
            "https://api.telegram.test/bot123:abc/getUpdates"
        );
    }

    #[test]
    fn test_file_url() {
        assert_eq!(
            client().file_url("photos/file_1.jpg"),
            "https://api.telegram.test/file/bot123:abc/photos/file_1.jpg"
        );
    }

    #[tokio::test]
    async fn test_request_error_hides_token() {
        // Nothing listens on the discard port, the request fails to connect
        let client = TelegramClient::new(
            "http://127.0.0.1:9".to_string(),
            "SECRET_TOKEN_123".to_string(),
            Duration::from_secs(2),
        );

        let err = client.get_file("abc").await.unwrap_err();
        assert!(matches!(err, TelegramError::RequestError(_)));
        assert!(!err.to_string().contains("SECRET_TOKEN_123"), "leaked: {}", err);
        assert!(!format!("{:?}", err).contains("SECRET_TOKEN_123"));

        let err = client
            .download_file("abc", Path::new("/nonexistent"))
            .await
            .unwrap_err();
        assert!(!err.to_string().contains("SECRET_TOKEN_123"), "leaked: {}", err);
    }

    #[tokio::test]
    async fn test_empty_album_sends_nothing() {
        // No server behind the URL, any request would fail
        assert!(client().send_album(1, &[]).await.is_ok());
    }
}
