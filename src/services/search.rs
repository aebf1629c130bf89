use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the face search service
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Failed to read photo: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Search service returned status {0} with an empty body")]
    Status(reqwest::StatusCode),
}

/// Client for the face search endpoint
///
/// Uploads one photo per call as a multipart form and hands back the raw body.
/// Interpreting the body is left to [`crate::core::decode`].
#[derive(Debug, Clone)]
pub struct SearchClient {
    endpoint: String,
    form_field: String,
    client: Client,
}

impl SearchClient {
    /// Create a new search client
    pub fn new(endpoint: String, form_field: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint,
            form_field,
            client,
        }
    }

    /// Upload a local photo and return the unmodified response body
    ///
    /// The service reports most failures in-band with a 200 and a short text
    /// body, so a non-success status is only an error when the body is empty.
    pub async fn upload(&self, path: &Path) -> Result<Vec<u8>, SearchError> {
        let contents = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo.jpg".to_string());

        tracing::debug!(
            "Uploading {} ({} bytes) to {}",
            file_name,
            contents.len(),
            self.endpoint
        );

        let part = Part::bytes(contents).file_name(file_name);
        let form = Form::new().part(self.form_field.clone(), part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?.to_vec();

        if !status.is_success() {
            if body.is_empty() {
                return Err(SearchError::Status(status));
            }
            tracing::warn!("Search service answered {} ({} bytes)", status, body.len());
        } else {
            tracing::debug!("Search service answered {} ({} bytes)", status, body.len());
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_client_creation() {
        let client = SearchClient::new(
            "http://searchface.test/request/".to_string(),
            "upl".to_string(),
            Duration::from_secs(5),
        );

        assert_eq!(client.endpoint, "http://searchface.test/request/");
        assert_eq!(client.form_field, "upl");
    }

    #[tokio::test]
    async fn test_upload_missing_file() {
        let client = SearchClient::new(
            "http://127.0.0.1:9/request/".to_string(),
            "upl".to_string(),
            Duration::from_secs(1),
        );

        let result = client.upload(Path::new("/nonexistent/photo-12345.jpg")).await;
        assert!(matches!(result, Err(SearchError::Io(_))));
    }
}
