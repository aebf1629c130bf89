use serde::Serialize;

/// Body of getUpdates
#[derive(Debug, Clone, Serialize)]
pub struct GetUpdatesRequest {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: Vec<String>,
}

/// Body of getFile
#[derive(Debug, Clone, Serialize)]
pub struct GetFileRequest<'a> {
    pub file_id: &'a str,
}

/// Body of sendMessage
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: i64,
    pub text: &'a str,
}

/// Body of sendPhoto, used for single-item albums
#[derive(Debug, Clone, Serialize)]
pub struct SendPhotoRequest<'a> {
    pub chat_id: i64,
    pub photo: &'a str,
    pub caption: String,
}

/// One media entry of a sendMediaGroup call
#[derive(Debug, Clone, Serialize)]
pub struct InputMediaPhoto<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub media: &'a str,
    pub caption: String,
}

impl<'a> InputMediaPhoto<'a> {
    pub fn new(media: &'a str, caption: String) -> Self {
        Self {
            kind: "photo",
            media,
            caption,
        }
    }
}

/// Body of sendMediaGroup
#[derive(Debug, Clone, Serialize)]
pub struct SendMediaGroupRequest<'a> {
    pub chat_id: i64,
    pub media: Vec<InputMediaPhoto<'a>>,
}
