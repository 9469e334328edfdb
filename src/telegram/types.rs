//! # Bot API Types
//!
//! The subset of the Telegram Bot API objects the bot reads. Unknown fields
//! are ignored by serde, so new API versions do not break decoding.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::message::{Content, Inbound, Sender};

/// Envelope around every Bot API answer.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    /// Unix time
    pub date: i64,
    pub text: Option<String>,
    pub caption: Option<String>,
    /// Available sizes of a photo, smallest first
    pub photo: Option<Vec<PhotoSize>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    pub width: u32,
    pub height: u32,
    pub file_size: Option<u64>,
}

/// A file ready to be downloaded.
#[derive(Debug, Clone, Deserialize)]
pub struct File {
    pub file_id: String,
    /// Path to use with the file download endpoint
    pub file_path: Option<String>,
    pub file_size: Option<u64>,
}

/// Body of `sendMessage`.
#[derive(Debug, Serialize)]
pub struct SendMessage<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'a str>,
}

/// Body of `getUpdates`.
#[derive(Debug, Serialize)]
pub struct GetUpdates<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    pub timeout: u64,
    pub allowed_updates: &'a [&'a str],
}

/// Body of `getFile`.
#[derive(Debug, Serialize)]
pub struct GetFile<'a> {
    pub file_id: &'a str,
}

impl Update {
    /// Convert to the transport-independent form.
    ///
    /// Returns `None` for updates the bot does not handle: anything that is
    /// not a message, messages without a sender, and messages with neither
    /// text nor a photo.
    pub fn into_inbound(self) -> Option<Inbound> {
        let message = self.message?;
        let from = message.from?;
        let date = DateTime::from_timestamp(message.date, 0)?;

        let content = if let Some(text) = message.text {
            Content::parse(&text)
        } else {
            // The last size is the largest
            let best = message.photo?.pop()?;
            Content::Photo {
                file_id: best.file_id,
                width: best.width,
                height: best.height,
                caption: message.caption,
            }
        };

        Some(Inbound {
            update_id: self.update_id,
            chat_id: message.chat.id,
            sender: Sender {
                id: from.id,
                first_name: from.first_name,
                last_name: from.last_name,
                username: from.username,
            },
            date,
            content,
        })
    }
}
