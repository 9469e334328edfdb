//! # Inbound Messages
//!
//! Transport-independent view of a request from a chat user. The Telegram
//! client converts its wire types into an [`Inbound`]; guards, handlers and
//! the failure report only ever see this form.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::registry::UserId;

/// One request from a chat user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inbound {
    pub update_id: i64,
    pub chat_id: i64,
    pub sender: Sender,
    /// When the message was sent, as reported by the chat service
    pub date: DateTime<Utc>,
    pub content: Content,
}

/// The user who sent an [`Inbound`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sender {
    pub id: UserId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

/// What was sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    /// `/name arg1 arg2 ...`
    Command { name: String, args: Vec<String> },
    /// A plain text message.
    Text { text: String },
    /// A photo; `width` and `height` describe the largest available size.
    Photo {
        file_id: String,
        width: u32,
        height: u32,
        caption: Option<String>,
    },
}

impl Content {
    /// Parse a text message, treating a leading `/` as a command.
    ///
    /// An `@botname` suffix on the command name is stripped, as chat clients
    /// add it in group chats.
    ///
    /// ```
    /// use ludivina::message::Content;
    ///
    /// assert_eq!(
    ///     Content::parse("/add@ludivina_bot 12 34"),
    ///     Content::Command { name: "add".into(), args: vec!["12".into(), "34".into()] }
    /// );
    /// assert_eq!(Content::parse("hola"), Content::Text { text: "hola".into() });
    /// ```
    pub fn parse(text: &str) -> Self {
        let rest = match text.strip_prefix('/') {
            Some(rest) if !rest.starts_with(char::is_whitespace) => rest,
            _ => {
                return Self::Text {
                    text: text.to_string(),
                };
            }
        };

        let mut words = rest.split_whitespace();
        let head = words.next().unwrap_or_default();
        let name = head.split('@').next().unwrap_or_default().to_string();
        if name.is_empty() {
            return Self::Text {
                text: text.to_string(),
            };
        }

        Self::Command {
            name,
            args: words.map(str::to_string).collect(),
        }
    }

    pub fn is_command(&self) -> bool {
        matches!(self, Self::Command { .. })
    }
}

impl Sender {
    /// Text sent to the admin when this user is not yet authorized.
    pub fn unauthorized_notice(&self) -> String {
        format!(
            "El usuario {} {} con id {} ({}) no tiene autorización.",
            self.first_name,
            self.last_name.as_deref().unwrap_or("None"),
            self.id,
            self.username.as_deref().unwrap_or("None"),
        )
    }
}
