//! # Bot API Client
//!
//! Thin JSON-over-HTTPS client for the Telegram Bot API. Every method is a
//! `POST https://api.telegram.org/bot<token>/<method>` with a JSON body;
//! files are fetched from `https://api.telegram.org/file/bot<token>/<path>`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use super::types::{ApiResponse, File, GetFile, GetUpdates, SendMessage, Update};
use crate::bot::ChatTransport;
use crate::error::LudivinaError;

/// Public Bot API endpoint
pub const API_URL: &str = "https://api.telegram.org";

/// Only plain messages are requested; photos arrive as messages too.
pub const ALLOWED_UPDATES: &[&str] = &["message"];

/// Extra time on top of the long-poll timeout before a request is abandoned
const REQUEST_GRACE: Duration = Duration::from_secs(10);

/// Timeout for every request that is not a long poll
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Telegram Bot API client.
///
/// The token is a secret; this type intentionally has no `Debug` impl.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    token: String,
    base_url: String,
}

impl Client {
    pub fn new(token: impl Into<String>) -> Result<Self, LudivinaError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("ludivina/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LudivinaError::Telegram(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            http,
            token: token.into(),
            base_url: API_URL.to_string(),
        })
    }

    /// Point the client at another Bot API server (e.g. a local one).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.base_url, self.token, file_path)
    }

    async fn call<B, T>(&self, method: &str, body: &B, timeout: Duration) -> Result<T, LudivinaError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        trace!(method, "bot api call");
        let response: ApiResponse<T> = self
            .http
            .post(self.method_url(method))
            .json(body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| LudivinaError::Telegram(format!("{} failed: {}", method, e.without_url())))?
            .json()
            .await
            .map_err(|e| {
                LudivinaError::Telegram(format!("{} returned an unreadable answer: {}", method, e.without_url()))
            })?;

        match response {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse {
                description,
                error_code,
                ..
            } => Err(LudivinaError::Telegram(format!(
                "{} rejected ({}): {}",
                method,
                error_code.map_or_else(|| "no code".to_string(), |c| c.to_string()),
                description.unwrap_or_else(|| "no description".to_string())
            ))),
        }
    }

    /// Long-poll for new updates.
    ///
    /// `offset` should be one more than the last `update_id` handled; the
    /// server then forgets every earlier update.
    pub async fn get_updates(&self, offset: Option<i64>, timeout: Duration) -> Result<Vec<Update>, LudivinaError> {
        let body = GetUpdates {
            offset,
            timeout: timeout.as_secs(),
            allowed_updates: ALLOWED_UPDATES,
        };
        let updates: Vec<Update> = self.call("getUpdates", &body, timeout + REQUEST_GRACE).await?;
        if !updates.is_empty() {
            debug!(count = updates.len(), ?offset, "received updates");
        }
        Ok(updates)
    }

    /// `sendMessage`, optionally with a `parse_mode` such as `"HTML"`.
    pub async fn post_message(&self, chat_id: i64, text: &str, parse_mode: Option<&str>) -> Result<(), LudivinaError> {
        let body = SendMessage {
            chat_id,
            text,
            parse_mode,
        };
        let _: serde_json::Value = self.call("sendMessage", &body, REQUEST_TIMEOUT).await?;
        Ok(())
    }

    pub async fn get_file(&self, file_id: &str) -> Result<File, LudivinaError> {
        self.call("getFile", &GetFile { file_id }, REQUEST_TIMEOUT).await
    }

    /// Download a file into memory.
    pub async fn download(&self, file: &File) -> Result<Vec<u8>, LudivinaError> {
        let path = file.file_path.as_deref().ok_or_else(|| {
            LudivinaError::Telegram(format!("File {} has no download path", file.file_id))
        })?;

        let response = self
            .http
            .get(self.file_url(path))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| LudivinaError::Telegram(format!("Download failed: {}", e.without_url())))?;

        if !response.status().is_success() {
            return Err(LudivinaError::Telegram(format!(
                "Download returned status {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LudivinaError::Telegram(format!("Download failed: {}", e.without_url())))?;
        debug!(file_id = %file.file_id, size = bytes.len(), "file downloaded");
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ChatTransport for Client {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), LudivinaError> {
        self.post_message(chat_id, text, None).await
    }

    async fn send_html(&self, chat_id: i64, html: &str) -> Result<(), LudivinaError> {
        self.post_message(chat_id, html, Some("HTML")).await
    }

    async fn download_photo(&self, file_id: &str) -> Result<Vec<u8>, LudivinaError> {
        let file = self.get_file(file_id).await?;
        self.download(&file).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_url() {
        let client = Client::new("123:abc").unwrap();
        assert_eq!(
            client.method_url("getUpdates"),
            "https://api.telegram.org/bot123:abc/getUpdates"
        );
    }

    #[test]
    fn test_file_url_with_custom_base() {
        let client = Client::new("123:abc")
            .unwrap()
            .with_base_url("http://localhost:8081/");
        assert_eq!(
            client.file_url("photos/file_0.jpg"),
            "http://localhost:8081/file/bot123:abc/photos/file_0.jpg"
        );
    }

    #[test]
    fn test_get_updates_body() {
        let body = GetUpdates {
            offset: Some(11),
            timeout: 30,
            allowed_updates: ALLOWED_UPDATES,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"offset":11,"timeout":30,"allowed_updates":["message"]}"#
        );
    }

    #[tokio::test]
    async fn test_download_without_path_fails() {
        let client = Client::new("123:abc").unwrap();
        let file = File {
            file_id: "abc".into(),
            file_path: None,
            file_size: None,
        };
        let err = client.download(&file).await.unwrap_err();
        assert!(matches!(err, LudivinaError::Telegram(_)));
    }
}
