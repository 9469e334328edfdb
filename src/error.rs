//! # Error Types
//!
//! This module defines the error type used throughout the ludivina crate.
//!
//! Every failure is classified into one of four [`ErrorKind`]s. The bot maps
//! the kind to what the requester and the admin get to see:
//!
//! | Kind | Requester | Admin |
//! |------|-----------|-------|
//! | `NoPrinterFound` | short message | nothing |
//! | `NoPaperLeft` | short message | nothing |
//! | `ExternalCommandFailure` | error text | nothing |
//! | `Unhandled` | apology | request + error chain |

use thiserror::Error;

/// Main error type for ludivina operations
#[derive(Debug, Error)]
pub enum LudivinaError {
    /// The printer device path does not exist; no session was opened
    #[error("No printer found at {0}")]
    NoPrinterFound(String),

    /// The printer reported an empty paper tray
    #[error("No paper left")]
    NoPaperLeft,

    /// An admin `/exec` command exited non-zero, timed out or could not start
    #[error("External command failed: {0}")]
    ExternalCommand(String),

    /// Transport-level errors (serial connection, I/O on the device)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Image decoding or processing error
    #[error("Image error: {0}")]
    Image(String),

    /// Telegram Bot API error
    #[error("Telegram error: {0}")]
    Telegram(String),

    /// Authorized registry persistence error
    #[error("Registry error: {0}")]
    Registry(String),

    /// A command argument could not be parsed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A blocking task panicked or was cancelled
    #[error("Task error: {0}")]
    Task(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error wrapper
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of a [`LudivinaError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NoPrinterFound,
    NoPaperLeft,
    ExternalCommandFailure,
    Unhandled,
}

impl LudivinaError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoPrinterFound(_) => ErrorKind::NoPrinterFound,
            Self::NoPaperLeft => ErrorKind::NoPaperLeft,
            Self::ExternalCommand(_) => ErrorKind::ExternalCommandFailure,
            _ => ErrorKind::Unhandled,
        }
    }

    /// Render the error and its `source()` chain, one cause per line.
    pub fn chain(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            out.push_str("\ncaused by: ");
            out.push_str(&cause.to_string());
            source = cause.source();
        }
        out
    }
}

impl From<image::ImageError> for LudivinaError {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e.to_string())
    }
}

impl From<tokio::task::JoinError> for LudivinaError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Task(e.to_string())
    }
}
