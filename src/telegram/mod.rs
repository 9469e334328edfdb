//! # Telegram
//!
//! Long-polling client for the Telegram Bot API.
//!
//! - [`types`]: Wire types and their conversion to [`crate::message::Inbound`]
//! - [`client`]: HTTP client; implements [`crate::bot::ChatTransport`]

pub mod client;
pub mod types;

pub use client::Client;
pub use types::Update;
