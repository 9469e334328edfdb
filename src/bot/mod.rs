//! # Bot
//!
//! Turns inbound chat messages into print jobs and admin actions.
//!
//! ## Handlers
//!
//! | Message | Who | Action |
//! |---------|-----|--------|
//! | `/start` | anyone | Greeting |
//! | `/exec <cmd> [args]` | admin | Run a command on the device, reply with its output |
//! | `/add <id> ...` | admin | Authorize users |
//! | `/remove <id> ...` | admin | Deauthorize users |
//! | text | authorized | Print the text and a signature |
//! | photo | authorized | Print the photo, its caption and a signature |
//!
//! Unknown commands are ignored.
//!
//! ## Conversation
//!
//! ```text
//! user: hola abuela
//! bot:  Recibido          (request passed the guards)
//!       ... printing ...
//! bot:  OK                (only if everything worked)
//! ```
//!
//! Failures never escape a handler: [`Bot::handle`] hands them to a single
//! dispatch that picks the reply for the requester and decides whether the
//! admin hears about it (see [`report`]).

mod commands;
pub mod polling;
pub mod report;

pub use polling::UpdateSource;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::LudivinaError;
use crate::gate::{Audience, Denial, Pipeline, Verdict};
use crate::job::{PrintJob, PrintRequest};
use crate::message::{Content, Inbound};
use crate::printer::{Connector, PrinterSessions};
use crate::registry::AuthorizedRegistry;

// ============================================================================
// REPLIES
// ============================================================================

/// Sent once a request passed the guards
pub const RECEIVED: &str = "Recibido";

/// Sent once a request finished without errors
pub const DONE: &str = "OK";

/// Outgoing side of the chat service.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a plain text message.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), LudivinaError>;

    /// Send a message formatted as HTML.
    async fn send_html(&self, chat_id: i64, html: &str) -> Result<(), LudivinaError>;

    /// Fetch the bytes of a photo.
    async fn download_photo(&self, file_id: &str) -> Result<Vec<u8>, LudivinaError>;
}

/// Tunables for the bot.
#[derive(Debug, Clone, Copy)]
pub struct BotSettings {
    /// Print head width in dots; photos are scaled to it
    pub head_width: u32,
    /// Hard limit for `/exec`
    pub exec_timeout: Duration,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            head_width: crate::printer::PrinterConfig::TINY_THERMAL.width_dots as u32,
            exec_timeout: Duration::from_secs(30),
        }
    }
}

/// What a guarded request will do once it is let through.
enum Action<'a> {
    Exec(&'a [String]),
    Add(&'a [String]),
    Remove(&'a [String]),
    PrintText(&'a str),
    PrintPhoto {
        file_id: &'a str,
        width: u32,
        height: u32,
        caption: Option<&'a str>,
    },
}

impl Action<'_> {
    fn audience(&self) -> Audience {
        match self {
            Self::Exec(_) | Self::Add(_) | Self::Remove(_) => Audience::Admin,
            Self::PrintText(_) | Self::PrintPhoto { .. } => Audience::Authorized,
        }
    }
}

/// The chat bot.
pub struct Bot<T: ChatTransport, C: Connector + 'static> {
    transport: T,
    registry: Arc<AuthorizedRegistry>,
    pipeline: Pipeline,
    sessions: Arc<PrinterSessions<C>>,
    settings: BotSettings,
}

impl<T: ChatTransport, C: Connector + 'static> Bot<T, C> {
    pub fn new(transport: T, registry: Arc<AuthorizedRegistry>, sessions: Arc<PrinterSessions<C>>) -> Self {
        Self {
            transport,
            pipeline: Pipeline::standard(registry.clone()),
            registry,
            sessions,
            settings: BotSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: BotSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn registry(&self) -> &AuthorizedRegistry {
        &self.registry
    }

    /// Handle one inbound message. Never fails: errors are dispatched to the
    /// requester and, when unexpected, to the admin.
    pub async fn handle(&self, inbound: &Inbound) {
        if let Err(e) = self.route(inbound).await {
            self.dispatch_failure(inbound, e).await;
        }
    }

    async fn route(&self, inbound: &Inbound) -> Result<(), LudivinaError> {
        let action = match &inbound.content {
            Content::Command { name, args } => match name.as_str() {
                "start" => return self.start(inbound).await,
                "exec" => Action::Exec(args),
                "add" => Action::Add(args),
                "remove" => Action::Remove(args),
                other => {
                    debug!(command = other, "ignoring unknown command");
                    return Ok(());
                }
            },
            Content::Text { text } => Action::PrintText(text),
            Content::Photo {
                file_id,
                width,
                height,
                caption,
            } => Action::PrintPhoto {
                file_id,
                width: *width,
                height: *height,
                caption: caption.as_deref(),
            },
        };

        match self.pipeline.evaluate(inbound, action.audience()) {
            Verdict::Continue => {}
            Verdict::Drop => return Ok(()),
            Verdict::Deny(denial) => return self.deny(inbound, denial).await,
        }

        self.reply(inbound, RECEIVED).await?;
        self.perform(inbound, action).await?;
        self.reply(inbound, DONE).await
    }

    async fn perform(&self, inbound: &Inbound, action: Action<'_>) -> Result<(), LudivinaError> {
        match action {
            Action::Exec(args) => self.exec(inbound, args).await,
            Action::Add(args) => self.add(inbound, args).await,
            Action::Remove(args) => self.remove(inbound, args).await,
            Action::PrintText(text) => {
                let request = PrintRequest::Text {
                    body: text.to_string(),
                    author: Some(inbound.sender.first_name.clone()),
                    timestamp: inbound.date,
                };
                self.print(request).await
            }
            Action::PrintPhoto {
                file_id,
                width,
                height,
                caption,
            } => {
                let pixels = self.transport.download_photo(file_id).await?;
                let request = PrintRequest::Image {
                    pixels,
                    width,
                    height,
                    caption: caption.map(str::to_string),
                    author: Some(inbound.sender.first_name.clone()),
                    timestamp: inbound.date,
                };
                self.print(request).await
            }
        }
    }

    /// Prepare and print a job on the blocking pool.
    async fn print(&self, request: PrintRequest) -> Result<(), LudivinaError> {
        let sessions = self.sessions.clone();
        let head_width = self.settings.head_width;

        tokio::task::spawn_blocking(move || {
            let job = PrintJob::prepare(request, head_width)?;
            job.print(&sessions)?;
            info!("job printed");
            Ok::<_, LudivinaError>(())
        })
        .await?
    }

    async fn deny(&self, inbound: &Inbound, denial: Denial) -> Result<(), LudivinaError> {
        let sender = &inbound.sender;
        match denial {
            Denial::NotAdmin => {
                let text = format!("{}, no tienes permisos de administración.", sender.first_name);
                self.reply(inbound, &text).await
            }
            Denial::Unregistered => {
                let text = format!("{}, todavía no tienes permiso.", sender.first_name);
                let replied = self.reply(inbound, &text).await;
                let notified = self
                    .transport
                    .send_message(self.registry.admin(), &sender.unauthorized_notice())
                    .await;
                replied.and(notified)
            }
        }
    }

    async fn reply(&self, inbound: &Inbound, text: &str) -> Result<(), LudivinaError> {
        self.transport.send_message(inbound.chat_id, text).await
    }
}
