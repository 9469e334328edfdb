//! Shared doubles for the integration tests: an in-memory chat service and
//! a recording printer.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use image::RgbImage;
use tokio::sync::oneshot;

use ludivina::bot::UpdateSource;
use ludivina::message::{Content, Inbound, Sender};
use ludivina::printer::{Connector, Printer};
use ludivina::protocol::status::PrinterStatus;
use ludivina::protocol::text::{CodePage, LineStyle};
use ludivina::registry::{MemoryStore, UserId};
use ludivina::telegram::Update;
use ludivina::telegram::types::{Chat, Message, User};
use ludivina::{AuthorizedRegistry, Bot, ChatTransport, LudivinaError, PrinterSessions};

pub const ADMIN: UserId = 1;
pub const FRIEND: UserId = 2;
pub const STRANGER: UserId = 3;

// ============================================================================
// CHAT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub chat_id: i64,
    pub text: String,
    pub html: bool,
}

/// Records outgoing messages, serves photos from memory and hands out
/// queued update batches, one per poll.
#[derive(Default, Clone)]
pub struct MockChat {
    sent: Arc<Mutex<Vec<Sent>>>,
    photos: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    batches: Arc<Mutex<VecDeque<Vec<Update>>>>,
    polls: Arc<Mutex<usize>>,
    on_first_send: Arc<Mutex<Option<oneshot::Sender<()>>>>,
    unreachable: Arc<Mutex<HashSet<i64>>>,
}

impl MockChat {
    pub fn queue_updates(&self, updates: Vec<Update>) {
        self.batches.lock().unwrap().push_back(updates);
    }

    /// Fire `signal` when the bot sends its first message.
    pub fn signal_on_first_send(&self, signal: oneshot::Sender<()>) {
        *self.on_first_send.lock().unwrap() = Some(signal);
    }

    /// Make every message to `chat_id` fail, as if the user blocked the bot.
    pub fn block(&self, chat_id: i64) {
        self.unreachable.lock().unwrap().insert(chat_id);
    }

    pub fn polls(&self) -> usize {
        *self.polls.lock().unwrap()
    }

    pub fn add_photo(&self, file_id: &str, bytes: Vec<u8>) {
        self.photos.lock().unwrap().insert(file_id.to_string(), bytes);
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    /// Plain texts sent to `chat_id`, in order.
    pub fn texts_to(&self, chat_id: i64) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|s| s.chat_id == chat_id && !s.html)
            .map(|s| s.text)
            .collect()
    }

    pub fn html_to(&self, chat_id: i64) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|s| s.chat_id == chat_id && s.html)
            .map(|s| s.text)
            .collect()
    }

    fn push(&self, chat_id: i64, text: &str, html: bool) -> Result<(), LudivinaError> {
        if self.unreachable.lock().unwrap().contains(&chat_id) {
            return Err(LudivinaError::Telegram(format!("Forbidden: bot was blocked by {}", chat_id)));
        }
        if let Some(signal) = self.on_first_send.lock().unwrap().take() {
            let _ = signal.send(());
        }
        self.sent.lock().unwrap().push(Sent {
            chat_id,
            text: text.to_string(),
            html,
        });
        Ok(())
    }
}

#[async_trait]
impl ChatTransport for MockChat {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), LudivinaError> {
        self.push(chat_id, text, false)
    }

    async fn send_html(&self, chat_id: i64, html: &str) -> Result<(), LudivinaError> {
        self.push(chat_id, html, true)
    }

    async fn download_photo(&self, file_id: &str) -> Result<Vec<u8>, LudivinaError> {
        self.photos
            .lock()
            .unwrap()
            .get(file_id)
            .cloned()
            .ok_or_else(|| LudivinaError::Telegram(format!("no such file {}", file_id)))
    }
}

#[async_trait]
impl UpdateSource for MockChat {
    async fn poll_updates(&self, _offset: Option<i64>, _timeout: Duration) -> Result<Vec<Update>, LudivinaError> {
        *self.polls.lock().unwrap() += 1;
        let next = self.batches.lock().unwrap().pop_front();
        match next {
            Some(updates) => Ok(updates),
            // Nothing new: a long poll that never returns
            None => std::future::pending().await,
        }
    }
}

// ============================================================================
// PRINTER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Online,
    Offline,
    Status,
    Line(String, LineStyle),
    Image(u32, u32),
    Feed(u8),
    Close,
}

pub type Events = Arc<Mutex<Vec<Event>>>;

pub struct RecordingPrinter {
    events: Events,
    paper: bool,
}

impl Printer for RecordingPrinter {
    fn online(&mut self) -> Result<(), LudivinaError> {
        self.events.lock().unwrap().push(Event::Online);
        Ok(())
    }

    fn offline(&mut self) -> Result<(), LudivinaError> {
        self.events.lock().unwrap().push(Event::Offline);
        Ok(())
    }

    fn status(&mut self) -> Result<PrinterStatus, LudivinaError> {
        self.events.lock().unwrap().push(Event::Status);
        Ok(PrinterStatus::from_byte(if self.paper { 0x00 } else { 0x04 }))
    }

    fn out(&mut self, line: &str, style: LineStyle, _page: CodePage) -> Result<(), LudivinaError> {
        self.events
            .lock()
            .unwrap()
            .push(Event::Line(line.to_string(), style));
        Ok(())
    }

    fn image(&mut self, image: &RgbImage) -> Result<(), LudivinaError> {
        self.events
            .lock()
            .unwrap()
            .push(Event::Image(image.width(), image.height()));
        Ok(())
    }

    fn feed(&mut self, lines: u8) -> Result<(), LudivinaError> {
        self.events.lock().unwrap().push(Event::Feed(lines));
        Ok(())
    }

    fn max_column(&self) -> usize {
        32
    }
}

impl Drop for RecordingPrinter {
    fn drop(&mut self) {
        self.events.lock().unwrap().push(Event::Close);
    }
}

#[derive(Clone)]
pub struct RecordingConnector {
    pub events: Events,
    pub present: bool,
    pub paper: bool,
}

impl RecordingConnector {
    pub fn new(present: bool, paper: bool) -> Self {
        Self {
            events: Arc::default(),
            present,
            paper,
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl Connector for RecordingConnector {
    type Device = RecordingPrinter;

    fn is_present(&self) -> bool {
        self.present
    }

    fn location(&self) -> String {
        "/dev/test-printer".to_string()
    }

    fn connect(&self) -> Result<RecordingPrinter, LudivinaError> {
        Ok(RecordingPrinter {
            events: self.events.clone(),
            paper: self.paper,
        })
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub struct Harness {
    pub bot: Bot<MockChat, RecordingConnector>,
    pub chat: MockChat,
    pub printer: RecordingConnector,
    pub registry: Arc<AuthorizedRegistry>,
}

impl Harness {
    /// Bot with `FRIEND` authorized and a printer in the given condition.
    pub fn new(present: bool, paper: bool) -> Self {
        let chat = MockChat::default();
        let printer = RecordingConnector::new(present, paper);
        let registry = Arc::new(AuthorizedRegistry::open(ADMIN, MemoryStore::with_ids([ADMIN, FRIEND])).unwrap());
        let sessions = Arc::new(PrinterSessions::new(printer.clone()).with_settle_delay(Duration::ZERO));
        let bot = Bot::new(chat.clone(), registry.clone(), sessions);

        Self {
            bot,
            chat,
            printer,
            registry,
        }
    }

    pub fn ready() -> Self {
        Self::new(true, true)
    }
}

pub fn inbound(from: UserId, content: Content) -> Inbound {
    inbound_at(from, content, Utc::now())
}

pub fn inbound_at(from: UserId, content: Content, date: DateTime<Utc>) -> Inbound {
    Inbound {
        update_id: 100,
        chat_id: from,
        sender: Sender {
            id: from,
            first_name: "Ana".to_string(),
            last_name: Some("Gil".to_string()),
            username: Some("ana".to_string()),
        },
        date,
        content,
    }
}

/// A Bot API text message from `from`, sent now.
pub fn text_update(update_id: i64, from: UserId, body: &str) -> Update {
    Update {
        update_id,
        message: Some(Message {
            message_id: update_id,
            from: Some(User {
                id: from,
                is_bot: false,
                first_name: "Ana".to_string(),
                last_name: Some("Gil".to_string()),
                username: Some("ana".to_string()),
            }),
            chat: Chat { id: from },
            date: Utc::now().timestamp(),
            text: Some(body.to_string()),
            caption: None,
            photo: None,
        }),
    }
}

pub fn text(body: &str) -> Content {
    Content::Text {
        text: body.to_string(),
    }
}

pub fn command(line: &str) -> Content {
    Content::parse(line)
}

/// Signature the bot prints for "Ana" on `date`.
pub fn ana_signature(date: DateTime<Utc>) -> String {
    ludivina::job::signature(Some("Ana"), date.with_timezone(&Local).date_naive())
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, image::Rgb([30, 30, 30]));
    let mut bytes = std::io::Cursor::new(Vec::new());
    img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
    bytes.into_inner()
}
