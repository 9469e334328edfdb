//! # Print Jobs
//!
//! A [`PrintRequest`] is what a user asked for; a [`PrintJob`] is the same
//! request made ready for the device. Preparing a job decodes and transforms
//! any photo up front, so the expensive work never happens while the printer
//! is held.
//!
//! ## Layout
//!
//! ```text
//! ┌────────────────────────────────┐
//! │ BODY: wrapped text (bold, 2×h) │  or the processed photo
//! │ caption, wrapped (bold, 2×h)   │  photos only, when present
//! │ Ana, 18/10/2026 (2×h)          │  signature
//! │                                │
//! │                                │  feed 2
//! └────────────────────────────────┘
//! ```

use chrono::{DateTime, Local, NaiveDate, Utc};
use image::RgbImage;
use tracing::debug;

use crate::error::LudivinaError;
use crate::printer::{Connector, Printer, PrinterSessions};
use crate::protocol::text::{CodePage, LineStyle};
use crate::render::{image as photo, text};

/// Blank lines fed after every job so the paper can be torn off.
pub const TRAILING_FEED: u8 = 2;

/// Something to print, as requested by a user.
#[derive(Debug, Clone, PartialEq)]
pub enum PrintRequest {
    Text {
        body: String,
        author: Option<String>,
        timestamp: DateTime<Utc>,
    },
    Image {
        /// Encoded photo bytes (JPEG, PNG, ...)
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        caption: Option<String>,
        author: Option<String>,
        timestamp: DateTime<Utc>,
    },
}

/// The main content of a job.
#[derive(Debug, Clone)]
pub enum Body {
    Text(String),
    Image(RgbImage),
}

/// A request ready to be sent to the printer.
#[derive(Debug, Clone)]
pub struct PrintJob {
    body: Body,
    caption: Option<String>,
    signature: String,
}

impl PrintJob {
    /// Prepare `request` for a print head `head_width` dots wide.
    ///
    /// ## Errors
    ///
    /// Returns [`LudivinaError::Image`] if a photo cannot be decoded.
    pub fn prepare(request: PrintRequest, head_width: u32) -> Result<Self, LudivinaError> {
        let job = match request {
            PrintRequest::Text {
                body,
                author,
                timestamp,
            } => Self {
                body: Body::Text(body),
                caption: None,
                signature: signature(author.as_deref(), local_date(timestamp)),
            },
            PrintRequest::Image {
                pixels,
                width,
                height,
                caption,
                author,
                timestamp,
            } => {
                let image = photo::prepare(&pixels, width, height, head_width)?;
                debug!(
                    width = image.width(),
                    height = image.height(),
                    "photo prepared"
                );
                Self {
                    body: Body::Image(image),
                    caption,
                    signature: signature(author.as_deref(), local_date(timestamp)),
                }
            }
        };
        Ok(job)
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Emit the job on an already open printer.
    pub fn print_on<P: Printer + ?Sized>(&self, printer: &mut P) -> Result<(), LudivinaError> {
        match &self.body {
            Body::Text(body) => print_text(printer, body)?,
            Body::Image(image) => printer.image(image)?,
        }

        if let Some(caption) = &self.caption {
            print_text(printer, caption)?;
        }

        printer.out(&self.signature, LineStyle::SIGNATURE, CodePage::Iso8859_1)?;
        printer.feed(TRAILING_FEED)
    }

    /// Print the whole job inside one session.
    pub fn print<C: Connector>(&self, sessions: &PrinterSessions<C>) -> Result<(), LudivinaError> {
        sessions.with_printer(|printer| self.print_on(printer))
    }
}

/// Wrapped, bold, double-height text.
fn print_text<P: Printer + ?Sized>(printer: &mut P, body: &str) -> Result<(), LudivinaError> {
    for line in text::wrap(body, printer.max_column()) {
        printer.out(&line, LineStyle::BODY, CodePage::Iso8859_1)?;
    }
    Ok(())
}

/// Calendar date of `timestamp` in the host's time zone.
///
/// The Bot API stamps messages in UTC. The date printed on the paper follows
/// the printer's own clock instead, so a message sent just after local
/// midnight carries the new day even where UTC is still on the previous one.
fn local_date(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.with_timezone(&Local).date_naive()
}

/// `"{author}, DD/MM/YYYY"`, or just the date when there is no author.
///
/// ```
/// use chrono::NaiveDate;
/// use ludivina::job::signature;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
/// assert_eq!(signature(Some("Ana"), date), "Ana, 05/03/2024");
/// assert_eq!(signature(None, date), "05/03/2024");
/// ```
pub fn signature(author: Option<&str>, date: NaiveDate) -> String {
    let date = date.format("%d/%m/%Y");
    match author {
        Some(author) if !author.is_empty() => format!("{}, {}", author, date),
        _ => date.to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
