//! # Ludivina - Telegram Thermal Printer Bot
//!
//! Ludivina is a Telegram bot that prints the messages and photos it
//! receives on a small serial thermal printer. It provides:
//!
//! - **Access control**: an admin-managed list of users allowed to print
//! - **Print jobs**: wrapped text, photos prepared for the print head, and
//!   a signature with the sender's name and date
//! - **Printer sessions**: exclusive access to the single device, always
//!   released, with clear errors for a missing printer or an empty tray
//! - **Transport**: tiny thermal printer protocol over a serial port
//!
//! ## Quick Start
//!
//! ```no_run
//! use chrono::Utc;
//! use ludivina::{
//!     PrintJob, PrintRequest, PrinterSessions,
//!     printer::{DeviceSettings, SerialConnector},
//! };
//!
//! let sessions = PrinterSessions::new(SerialConnector::new(DeviceSettings::new("/dev/serial0")));
//!
//! let job = PrintJob::prepare(
//!     PrintRequest::Text {
//!         body: "Hola abuela".to_string(),
//!         author: Some("Ana".to_string()),
//!         timestamp: Utc::now(),
//!     },
//!     384,
//! )?;
//! job.print(&sessions)?;
//!
//! # Ok::<(), ludivina::error::LudivinaError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`bot`] | Handlers, failure dispatch and the polling loop |
//! | [`gate`] | Freshness and access guards |
//! | [`registry`] | Authorized user ids and their persistence |
//! | [`job`] | Print job composition |
//! | [`render`] | Text wrapping, photo preparation, dithering |
//! | [`printer`] | Device boundary, driver and sessions |
//! | [`protocol`] | Printer command builders |
//! | [`transport`] | Serial link |
//! | [`telegram`] | Bot API client |
//! | [`message`] | Transport-independent inbound messages |
//! | [`error`] | Error types |
//!
//! ## Supported Printers
//!
//! Tested with the 58 mm "tiny thermal printer" (384 dots, 32 columns,
//! 9600 baud) on a Raspberry Pi UART. Other printers of the same family
//! should work with an adjusted [`printer::PrinterConfig`].

pub mod bot;
pub mod error;
pub mod gate;
pub mod job;
pub mod message;
pub mod printer;
pub mod protocol;
pub mod registry;
pub mod render;
pub mod telegram;
pub mod transport;

// Re-exports for convenience
pub use bot::{Bot, ChatTransport};
pub use error::LudivinaError;
pub use job::{PrintJob, PrintRequest};
pub use printer::{PrinterConfig, PrinterSessions};
pub use registry::AuthorizedRegistry;
