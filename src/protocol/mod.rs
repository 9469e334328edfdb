//! # Tiny Thermal Printer Protocol
//!
//! This module provides low-level command builders for the ESC/POS subset
//! spoken by small serial thermal printers.
//!
//! ## Module Structure
//!
//! - [`commands`]: Basic printer commands (init, heating, online/offline, feed)
//! - [`graphics`]: Raster bitmap commands
//! - [`text`]: Print modes, code pages and whole lines
//! - [`latin1`]: ISO-8859-1 text encoding
//! - [`status`]: Status byte decoding
//!
//! ## Usage Example
//!
//! ```
//! use ludivina::protocol::{commands, text};
//!
//! let mut data = Vec::new();
//! data.extend(commands::init());
//! data.extend(commands::online());
//! data.extend(text::line("hola", text::LineStyle::BODY, text::CodePage::Iso8859_1));
//! data.extend(commands::feed_lines(2));
//! data.extend(commands::offline());
//!
//! // Send `data` to the printer via transport...
//! ```

pub mod commands;
pub mod graphics;
pub mod latin1;
pub mod status;
pub mod text;
