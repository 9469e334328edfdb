//! # Printer Transport Layer
//!
//! This module provides communication backends for talking to the printer.
//!
//! ## Available Transports
//!
//! - [`serial`]: TTY serial port (UART on a Raspberry Pi, USB-serial adapters)
//!
//! The printer driver only needs to send bytes and occasionally read one
//! status byte back, which is what [`Link`] captures.

pub mod serial;

pub use serial::SerialTransport;

use crate::error::LudivinaError;

/// A bidirectional byte link to a printer.
pub trait Link {
    /// Send all of `data`, returning once it has left the host.
    fn send(&mut self, data: &[u8]) -> Result<(), LudivinaError>;

    /// Read one byte, or `None` if nothing arrived before the link's timeout.
    fn receive_byte(&mut self) -> Result<Option<u8>, LudivinaError>;
}
