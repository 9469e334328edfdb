//! # Printer Module
//!
//! This module owns everything that touches the physical printer.
//!
//! ## Modules
//!
//! - [`config`]: Printer hardware specifications and device settings
//! - [`thermal`]: Protocol driver for the tiny thermal printer
//! - [`session`]: Exclusive, scoped access to the device
//!
//! ## Device Boundary
//!
//! Print jobs only see the [`Printer`] trait. Opening the hardware goes
//! through a [`Connector`], which is what the session manager holds.

pub mod config;
pub mod session;
pub mod thermal;

pub use config::{DeviceSettings, PrinterConfig};
pub use session::{PrinterSessions, SessionState};
pub use thermal::ThermalPrinter;

use image::RgbImage;

use crate::error::LudivinaError;
use crate::protocol::status::PrinterStatus;
use crate::protocol::text::{CodePage, LineStyle};
use crate::transport::SerialTransport;

/// Operations a print job can perform on an open printer.
pub trait Printer {
    /// Wake the printer up.
    fn online(&mut self) -> Result<(), LudivinaError>;

    /// Put the printer to sleep to save power.
    fn offline(&mut self) -> Result<(), LudivinaError>;

    /// Query the paper and health status.
    fn status(&mut self) -> Result<PrinterStatus, LudivinaError>;

    /// Print one line of text.
    fn out(&mut self, line: &str, style: LineStyle, page: CodePage) -> Result<(), LudivinaError>;

    /// Print a bitmap no wider than the print head.
    fn image(&mut self, image: &RgbImage) -> Result<(), LudivinaError>;

    /// Feed `lines` blank lines.
    fn feed(&mut self, lines: u8) -> Result<(), LudivinaError>;

    /// Characters per line.
    fn max_column(&self) -> usize;
}

/// Opens connections to the single installed printer.
pub trait Connector: Send + Sync {
    type Device: Printer;

    /// Whether the device is plugged in.
    fn is_present(&self) -> bool;

    /// Human-readable location of the device, for errors and logs.
    fn location(&self) -> String;

    /// Open a new connection.
    fn connect(&self) -> Result<Self::Device, LudivinaError>;
}

/// Connects to a [`ThermalPrinter`] on a serial port.
#[derive(Debug, Clone)]
pub struct SerialConnector {
    settings: DeviceSettings,
}

impl SerialConnector {
    pub fn new(settings: DeviceSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &DeviceSettings {
        &self.settings
    }
}

impl Connector for SerialConnector {
    type Device = ThermalPrinter<SerialTransport>;

    fn is_present(&self) -> bool {
        self.settings.port.exists()
    }

    fn location(&self) -> String {
        self.settings.port.display().to_string()
    }

    fn connect(&self) -> Result<Self::Device, LudivinaError> {
        let config = self.settings.config;
        let link = SerialTransport::open(&self.settings.port, config.baud_rate)?;
        ThermalPrinter::new(link, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_connector_absent_device() {
        let connector = SerialConnector::new(DeviceSettings::new("/dev/no-such-printer"));
        assert!(!connector.is_present());
        assert_eq!(connector.location(), "/dev/no-such-printer");
    }

    #[test]
    fn test_serial_connector_present_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let connector = SerialConnector::new(DeviceSettings::new(file.path()));
        assert!(connector.is_present());
        // A regular file is not a TTY
        assert!(connector.connect().is_err());
    }
}
