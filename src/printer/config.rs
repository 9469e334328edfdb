//! # Printer Configuration
//!
//! This module defines the hardware specification of the serial thermal
//! printer and the per-installation device settings.
//!
//! ## Supported Printers
//!
//! | Model | Width (dots) | Columns | Baud rate |
//! |-------|--------------|---------|-----------|
//! | Tiny thermal printer (58mm) | 384 | 32 | 9600 |
//!
//! ## Usage
//!
//! ```
//! use ludivina::printer::{DeviceSettings, PrinterConfig};
//!
//! let settings = DeviceSettings::new("/dev/serial0");
//! assert_eq!(settings.config.width_dots, 384);
//! assert_eq!(settings.config.max_column, 32);
//! ```

use std::path::PathBuf;

/// Default serial device path (Raspberry Pi primary UART)
pub const DEFAULT_DEVICE: &str = "/dev/serial0";

/// # Printer Configuration
///
/// Defines the hardware characteristics of a thermal printer.
///
/// ## Physical Properties
///
/// - **width_dots**: Width of the print head in dots (pixels)
/// - **width_bytes**: Width in bytes (width_dots / 8)
/// - **max_column**: Characters per line in the default font
///
/// ## Heating
///
/// - **most_heated_point**: Max heating dots, in units of 8 dots
/// - **heat_time**: Heating time, in units of 10µs
/// - **heat_interval**: Heating interval, in units of 10µs
///
/// Higher heat time gives darker output at the cost of speed. The values
/// below are the ones the hardware was tuned with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterConfig {
    /// Printer model name
    pub name: &'static str,

    /// Print head width in dots (pixels)
    pub width_dots: u16,

    /// Print width in bytes (width_dots / 8)
    pub width_bytes: u16,

    /// Characters per line in the default font
    pub max_column: usize,

    /// Serial baud rate (the only value the hardware accepts)
    pub baud_rate: u32,

    /// Heat time
    pub heat_time: u8,

    /// Heat interval
    pub heat_interval: u8,

    /// Most heated point
    pub most_heated_point: u8,
}

impl PrinterConfig {
    /// # Tiny Thermal Printer Configuration
    ///
    /// The ubiquitous 58mm serial receipt printer (Adafruit, CSN-A2 and
    /// clones).
    ///
    /// ## Specifications
    ///
    /// | Property | Value |
    /// |----------|-------|
    /// | Paper width | 58mm |
    /// | Print width | 48mm (384 dots) |
    /// | Interface | TTL serial, 9600 8N1 |
    /// | Font A | 12×24 dots, 32 columns |
    pub const TINY_THERMAL: Self = Self {
        name: "Tiny thermal printer",
        width_dots: 384,
        width_bytes: 48,
        max_column: 32,
        baud_rate: 9600,
        heat_time: 120,
        heat_interval: 40,
        most_heated_point: 3,
    };
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self::TINY_THERMAL
    }
}

// ============================================================================
// DEVICE SETTINGS
// ============================================================================

/// Everything needed to open a session with the installed printer.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSettings {
    /// Path to the serial device (e.g. "/dev/serial0")
    pub port: PathBuf,
    /// Hardware specification
    pub config: PrinterConfig,
}

impl DeviceSettings {
    /// Settings for the default printer model on `port`.
    pub fn new(port: impl Into<PathBuf>) -> Self {
        Self {
            port: port.into(),
            config: PrinterConfig::TINY_THERMAL,
        }
    }
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self::new(DEFAULT_DEVICE)
    }
}

// ============================================================================
// TESTS
// ============================================================================
