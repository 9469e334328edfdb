//! # Printer Status Byte
//!
//! Decoding of the single byte returned by `ESC v 0`.
//!
//! ```text
//! bit 7 6 5 4 3 2 1 0
//!       │     │ │   └── paper movement
//!       │     │ └────── paper end (1 = no paper)
//!       │     └──────── voltage out of range
//!       └────────────── head temperature too high
//! ```

/// Status reported by the printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterStatus {
    /// Paper is present in the tray
    pub paper: bool,
    /// Paper is moving
    pub movement: bool,
    /// Head temperature is within range
    pub temperature_ok: bool,
    /// Supply voltage is within range
    pub voltage_ok: bool,
}

impl PrinterStatus {
    /// Assumed status when the printer does not answer at all.
    ///
    /// A silent printer is treated as out of paper so nothing is printed
    /// blindly.
    pub const NO_ANSWER: u8 = 0b0000_1111;

    /// Decode a status byte.
    ///
    /// ```
    /// use ludivina::protocol::status::PrinterStatus;
    ///
    /// assert!(PrinterStatus::from_byte(0x00).paper);
    /// assert!(!PrinterStatus::from_byte(0x04).paper);
    /// ```
    pub fn from_byte(byte: u8) -> Self {
        Self {
            paper: byte & 0b0000_0100 == 0,
            movement: byte & 0b0000_0001 != 0,
            temperature_ok: byte & 0b0100_0000 == 0,
            voltage_ok: byte & 0b0000_1000 == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_clear() {
        let status = PrinterStatus::from_byte(0x00);
        assert!(status.paper);
        assert!(!status.movement);
        assert!(status.temperature_ok);
        assert!(status.voltage_ok);
    }

    #[test]
    fn test_paper_end_bit() {
        assert!(!PrinterStatus::from_byte(0b0000_0100).paper);
        assert!(PrinterStatus::from_byte(0b1111_1011).paper);
    }

    #[test]
    fn test_no_answer_means_no_paper() {
        let status = PrinterStatus::from_byte(PrinterStatus::NO_ANSWER);
        assert!(!status.paper);
        assert!(!status.voltage_ok);
    }

    #[test]
    fn test_temperature_bit() {
        assert!(!PrinterStatus::from_byte(0b0100_0000).temperature_ok);
    }
}
