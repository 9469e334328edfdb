//! # Tiny Thermal Printer Commands
//!
//! This module implements the subset of the ESC/POS command set understood by
//! the common 58mm serial thermal printers (CSN-A2, Adafruit "tiny thermal
//! printer" and clones).
//!
//! ## Protocol Overview
//!
//! Commands are byte sequences starting with a control character:
//!
//! - Single byte: `LF`
//! - Two/three bytes: `ESC @`, `ESC = n`, `ESC d n`
//! - Multi-byte with parameters: `ESC 7 n1 n2 n3`, `DC2 * r n data...`
//!
//! Unlike bigger receipt printers, there is no cutter and the only status
//! channel is a single byte returned by `ESC v 0`.

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// DC2 (Device Control 2) - Prefix for density and bitmap commands
pub const DC2: u8 = 0x12;

/// LF (Line Feed) - Print the line buffer and advance one line
pub const LF: u8 = 0x0A;

// ============================================================================
// INITIALIZATION COMMANDS
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Clears the print buffer and resets modes to their power-on defaults.
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
///
/// ```
/// use ludivina::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

/// # Heating Parameters (ESC 7 n1 n2 n3)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC 7 n1 n2 n3 |
/// | Hex     | 1B 37 n1 n2 n3 |
///
/// ## Parameters
///
/// - `n1` (`most_heated_point`): max heating dots, unit 8 dots, default 7 (64 dots)
/// - `n2` (`heat_time`): heating time, unit 10µs, default 80 (800µs)
/// - `n3` (`heat_interval`): heating interval, unit 10µs, default 2 (20µs)
///
/// More heating dots means faster printing and higher current peaks; a
/// longer heat time gives darker output.
pub fn heat_settings(most_heated_point: u8, heat_time: u8, heat_interval: u8) -> Vec<u8> {
    vec![ESC, b'7', most_heated_point, heat_time, heat_interval]
}

/// # Print Density (DC2 # n)
///
/// - bits 0-4: density, 50% + 5% × n
/// - bits 5-7: break time, 250µs × n
pub fn print_density(density: u8, break_time: u8) -> Vec<u8> {
    vec![DC2, b'#', (break_time << 5) | (density & 0x1F)]
}

// ============================================================================
// POWER COMMANDS
// ============================================================================

/// # Set Online / Offline (ESC = n)
///
/// While offline the printer ignores everything except `ESC = 1`, which
/// keeps the heating element idle and saves power between jobs.
///
/// ```
/// use ludivina::protocol::commands;
///
/// assert_eq!(commands::online(), vec![0x1B, 0x3D, 0x01]);
/// assert_eq!(commands::offline(), vec![0x1B, 0x3D, 0x00]);
/// ```
#[inline]
pub fn online() -> Vec<u8> {
    vec![ESC, b'=', 1]
}

/// Take the printer offline (ESC = 0)
#[inline]
pub fn offline() -> Vec<u8> {
    vec![ESC, b'=', 0]
}

// ============================================================================
// STATUS COMMANDS
// ============================================================================

/// # Transmit Paper Sensor Status (ESC v 0)
///
/// The printer answers with one status byte, see
/// [`PrinterStatus::from_byte`](super::status::PrinterStatus::from_byte).
#[inline]
pub fn status_request() -> Vec<u8> {
    vec![ESC, b'v', 0]
}

// ============================================================================
// PAPER FEED COMMANDS
// ============================================================================

/// # Print and Feed n Lines (ESC d n)
///
/// ```
/// use ludivina::protocol::commands;
///
/// assert_eq!(commands::feed_lines(2), vec![0x1B, 0x64, 0x02]);
/// ```
#[inline]
pub fn feed_lines(n: u8) -> Vec<u8> {
    vec![ESC, b'd', n]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init() {
        assert_eq!(init(), vec![0x1B, 0x40]);
    }

    #[test]
    fn test_heat_settings() {
        assert_eq!(heat_settings(3, 120, 40), vec![0x1B, 0x37, 3, 120, 40]);
    }

    #[test]
    fn test_print_density_packs_break_time() {
        // density 10, break time 2 -> 0b010_01010
        assert_eq!(print_density(10, 2), vec![0x12, 0x23, 0x4A]);
        // density is masked to 5 bits
        assert_eq!(print_density(0xFF, 0), vec![0x12, 0x23, 0x1F]);
    }

    #[test]
    fn test_online_offline() {
        assert_eq!(online(), vec![0x1B, 0x3D, 0x01]);
        assert_eq!(offline(), vec![0x1B, 0x3D, 0x00]);
    }

    #[test]
    fn test_status_request() {
        assert_eq!(status_request(), vec![0x1B, 0x76, 0x00]);
    }

    #[test]
    fn test_feed_lines() {
        assert_eq!(feed_lines(0), vec![0x1B, 0x64, 0x00]);
        assert_eq!(feed_lines(2), vec![0x1B, 0x64, 0x02]);
        assert_eq!(feed_lines(255), vec![0x1B, 0x64, 0xFF]);
    }
}
