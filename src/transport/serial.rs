//! # Serial Transport
//!
//! This module provides communication with the thermal printer over a TTY
//! serial port, typically the Raspberry Pi UART (`/dev/serial0`) or a
//! USB-serial adapter (`/dev/ttyUSB0`).
//!
//! ## TTY Configuration
//!
//! The device is opened in raw mode so binary data is transmitted without
//! modification:
//!
//! - **No input processing**: Disable IGNBRK, BRKINT, PARMRK, ISTRIP, etc.
//! - **No output processing**: Disable OPOST (no CR/LF translation)
//! - **8-bit characters**: CS8 (8 data bits, no parity)
//! - **No echo**: Disable ECHO, ECHONL
//! - **Non-canonical mode**: Disable ICANON (no line buffering)
//! - **Fixed speed**: Input and output baud rate set to the printer's rate
//! - **Read timeout**: VMIN = 0, VTIME = 5, so a read returns after 0.5s
//!   even if the printer never answers
//!
//! ## Pacing
//!
//! The printer has a small receive buffer and no flow control. Writes are
//! split into chunks and each chunk is drained (`tcdrain`) before the next
//! one is queued, so the host never runs far ahead of the wire.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::io::AsRawFd;
use std::path::Path;
use std::thread;
use std::time::Duration;

use tracing::debug;

use super::Link;
use crate::error::LudivinaError;

/// Default chunk size for writes (bytes)
const CHUNK_SIZE: usize = 256;

/// Delay between chunks (milliseconds)
const CHUNK_DELAY_MS: u64 = 2;

/// Read timeout in deciseconds (VTIME)
const READ_TIMEOUT_DECISECONDS: u8 = 5;

/// # Serial Printer Transport
///
/// Manages a connection to the printer over a serial TTY. The connection is
/// closed when the transport is dropped.
///
/// ## Example
///
/// ```no_run
/// use ludivina::transport::{Link, SerialTransport};
/// use ludivina::protocol::commands;
///
/// let mut transport = SerialTransport::open("/dev/serial0", 9600)?;
/// transport.send(&commands::init())?;
///
/// # Ok::<(), ludivina::error::LudivinaError>(())
/// ```
pub struct SerialTransport {
    file: File,
}

impl SerialTransport {
    /// Open a serial connection to the printer.
    ///
    /// ## Errors
    ///
    /// Returns an error if:
    /// - The device doesn't exist
    /// - Permission denied (may need root or the dialout group)
    /// - The baud rate is not supported
    /// - TTY configuration fails
    pub fn open<P: AsRef<Path>>(device: P, baud_rate: u32) -> Result<Self, LudivinaError> {
        let path = device.as_ref();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| {
                LudivinaError::Transport(format!("Failed to open {}: {}", path.display(), e))
            })?;

        configure_tty_raw(file.as_raw_fd(), baud_rate)?;
        debug!(device = %path.display(), baud_rate, "serial port open");

        Ok(Self { file })
    }
}

impl Link for SerialTransport {
    fn send(&mut self, data: &[u8]) -> Result<(), LudivinaError> {
        for chunk in data.chunks(CHUNK_SIZE) {
            self.file
                .write_all(chunk)
                .map_err(|e| LudivinaError::Transport(format!("Write failed: {}", e)))?;
            drain(self.file.as_raw_fd())?;

            thread::sleep(Duration::from_millis(CHUNK_DELAY_MS));
        }
        Ok(())
    }

    fn receive_byte(&mut self) -> Result<Option<u8>, LudivinaError> {
        let mut buf = [0u8; 1];
        match self.file.read(&mut buf) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(LudivinaError::Transport(format!("Read failed: {}", e))),
        }
    }
}

/// Map a numeric baud rate to the termios speed constant.
#[cfg(unix)]
fn speed(baud_rate: u32) -> Result<libc::speed_t, LudivinaError> {
    let speed = match baud_rate {
        1200 => libc::B1200,
        2400 => libc::B2400,
        4800 => libc::B4800,
        9600 => libc::B9600,
        19200 => libc::B19200,
        38400 => libc::B38400,
        57600 => libc::B57600,
        115200 => libc::B115200,
        other => {
            return Err(LudivinaError::Transport(format!(
                "Unsupported baud rate: {}",
                other
            )));
        }
    };
    Ok(speed)
}

/// Configure a file descriptor for raw TTY mode at `baud_rate`.
///
/// Note: IXON/IXOFF/IXANY disable XON/XOFF software flow control. This is
/// required because 0x11 (XON/DC1) and 0x13 (XOFF/DC3) appear in bitmap data.
#[cfg(unix)]
fn configure_tty_raw(fd: i32, baud_rate: u32) -> Result<(), LudivinaError> {
    use std::mem::MaybeUninit;

    let speed = speed(baud_rate)?;

    // Get current terminal attributes
    let mut termios = MaybeUninit::uninit();
    let result = unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) };
    if result != 0 {
        return Err(LudivinaError::Transport(format!(
            "tcgetattr failed: {}",
            io::Error::last_os_error()
        )));
    }
    let mut termios = unsafe { termios.assume_init() };

    // Input flags: disable all processing
    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);

    // Output flags: disable post-processing
    termios.c_oflag &= !libc::OPOST;

    // Local flags: disable echo, canonical mode, signals
    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);

    // Control flags: 8-bit characters, no parity, receiver on, no modem control
    termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
    termios.c_cflag |= libc::CS8 | libc::CREAD | libc::CLOCAL;

    // Reads return whatever arrived within the timeout, possibly nothing
    termios.c_cc[libc::VMIN] = 0;
    termios.c_cc[libc::VTIME] = READ_TIMEOUT_DECISECONDS;

    let result = unsafe {
        libc::cfsetispeed(&mut termios, speed) | libc::cfsetospeed(&mut termios, speed)
    };
    if result != 0 {
        return Err(LudivinaError::Transport(format!(
            "cfsetspeed failed: {}",
            io::Error::last_os_error()
        )));
    }

    // Apply settings immediately
    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) };
    if result != 0 {
        return Err(LudivinaError::Transport(format!(
            "tcsetattr failed: {}",
            io::Error::last_os_error()
        )));
    }

    Ok(())
}

#[cfg(not(unix))]
fn configure_tty_raw(_fd: i32, _baud_rate: u32) -> Result<(), LudivinaError> {
    Ok(())
}

/// Block until everything written to `fd` has been transmitted.
#[cfg(unix)]
fn drain(fd: i32) -> Result<(), LudivinaError> {
    let result = unsafe { libc::tcdrain(fd) };
    if result != 0 {
        return Err(LudivinaError::Transport(format!(
            "tcdrain failed: {}",
            io::Error::last_os_error()
        )));
    }
    Ok(())
}

#[cfg(not(unix))]
fn drain(_fd: i32) -> Result<(), LudivinaError> {
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_speeds() {
        assert_eq!(speed(9600).unwrap(), libc::B9600);
        assert_eq!(speed(115200).unwrap(), libc::B115200);
    }

    #[test]
    fn test_unsupported_speed() {
        assert!(matches!(speed(9601), Err(LudivinaError::Transport(_))));
    }

    #[test]
    fn test_open_missing_device() {
        let err = SerialTransport::open("/dev/does-not-exist-ludivina", 9600)
            .err()
            .unwrap();
        assert!(err.to_string().contains("/dev/does-not-exist-ludivina"));
    }

    #[test]
    fn test_open_regular_file_is_not_a_tty() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(SerialTransport::open(file.path(), 9600).is_err());
    }

    // Note: Most transport tests require actual hardware.
    // Integration tests should be run manually with a connected printer.
}
