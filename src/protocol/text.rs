//! # Text Styling Commands
//!
//! Text formatting for the tiny thermal printer.
//!
//! ## Print Modes
//!
//! Styles are selected all at once with `ESC ! n`, where `n` is a bit mask:
//!
//! | Bit | Mask | Effect |
//! |-----|------|--------|
//! | 1 | 0x02 | Inverse |
//! | 2 | 0x04 | Upside down |
//! | 3 | 0x08 | Bold |
//! | 4 | 0x10 | Double height |
//! | 5 | 0x20 | Double width |
//! | 6 | 0x40 | Strike-through |
//!
//! Double height keeps the column count; double width halves it, so it is
//! never used for wrapped text.

use super::commands::{ESC, LF};
use super::latin1;

// ============================================================================
// PRINT MODE
// ============================================================================

/// Bold (emphasized) print mode bit
pub const MODE_BOLD: u8 = 1 << 3;

/// Double height print mode bit
pub const MODE_DOUBLE_HEIGHT: u8 = 1 << 4;

/// Style applied to one printed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineStyle {
    pub bold: bool,
    pub double_height: bool,
}

impl LineStyle {
    /// Style used for message bodies.
    pub const BODY: Self = Self {
        bold: true,
        double_height: true,
    };

    /// Style used for the signature line.
    pub const SIGNATURE: Self = Self {
        bold: false,
        double_height: true,
    };

    /// The `ESC !` mask for this style.
    pub fn mode_bits(&self) -> u8 {
        let mut bits = 0;
        if self.bold {
            bits |= MODE_BOLD;
        }
        if self.double_height {
            bits |= MODE_DOUBLE_HEIGHT;
        }
        bits
    }
}

/// # Select Print Mode (ESC ! n)
///
/// ```
/// use ludivina::protocol::text::{print_mode, LineStyle};
///
/// assert_eq!(print_mode(LineStyle::BODY.mode_bits()), vec![0x1B, 0x21, 0x18]);
/// ```
#[inline]
pub fn print_mode(bits: u8) -> Vec<u8> {
    vec![ESC, b'!', bits]
}

// ============================================================================
// CODE PAGES
// ============================================================================

/// Character code tables selectable with `ESC t n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodePage {
    Cp437 = 0,
    #[default]
    Iso8859_1 = 23,
}

/// # Select Character Code Table (ESC t n)
#[inline]
pub fn code_page(page: CodePage) -> Vec<u8> {
    vec![ESC, b't', page as u8]
}

// ============================================================================
// LINES
// ============================================================================

/// Build the full byte sequence for one line of text.
///
/// Selects the code page and print mode, writes the Latin-1 encoded text,
/// terminates it with `LF` and resets the print mode so later output is not
/// affected.
///
/// ```
/// use ludivina::protocol::text::{line, CodePage, LineStyle};
///
/// let bytes = line("hola", LineStyle::SIGNATURE, CodePage::Iso8859_1);
/// assert_eq!(&bytes[..3], &[0x1B, 0x74, 23]);
/// assert!(bytes.windows(5).any(|w| w == b"hola\n"));
/// ```
pub fn line(text: &str, style: LineStyle, page: CodePage) -> Vec<u8> {
    let mut out = code_page(page);
    out.extend(print_mode(style.mode_bits()));
    out.extend(latin1::encode(text));
    out.push(LF);
    out.extend(print_mode(0));
    out
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_bits() {
        assert_eq!(LineStyle::default().mode_bits(), 0);
        assert_eq!(LineStyle::BODY.mode_bits(), 0x18);
        assert_eq!(LineStyle::SIGNATURE.mode_bits(), 0x10);
    }

    #[test]
    fn test_code_page_values() {
        assert_eq!(code_page(CodePage::Cp437), vec![0x1B, 0x74, 0]);
        assert_eq!(code_page(CodePage::Iso8859_1), vec![0x1B, 0x74, 23]);
    }

    #[test]
    fn test_line_layout() {
        let bytes = line("abc", LineStyle::BODY, CodePage::Iso8859_1);
        assert_eq!(
            bytes,
            vec![
                0x1B, 0x74, 23, // code page
                0x1B, 0x21, 0x18, // bold + double height
                b'a', b'b', b'c', LF, // text
                0x1B, 0x21, 0x00, // reset
            ]
        );
    }

    #[test]
    fn test_line_encodes_latin1() {
        let bytes = line("ñ", LineStyle::default(), CodePage::Iso8859_1);
        assert_eq!(bytes[6], 0xF1);
    }
}
