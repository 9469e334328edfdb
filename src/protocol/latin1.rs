//! # ISO-8859-1 Encoding
//!
//! Converts Unicode strings to Latin-1 single-byte encoding.
//!
//! The printer must be set to the ISO-8859-1 table (`ESC t 23`) for these
//! bytes to render correctly. Latin-1 maps one-to-one onto U+0000–U+00FF, so
//! Spanish text (ñ, á, ¿, ¡) prints as-is. A handful of common typographic
//! characters are folded to their closest Latin-1 look-alike; anything else
//! becomes `?`.
//!
//! Control characters (C0, DEL and C1) also become `?`. Message text comes
//! from chat users, and a raw `ESC` or `DC2` would reach the printer as a
//! command.

use tracing::debug;

/// Encode a Unicode string as Latin-1 bytes.
///
/// ```
/// use ludivina::protocol::latin1::encode;
///
/// assert_eq!(encode("año"), vec![b'a', 0xF1, b'o']);
/// assert_eq!(encode("“hi”"), b"\"hi\"".to_vec());
/// assert_eq!(encode("😀"), vec![b'?']);
/// ```
pub fn encode(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    for ch in s.chars() {
        let code = ch as u32;
        if ch.is_control() {
            debug!(code_point = code, "control character, replacing with '?'");
            out.push(b'?');
        } else if code <= 0xFF {
            out.push(code as u8);
        } else if let Some(byte) = fold(ch) {
            out.push(byte);
        } else {
            debug!(
                character = %ch,
                code_point = code,
                "unmapped character, replacing with '?'"
            );
            out.push(b'?');
        }
    }
    out
}

/// Map typographic characters outside Latin-1 to a printable substitute.
fn fold(ch: char) -> Option<u8> {
    let byte = match ch {
        '‘' | '’' | '‚' | '′' => b'\'',
        '“' | '”' | '„' | '″' => b'"',
        '–' | '—' | '‐' | '−' => b'-',
        '…' => b'.',
        '€' => b'E',
        '•' => 0xB7, // middle dot
        _ => return None,
    };
    Some(byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passthrough() {
        assert_eq!(encode("Hello, World!"), b"Hello, World!".to_vec());
    }

    #[test]
    fn test_spanish_characters() {
        assert_eq!(encode("¿Qué?"), vec![0xBF, b'Q', b'u', 0xE9, b'?']);
        assert_eq!(encode("¡Olé!"), vec![0xA1, b'O', b'l', 0xE9, b'!']);
        assert_eq!(encode("Ñ"), vec![0xD1]);
    }

    #[test]
    fn test_typographic_folding() {
        assert_eq!(encode("it’s"), b"it's".to_vec());
        assert_eq!(encode("a—b"), b"a-b".to_vec());
    }

    #[test]
    fn test_unmapped_replaced() {
        assert_eq!(encode("a漢b"), vec![b'a', b'?', b'b']);
    }

    #[test]
    fn test_control_characters_never_reach_the_printer() {
        let encoded = encode("hola\u{1b}@\u{1b}=\u{0}abuela\u{12}*\u{7f}\u{9b}ÿ");
        assert_eq!(encoded, b"hola?@?=?abuela?*??\xFF".to_vec());
        assert!(encoded.iter().all(|&b| b >= 0x20 && !(0x7F..=0x9F).contains(&b)));
    }

    #[test]
    fn test_one_byte_per_char() {
        let s = "señora mía 🌻";
        assert_eq!(encode(s).len(), s.chars().count());
    }
}
