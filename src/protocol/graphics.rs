//! # Bitmap Graphics Commands
//!
//! The tiny thermal printer prints bitmaps with `DC2 * r n d1...dk`.
//!
//! ## Bit Packing
//!
//! Graphics data is packed as bytes where each bit represents one dot:
//! - Bit 7 (MSB) = leftmost dot
//! - Bit 0 (LSB) = rightmost dot
//! - 1 = black (print), 0 = white (no print)
//!
//! ```text
//! Byte value 0xF0 = 11110000 = ████░░░░
//! Byte value 0x0F = 00001111 = ░░░░████
//! ```
//!
//! ## Block Size
//!
//! The row count `r` is a single byte, so taller bitmaps are sent as
//! consecutive blocks of at most 255 rows.

use super::commands::DC2;

/// Maximum rows per `DC2 *` block
pub const MAX_BLOCK_ROWS: usize = 255;

// ============================================================================
// RASTER BITMAP (DC2 *)
// ============================================================================

/// # Print Raster Bit Image (DC2 * r n d1...dk)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | DC2 * r n d1...dk |
/// | Hex     | 12 2A r n d1...dk |
///
/// ## Parameters
///
/// - `r`: Rows in this block (1-255)
/// - `n`: Width in bytes (1-48 for a 384 dot head)
/// - `d1...dk`: Image data, k = r × n bytes, row-major
///
/// ## Example
///
/// ```
/// use ludivina::protocol::graphics;
///
/// let data = vec![0xFF; 48 * 2];
/// let cmd = graphics::bitmap_block(48, 2, &data);
/// assert_eq!(&cmd[0..4], &[0x12, 0x2A, 2, 48]);
/// assert_eq!(cmd.len(), 4 + 48 * 2);
/// ```
pub fn bitmap_block(width_bytes: u8, rows: u8, data: &[u8]) -> Vec<u8> {
    debug_assert!(
        data.len() == width_bytes as usize * rows as usize,
        "Bitmap data length mismatch. Expected {} ({} bytes × {} rows), got {}",
        width_bytes as usize * rows as usize,
        width_bytes,
        rows,
        data.len()
    );

    let mut cmd = Vec::with_capacity(4 + data.len());
    cmd.push(DC2);
    cmd.push(b'*');
    cmd.push(rows);
    cmd.push(width_bytes);
    cmd.extend_from_slice(data);
    cmd
}

/// Split packed raster data into `DC2 *` blocks of at most 255 rows.
///
/// `data` must hold whole rows of `width_bytes` bytes each.
///
/// ```
/// use ludivina::protocol::graphics;
///
/// let data = vec![0x00; 48 * 300];
/// let blocks = graphics::bitmap(48, &data);
/// assert_eq!(blocks.len(), 2);
/// assert_eq!(blocks[0][2], 255);
/// assert_eq!(blocks[1][2], 45);
/// ```
pub fn bitmap(width_bytes: u8, data: &[u8]) -> Vec<Vec<u8>> {
    if width_bytes == 0 {
        return Vec::new();
    }
    data.chunks(width_bytes as usize * MAX_BLOCK_ROWS)
        .map(|chunk| {
            let rows = chunk.len() / width_bytes as usize;
            bitmap_block(width_bytes, rows as u8, &chunk[..rows * width_bytes as usize])
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
