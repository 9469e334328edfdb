//! # Floyd-Steinberg Dithering
//!
//! Converts a grayscale bitmap to packed 1-bit rows for the print head.
//!
//! ## What is Dithering?
//!
//! A thermal head can only print black or white. Dithering simulates gray by
//! varying the density of black dots:
//!
//! ```text
//! Grayscale:    White    Light    Medium    Dark    Black
//!               ░░░░░░   ░░▒░░░   ░▒░▒░▒   ▒▓▒▓▒▓   ██████
//! ```
//!
//! ## Error Diffusion
//!
//! Each pixel is thresholded at mid-gray and the quantization error is
//! pushed onto the neighbours that have not been visited yet:
//!
//! ```text
//!            ┌──────┬──────┐
//!            │  *   │ 7/16 │
//!     ┌──────┼──────┼──────┤
//!     │ 3/16 │ 5/16 │ 1/16 │
//!     └──────┴──────┴──────┘
//! ```
//!
//! Error diffusion keeps photo detail much better than ordered dithering,
//! which matters for the portraits this printer mostly gets.
//!
//! ## Usage Example
//!
//! ```
//! use image::GrayImage;
//! use ludivina::render::dither;
//!
//! let black = GrayImage::from_pixel(16, 2, image::Luma([0]));
//! let data = dither::floyd_steinberg(&black);
//! assert_eq!(data, vec![0xFF; 4]);
//! ```

use image::GrayImage;

/// Luma values below this print black.
const THRESHOLD: f32 = 128.0;

/// Dither a grayscale image into packed rows.
///
/// ## Returns
///
/// Packed byte array suitable for bitmap commands, row-major,
/// `ceil(width/8) * height` bytes long.
pub fn floyd_steinberg(image: &GrayImage) -> Vec<u8> {
    let width = image.width() as usize;
    let height = image.height() as usize;

    let mut levels: Vec<f32> = image.pixels().map(|p| p[0] as f32).collect();
    let mut data = Vec::with_capacity(width.div_ceil(8) * height);
    let mut row = vec![false; width];

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let old = levels[idx];
            let black = old < THRESHOLD;
            let new = if black { 0.0 } else { 255.0 };
            let error = old - new;
            row[x] = black;

            if x + 1 < width {
                levels[idx + 1] += error * 7.0 / 16.0;
            }
            if y + 1 < height {
                let below = idx + width;
                if x > 0 {
                    levels[below - 1] += error * 3.0 / 16.0;
                }
                levels[below] += error * 5.0 / 16.0;
                if x + 1 < width {
                    levels[below + 1] += error * 1.0 / 16.0;
                }
            }
        }
        data.extend(pack_row(&row));
    }

    data
}

/// Pack a row of boolean pixel values into bytes.
///
/// Converts a slice of bool values (true = black, false = white) into
/// a byte array suitable for printer graphics commands.
///
/// ## Bit Packing
///
/// - Bit 7 (MSB) = leftmost pixel
/// - Bit 0 (LSB) = rightmost pixel
/// - 1 = black (print dot), 0 = white (no dot)
///
/// ## Padding
///
/// If the row length is not a multiple of 8, the last byte is padded
/// with zeros (white) on the right.
///
/// ## Example
///
/// ```
/// use ludivina::render::dither::pack_row;
///
/// // 8 pixels pack into 1 byte
/// let row = vec![true, true, true, true, false, false, false, false];
/// assert_eq!(pack_row(&row), vec![0xF0]); // 11110000
///
/// // 12 pixels pack into 2 bytes (4 bits padding)
/// let row = vec![true; 12];
/// assert_eq!(pack_row(&row), vec![0xFF, 0xF0]); // 11111111 11110000
/// ```
pub fn pack_row(pixels: &[bool]) -> Vec<u8> {
    let num_bytes = pixels.len().div_ceil(8);
    let mut bytes = vec![0u8; num_bytes];

    for (i, &pixel) in pixels.iter().enumerate() {
        if pixel {
            let byte_idx = i / 8;
            let bit_idx = 7 - (i % 8); // MSB first
            bytes[byte_idx] |= 1 << bit_idx;
        }
    }

    bytes
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_pack_row_8_pixels() {
        // All black
        assert_eq!(pack_row(&[true; 8]), vec![0xFF]);
        // All white
        assert_eq!(pack_row(&[false; 8]), vec![0x00]);
        // Alternating
        assert_eq!(
            pack_row(&[true, false, true, false, true, false, true, false]),
            vec![0xAA]
        );
    }

    #[test]
    fn test_pack_row_padding() {
        // 9 pixels should pad to 2 bytes
        let packed = pack_row(&[true; 9]);
        assert_eq!(packed.len(), 2);
        assert_eq!(packed[0], 0xFF);
        assert_eq!(packed[1], 0x80); // 10000000
    }

    #[test]
    fn test_pack_row_empty() {
        assert_eq!(pack_row(&[]), Vec::<u8>::new());
    }

    #[test]
    fn test_dimensions() {
        let img = GrayImage::from_pixel(384, 10, Luma([128]));
        assert_eq!(floyd_steinberg(&img).len(), 48 * 10);

        let img = GrayImage::from_pixel(10, 3, Luma([128]));
        assert_eq!(floyd_steinberg(&img).len(), 2 * 3);
    }

    #[test]
    fn test_white_never_prints() {
        let img = GrayImage::from_pixel(64, 64, Luma([255]));
        assert!(floyd_steinberg(&img).iter().all(|&b| b == 0x00));
    }

    #[test]
    fn test_black_always_prints() {
        let img = GrayImage::from_pixel(64, 64, Luma([0]));
        assert!(floyd_steinberg(&img).iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_gray_distribution() {
        // Mid gray should print roughly half the dots
        let img = GrayImage::from_pixel(64, 64, Luma([127]));
        let black: u32 = floyd_steinberg(&img).iter().map(|b| b.count_ones()).sum();
        let total = 64 * 64;
        assert!(
            black > total * 2 / 5 && black < total * 3 / 5,
            "expected ~50% black dots, got {} of {}",
            black,
            total
        );
    }
}
