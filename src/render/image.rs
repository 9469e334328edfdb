//! # Photo Preparation
//!
//! Turns an arbitrary photo into a bitmap exactly as wide as the print head.
//!
//! ## Pipeline
//!
//! ```text
//! bytes ──decode──► RGB ──rotate if landscape──► sharpen ×2.5 ──resize──► head width
//! ```
//!
//! - Landscape photos are turned 90° counter-clockwise so they use the whole
//!   length of the paper instead of printing as a thin strip. The canvas is
//!   expanded, nothing is cropped.
//! - Sharpening compensates for the softness of thermal dots.
//! - The scale factor comes from the width alone and the height follows it,
//!   rounded down, so the aspect ratio is preserved.
//!
//! Monochrome conversion is left to the printer driver
//! (see [`crate::render::dither`]).

use image::{RgbImage, imageops, imageops::FilterType};

use crate::error::LudivinaError;

/// Sharpness enhancement factor (1.0 leaves the image unchanged)
pub const SHARPNESS: f32 = 2.5;

/// Prepare a photo for the print head.
///
/// ## Parameters
///
/// - `bytes`: Encoded image (JPEG, PNG, ...)
/// - `declared_width` / `declared_height`: Dimensions reported by the sender,
///   used to decide the orientation
/// - `target_width`: Print head width in dots
///
/// ## Errors
///
/// Returns [`LudivinaError::Image`] if the bytes cannot be decoded.
pub fn prepare(
    bytes: &[u8],
    declared_width: u32,
    declared_height: u32,
    target_width: u32,
) -> Result<RgbImage, LudivinaError> {
    let mut image = image::load_from_memory(bytes)?.to_rgb8();

    if declared_width > declared_height {
        image = imageops::rotate270(&image);
    }

    let image = sharpen(&image, SHARPNESS);

    let height = scaled_height(image.width(), image.height(), target_width);
    Ok(imageops::resize(
        &image,
        target_width,
        height,
        FilterType::CatmullRom,
    ))
}

/// Height after scaling `width` to `target_width`, rounded down.
///
/// Never returns less than one row.
///
/// ```
/// use ludivina::render::image::scaled_height;
///
/// assert_eq!(scaled_height(1280, 960, 384), 288);
/// assert_eq!(scaled_height(100, 333, 384), 1278);
/// ```
pub fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    if width == 0 {
        return 1;
    }
    let scaled = height as u64 * target_width as u64 / width as u64;
    scaled.clamp(1, u32::MAX as u64) as u32
}

/// Sharpen by blending the image with a smoothed copy of itself.
///
/// `out = smooth + factor × (image − smooth)`, where `smooth` is a 3×3
/// weighted average (centre weight 5, neighbours 1). Factors above 1.0
/// sharpen, 1.0 is the identity. Edge pixels are left untouched.
pub fn sharpen(image: &RgbImage, factor: f32) -> RgbImage {
    let (width, height) = image.dimensions();
    let mut out = image.clone();
    if width < 3 || height < 3 {
        return out;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let centre = image.get_pixel(x, y);
            let mut pixel = *centre;
            for channel in 0..3 {
                let mut sum = 0u32;
                for dy in 0..3 {
                    for dx in 0..3 {
                        let weight = if dx == 1 && dy == 1 { 5 } else { 1 };
                        sum += weight * image.get_pixel(x + dx - 1, y + dy - 1)[channel] as u32;
                    }
                }
                let smooth = (sum as f32 / 13.0).round();
                let original = centre[channel] as f32;
                let value = smooth + factor * (original - smooth);
                pixel[channel] = value.round().clamp(0.0, 255.0) as u8;
            }
            out.put_pixel(x, y, pixel);
        }
    }

    out
}

// ============================================================================
// TESTS
// ============================================================================
