//! # Rendering Module
//!
//! Pure transforms that turn message content into something the print head
//! can reproduce.
//!
//! ## Modules
//!
//! - [`text`]: Line wrapping to the printer's column width
//! - [`image`]: Photo rotation, sharpening and scaling to the head width
//! - [`dither`]: Floyd-Steinberg conversion to packed 1-bit rows
//!
//! ## Usage Example
//!
//! ```
//! use ludivina::render::text::wrap;
//!
//! let lines = wrap("Hola abuela, te quiero mucho", 16);
//! assert_eq!(lines, vec!["Hola abuela, te", "quiero mucho"]);
//! ```

pub mod dither;
pub mod image;
pub mod text;
