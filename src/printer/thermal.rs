//! # Thermal Printer Driver
//!
//! [`ThermalPrinter`] speaks the tiny thermal printer protocol over any
//! [`Link`] and implements the [`Printer`] device boundary used by print
//! jobs.

use std::thread;
use std::time::Duration;

use image::{DynamicImage, RgbImage};
use tracing::{debug, trace};

use super::config::PrinterConfig;
use super::Printer;
use crate::error::LudivinaError;
use crate::protocol::status::PrinterStatus;
use crate::protocol::text::{self, CodePage, LineStyle};
use crate::protocol::{commands, graphics};
use crate::render::dither;
use crate::transport::Link;

/// Time the printer needs to prepare its answer to a status request
const STATUS_REPLY_DELAY: Duration = Duration::from_millis(50);

/// Default print density (50% + 5% × 10)
const DENSITY: u8 = 10;

/// Default print break time (250µs × 2)
const BREAK_TIME: u8 = 2;

/// A thermal printer on the other end of a [`Link`].
pub struct ThermalPrinter<L: Link> {
    link: L,
    config: PrinterConfig,
}

impl<L: Link> ThermalPrinter<L> {
    /// Reset the printer and apply the heating parameters from `config`.
    pub fn new(mut link: L, config: PrinterConfig) -> Result<Self, LudivinaError> {
        let mut setup = commands::init();
        setup.extend(commands::heat_settings(
            config.most_heated_point,
            config.heat_time,
            config.heat_interval,
        ));
        setup.extend(commands::print_density(DENSITY, BREAK_TIME));
        link.send(&setup)?;

        Ok(Self { link, config })
    }

    /// The hardware configuration this driver was built with.
    pub fn config(&self) -> &PrinterConfig {
        &self.config
    }

    /// Give back the underlying link.
    pub fn into_link(self) -> L {
        self.link
    }
}

impl<L: Link> Printer for ThermalPrinter<L> {
    fn online(&mut self) -> Result<(), LudivinaError> {
        self.link.send(&commands::online())
    }

    fn offline(&mut self) -> Result<(), LudivinaError> {
        self.link.send(&commands::offline())
    }

    fn status(&mut self) -> Result<PrinterStatus, LudivinaError> {
        self.link.send(&commands::status_request())?;
        thread::sleep(STATUS_REPLY_DELAY);

        let byte = self.link.receive_byte()?.unwrap_or_else(|| {
            debug!("printer did not answer the status request");
            PrinterStatus::NO_ANSWER
        });
        let status = PrinterStatus::from_byte(byte);
        trace!(byte, ?status, "printer status");
        Ok(status)
    }

    fn out(&mut self, line: &str, style: LineStyle, page: CodePage) -> Result<(), LudivinaError> {
        self.link.send(&text::line(line, style, page))
    }

    fn image(&mut self, image: &RgbImage) -> Result<(), LudivinaError> {
        if image.width() > self.config.width_dots as u32 {
            return Err(LudivinaError::Image(format!(
                "Image is {} dots wide, the print head only has {}",
                image.width(),
                self.config.width_dots
            )));
        }

        let gray = DynamicImage::ImageRgb8(image.clone()).to_luma8();
        let data = dither::floyd_steinberg(&gray);
        let width_bytes = image.width().div_ceil(8) as u8;

        for block in graphics::bitmap(width_bytes, &data) {
            self.link.send(&block)?;
        }
        Ok(())
    }

    fn feed(&mut self, lines: u8) -> Result<(), LudivinaError> {
        self.link.send(&commands::feed_lines(lines))
    }

    fn max_column(&self) -> usize {
        self.config.max_column
    }
}

// ============================================================================
// TESTS
// ============================================================================
