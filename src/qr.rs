//! QR code rendering to PNG.
//!
//! The code is laid out on a square of `size` pixels including a quiet zone
//! of `margin` modules. When the requested size cannot hold one pixel per
//! module the code is drawn at a fixed scale instead.

use std::str::FromStr;

use image::{DynamicImage, Rgba, RgbaImage};
use qrcode::{EcLevel, QrCode};
use strum_macros::Display;

use crate::canvas::{ExportFormat, RasterCanvas};
use crate::color::Color;
use crate::constants::qr::*;
use crate::error::*;

pub const QR_FILENAME: &str = "qr-code.png";

/// Share of codewords that can be restored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum Correction {
    /// 7%
    #[strum(serialize = "L")]
    Low,
    /// 15%
    #[default]
    #[strum(serialize = "M")]
    Medium,
    /// 25%
    #[strum(serialize = "Q")]
    Quartile,
    /// 30%
    #[strum(serialize = "H")]
    High,
}

impl FromStr for Correction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "L" | "LOW" => Ok(Correction::Low),
            "M" | "MEDIUM" => Ok(Correction::Medium),
            "Q" | "QUARTILE" => Ok(Correction::Quartile),
            "H" | "HIGH" => Ok(Correction::High),
            _ => Err(invalid(format!("unknown error correction level \"{}\"", s))),
        }
    }
}

impl From<Correction> for EcLevel {
    fn from(level: Correction) -> Self {
        match level {
            Correction::Low => EcLevel::L,
            Correction::Medium => EcLevel::M,
            Correction::Quartile => EcLevel::Q,
            Correction::High => EcLevel::H,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QrOptions {
    pub size: u32,
    pub margin: u32,
    pub dark: Color,
    pub light: Color,
    pub correction: Correction,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            margin: DEFAULT_MARGIN,
            dark: Color::rgb(0, 0, 0),
            light: Color::rgb(255, 255, 255),
            correction: Correction::default(),
        }
    }
}

impl QrOptions {
    fn validate(&self) -> Result<()> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&self.size) {
            return Err(invalid(format!(
                "size must be between {} and {}, got {}",
                MIN_SIZE, MAX_SIZE, self.size
            )));
        }
        if self.margin > MAX_MARGIN {
            return Err(invalid(format!(
                "margin must be between 0 and {}, got {}",
                MAX_MARGIN, self.margin
            )));
        }
        Ok(())
    }
}

/// Module grid of an encoded text, `true` for dark modules
#[derive(Debug, Clone)]
pub struct QrMatrix {
    width: usize,
    modules: Vec<bool>,
}

impl QrMatrix {
    /// Encodes the text at the given correction level
    ///
    /// # Errors
    /// * `ValidationError` - the text is blank or does not fit in a QR code
    pub fn encode(text: &str, correction: Correction) -> Result<Self> {
        if text.trim().is_empty() {
            return Err(invalid("enter text or a URL to encode"));
        }
        let code = QrCode::with_error_correction_level(text.as_bytes(), correction.into())
            .map_err(|e| invalid(format!("unable to encode text. Cause : {}", e)))?;
        let modules = code
            .to_colors()
            .into_iter()
            .map(|color| color == qrcode::Color::Dark)
            .collect();
        Ok(Self {
            width: code.width(),
            modules,
        })
    }

    /// Modules per side, without the quiet zone
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.modules[y * self.width + x]
    }

    /// Draws the grid with a quiet zone of `margin` modules
    pub fn render(&self, options: &QrOptions) -> RgbaImage {
        let total = (self.width as u32 + 2 * options.margin).max(1);
        let side = if options.size >= total {
            options.size
        } else {
            total * FALLBACK_SCALE
        };
        let dark = pixel(&options.dark);
        let light = pixel(&options.light);
        let margin = options.margin as i64;

        RgbaImage::from_fn(side, side, |px, py| {
            let x = (px as u64 * total as u64 / side as u64) as i64 - margin;
            let y = (py as u64 * total as u64 / side as u64) as i64 - margin;
            if x >= 0 && y >= 0 && self.is_dark(x as usize, y as usize) {
                dark
            } else {
                light
            }
        })
    }
}

fn pixel(color: &Color) -> Rgba<u8> {
    let (r, g, b) = color.to_rgb8();
    Rgba([r, g, b, (color.alpha() * 255.0).round() as u8])
}

/// Encodes the text and returns the PNG bytes
pub fn generate(text: &str, options: &QrOptions) -> Result<Vec<u8>> {
    options.validate()?;
    let matrix = QrMatrix::encode(text, options.correction)?;
    RasterCanvas::new(DynamicImage::ImageRgba8(matrix.render(options))).export(ExportFormat::Png)
}
