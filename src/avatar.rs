//! Letter avatars: the initials of a name drawn in white, centered on a solid
//! background, clipped to a square, circle or rounded square.

use fontdb::{Database, Family, Query, Stretch, Style, Weight, ID};
use image::{DynamicImage, Rgba, RgbaImage};
use tiny_skia::{FillRule, Paint, Pixmap, Transform};
use ttf_parser::{Face, GlyphId, OutlineBuilder};

use crate::canvas::{ExportFormat, RasterCanvas, Shape};
use crate::color::Color;
use crate::constants::avatar::*;
use crate::debug;
use crate::error::*;

pub const AVATAR_FILENAME: &str = "profile-letter.png";

/// Up to two uppercase letters: the first letter of the first word and the
/// first letter of the last word
///
/// # Errors
/// * `ValidationError` - the name has no words
pub fn initials(name: &str) -> Result<String> {
    let words: Vec<&str> = name.split_whitespace().collect();
    let (first, last) = match (words.first(), words.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(invalid("enter a name first")),
    };
    let mut letters: String = first.chars().take(1).flat_map(char::to_uppercase).collect();
    if words.len() > 1 {
        letters.extend(last.chars().take(1).flat_map(char::to_uppercase));
    }
    Ok(letters.chars().take(2).collect())
}

#[derive(Debug, Clone, PartialEq)]
pub struct AvatarOptions {
    pub size: u32,
    pub font_size: u32,
    pub background: Color,
    /// Rounded corners are a tenth of the side, whatever radius is given
    pub style: Shape,
}

impl Default for AvatarOptions {
    fn default() -> Self {
        let (r, g, b) = DEFAULT_BACKGROUND;
        Self {
            size: DEFAULT_SIZE,
            font_size: DEFAULT_FONT_SIZE,
            background: Color::rgb(r, g, b),
            style: Shape::Square,
        }
    }
}

impl AvatarOptions {
    fn validate(&self) -> Result<()> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&self.size) {
            return Err(invalid(format!(
                "size must be between {} and {}, got {}",
                MIN_SIZE, MAX_SIZE, self.size
            )));
        }
        if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&self.font_size) {
            return Err(invalid(format!(
                "font size must be between {} and {}, got {}",
                MIN_FONT_SIZE, MAX_FONT_SIZE, self.font_size
            )));
        }
        Ok(())
    }

    fn shape(&self) -> Shape {
        match self.style {
            Shape::Rounded(_) => Shape::Rounded(self.size / 10),
            shape => shape,
        }
    }
}

/// A bold sans-serif face picked from a font database
pub struct LetterFont {
    db: Database,
    id: ID,
}

impl LetterFont {
    /// Picks the first installed family of [`FONT_FAMILIES`], then any sans-serif
    /// face, then whatever face is installed
    ///
    /// # Errors
    /// * `Msg` - no usable font is installed
    pub fn system() -> Result<Self> {
        let mut db = Database::new();
        db.load_system_fonts();
        Self::pick(db)
    }

    /// Uses the font file contents as the only face
    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        let mut db = Database::new();
        db.load_font_data(data);
        Self::pick(db)
    }

    fn pick(db: Database) -> Result<Self> {
        let mut families: Vec<Family> = FONT_FAMILIES.iter().map(|&name| Family::Name(name)).collect();
        families.push(Family::SansSerif);
        let id = db
            .query(&Query {
                families: &families,
                weight: Weight::BOLD,
                stretch: Stretch::Normal,
                style: Style::Normal,
            })
            .or_else(|| db.faces().next().map(|face| face.id))
            .ok_or_else(|| Error::Msg("no font available to draw the letters".to_string()))?;
        if let Some(face) = db.face(id) {
            debug!("Avatar font : {:?}", face.families.first().map(|(name, _)| name));
        }
        Ok(Self { db, id })
    }

    /// Outline of the text centered on `(center_x, center_y)`
    fn outline(
        &self,
        text: &str,
        font_size: f32,
        center_x: f32,
        center_y: f32,
    ) -> Result<Option<tiny_skia::Path>> {
        self.db
            .with_face_data(self.id, |data, index| -> Result<Option<tiny_skia::Path>> {
                let face = Face::parse(data, index)
                    .map_err(|e| Error::Msg(format!("unable to read font. Cause : {}", e)))?;
                let scale = font_size / face.units_per_em() as f32;
                let glyphs: Vec<GlyphId> = text
                    .chars()
                    .map(|c| face.glyph_index(c).unwrap_or(GlyphId(0)))
                    .collect();
                let advance: f32 = glyphs
                    .iter()
                    .map(|glyph| face.glyph_hor_advance(*glyph).unwrap_or(0) as f32 * scale)
                    .sum();

                // Middle of the em box on the center line
                let baseline = center_y + (face.ascender() as f32 + face.descender() as f32) * scale / 2.0;
                let mut builder = GlyphPath::new(scale, center_x - advance / 2.0, baseline);
                for glyph in glyphs {
                    face.outline_glyph(glyph, &mut builder);
                    builder.origin_x += face.glyph_hor_advance(glyph).unwrap_or(0) as f32 * scale;
                }
                Ok(builder.finish())
            })
            .unwrap_or_else(|| Err(Error::Msg("font data is not available".to_string())))
    }
}

/// Draws the letters and returns the PNG bytes
pub fn generate(letters: &str, options: &AvatarOptions, font: &LetterFont) -> Result<Vec<u8>> {
    options.validate()?;
    let size = options.size;
    let mut pixmap = Pixmap::new(size, size)
        .ok_or_else(|| invalid(format!("cannot draw a {}x{} image", size, size)))?;

    let (r, g, b) = options.background.to_rgb8();
    let alpha = (options.background.alpha() * 255.0).round() as u8;
    pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, alpha));

    let center = size as f32 / 2.0;
    if let Some(path) = font.outline(letters, options.font_size as f32, center, center)? {
        let mut paint = Paint::default();
        paint.set_color(tiny_skia::Color::WHITE);
        paint.anti_alias = true;
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    let image = RgbaImage::from_fn(size, size, |x, y| {
        let color = pixmap.pixels()[(y * size + x) as usize].demultiply();
        Rgba([color.red(), color.green(), color.blue(), color.alpha()])
    });
    RasterCanvas::new(DynamicImage::ImageRgba8(image))
        .shape(options.shape())
        .export(ExportFormat::Png)
}

/// Converts font units to pixels, flipping the y axis around the baseline
struct GlyphPath {
    builder: tiny_skia::PathBuilder,
    scale: f32,
    origin_x: f32,
    baseline: f32,
}

impl GlyphPath {
    fn new(scale: f32, origin_x: f32, baseline: f32) -> Self {
        Self {
            builder: tiny_skia::PathBuilder::new(),
            scale,
            origin_x,
            baseline,
        }
    }

    fn x(&self, x: f32) -> f32 {
        self.origin_x + x * self.scale
    }

    fn y(&self, y: f32) -> f32 {
        self.baseline - y * self.scale
    }

    fn finish(self) -> Option<tiny_skia::Path> {
        self.builder.finish()
    }
}

impl OutlineBuilder for GlyphPath {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(self.x(x), self.y(y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(self.x(x), self.y(y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(self.x(x1), self.y(y1), self.x(x), self.y(y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder
            .cubic_to(self.x(x1), self.y(y1), self.x(x2), self.y(y2), self.x(x), self.y(y));
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
