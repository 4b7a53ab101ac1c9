use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};
use strum_macros::Display;

use crate::collaborators::FileAccess;
use crate::constants::limits::MAX_IMAGE_BYTES;
use crate::error::*;

pub const DEFAULT_CORNER_RADIUS: u32 = 20;
pub const DEFAULT_JPEG_QUALITY: u8 = 90;
/// Share of the image width covered by an aspect crop
const ASPECT_CROP_COVERAGE: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Shape {
    #[strum(serialize = "square")]
    Square,
    #[strum(serialize = "circle")]
    Circle,
    #[strum(serialize = "rounded")]
    Rounded(u32),
}

impl FromStr for Shape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "square" => Ok(Shape::Square),
            "circle" => Ok(Shape::Circle),
            "rounded" => Ok(Shape::Rounded(DEFAULT_CORNER_RADIUS)),
            _ => Err(invalid(format!("unknown shape \"{}\"", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    /// Quality from 1 to 100
    Jpeg(u8),
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg(_) => "jpg",
        }
    }

    /// Parses `png`, `jpeg` or `jpg` using the given quality for JPEG
    pub fn parse(format: &str, quality: u8) -> Result<Self> {
        match format.to_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpeg" | "jpg" => {
                if !(1..=100).contains(&quality) {
                    return Err(invalid(format!("quality must be between 1 and 100, got {}", quality)));
                }
                Ok(ExportFormat::Jpeg(quality))
            }
            _ => Err(invalid(format!("unsupported image format \"{}\"", format))),
        }
    }
}

/// A rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    /// Largest centered region with the given aspect ratio whose width covers
    /// 90% of the image, shrunk to fit the image height when needed
    pub fn centered(image_width: u32, image_height: u32, aspect: f64) -> CropRegion {
        let mut width = image_width as f64 * ASPECT_CROP_COVERAGE;
        let mut height = width / aspect;
        if height > image_height as f64 {
            height = image_height as f64;
            width = height * aspect;
        }
        let width = (width as u32).clamp(1, image_width.max(1));
        let height = (height as u32).clamp(1, image_height.max(1));
        CropRegion {
            x: (image_width - width) / 2,
            y: (image_height - height) / 2,
            width,
            height,
        }
    }
}

/// Size of the largest box with the original aspect ratio fitting inside
/// `width` x `height`
pub fn fit_dimensions(original: (u32, u32), width: u32, height: u32) -> (u32, u32) {
    let ratio = original.0 as f64 / original.1 as f64;
    if width as f64 / height as f64 > ratio {
        (((height as f64 * ratio) as u32).max(1), height)
    } else {
        (width, ((width as f64 / ratio) as u32).max(1))
    }
}

/// Raster image operations backing the crop, resize and shape tools
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    image: DynamicImage,
}

impl RasterCanvas {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Decodes an encoded image, detecting its format
    ///
    /// # Errors
    /// * `FileTooLarge` - the data exceeds 10MB
    /// * `ImageError` - the data is not a supported image
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() as u64 > MAX_IMAGE_BYTES {
            return Err(Error::FileTooLarge {
                file: "image".to_string(),
                size: bytes.len() as u64,
                limit: MAX_IMAGE_BYTES,
            });
        }
        Ok(Self::new(image::load_from_memory(bytes)?))
    }

    pub fn load(files: &dyn FileAccess, path: &Path) -> Result<Self> {
        let bytes = files.read_bytes(path, MAX_IMAGE_BYTES)?;
        Self::decode(&bytes)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn crop(&self, region: CropRegion) -> Result<Self> {
        let (width, height) = self.dimensions();
        let fits = region.width > 0
            && region.height > 0
            && region.x as u64 + region.width as u64 <= width as u64
            && region.y as u64 + region.height as u64 <= height as u64;
        if !fits {
            return Err(invalid(format!(
                "crop region {}x{}+{}+{} is outside the {}x{} image",
                region.width, region.height, region.x, region.y, width, height
            )));
        }
        Ok(Self::new(self.image.crop_imm(
            region.x,
            region.y,
            region.width,
            region.height,
        )))
    }

    /// Crops the centered region with the given aspect ratio, the image's own
    /// ratio being used when none is given
    pub fn crop_to_aspect(&self, aspect: Option<f64>) -> Result<Self> {
        let (width, height) = self.dimensions();
        let aspect = aspect.unwrap_or(width as f64 / height as f64);
        if !aspect.is_finite() || aspect <= 0.0 {
            return Err(invalid(format!("invalid aspect ratio {}", aspect)));
        }
        self.crop(CropRegion::centered(width, height, aspect))
    }

    pub fn resize(&self, width: u32, height: u32, keep_aspect: bool) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(invalid("width and height must be greater than zero"));
        }
        let (width, height) = if keep_aspect {
            fit_dimensions(self.dimensions(), width, height)
        } else {
            (width, height)
        };
        Ok(Self::new(self.image.resize_exact(width, height, FilterType::Triangle)))
    }

    /// Makes every pixel outside the shape fully transparent
    pub fn shape(&self, shape: Shape) -> Self {
        let mut rgba: RgbaImage = self.image.to_rgba8();
        let (width, height) = rgba.dimensions();
        let mask = ShapeMask::new(shape, width, height);
        for (x, y, pixel) in rgba.enumerate_pixels_mut() {
            if !mask.contains(x, y) {
                *pixel = Rgba([0, 0, 0, 0]);
            }
        }
        Self::new(DynamicImage::ImageRgba8(rgba))
    }

    pub fn export(&self, format: ExportFormat) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        match format {
            ExportFormat::Png => {
                self.image
                    .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
            }
            ExportFormat::Jpeg(quality) => {
                // JPEG has no alpha channel
                let rgb = self.image.to_rgb8();
                JpegEncoder::new_with_quality(&mut bytes, quality).encode_image(&rgb)?;
            }
        }
        Ok(bytes)
    }
}

struct ShapeMask {
    shape: Shape,
    width: f64,
    height: f64,
}

impl ShapeMask {
    fn new(shape: Shape, width: u32, height: u32) -> Self {
        Self {
            shape,
            width: width as f64,
            height: height as f64,
        }
    }

    fn contains(&self, x: u32, y: u32) -> bool {
        let (px, py) = (x as f64 + 0.5, y as f64 + 0.5);
        match self.shape {
            Shape::Square => true,
            Shape::Circle => {
                let radius = self.width.min(self.height) / 2.0;
                let (dx, dy) = (px - self.width / 2.0, py - self.height / 2.0);
                dx * dx + dy * dy <= radius * radius
            }
            Shape::Rounded(radius) => {
                let r = (radius as f64).min(self.width.min(self.height) / 2.0);
                // Distance to the nearest corner circle center, zero on the straight edges
                let cx = px.clamp(r, self.width - r);
                let cy = py.clamp(r, self.height - r);
                let (dx, dy) = (px - cx, py - cy);
                dx * dx + dy * dy <= r * r
            }
        }
    }
}

pub fn resized_filename(width: u32, height: u32, format: ExportFormat) -> String {
    format!("resized-image-{}x{}.{}", width, height, format.extension())
}

pub fn shaped_filename(shape: Shape) -> String {
    format!("shaped-image-{}.png", shape)
}

/// `16:9` becomes `cropped-16-9.jpg`
pub fn cropped_filename(ratio_label: &str) -> String {
    format!("cropped-{}.jpg", ratio_label.replace([':', '/', ' '], "-"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::MemoryFileAccess;

    fn canvas(width: u32, height: u32) -> RasterCanvas {
        RasterCanvas::new(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([255, 0, 0, 255]),
        )))
    }

    fn alpha_at(canvas: &RasterCanvas, x: u32, y: u32) -> u8 {
        canvas.image().get_pixel(x, y).0[3]
    }

    #[test]
    fn test_centered_region() {
        assert_eq!(
            CropRegion::centered(200, 100, 1.0),
            CropRegion { x: 50, y: 0, width: 100, height: 100 }
        );
        assert_eq!(
            CropRegion::centered(100, 200, 1.0),
            CropRegion { x: 5, y: 55, width: 90, height: 90 }
        );
    }

    #[test]
    fn test_crop() {
        let image = canvas(40, 30);
        let cropped = image
            .crop(CropRegion { x: 10, y: 5, width: 20, height: 10 })
            .unwrap();
        assert_eq!(cropped.dimensions(), (20, 10));
        assert!(image
            .crop(CropRegion { x: 30, y: 0, width: 20, height: 10 })
            .is_err());
        assert_eq!(image.crop_to_aspect(Some(1.0)).unwrap().dimensions(), (30, 30));
        assert_eq!(image.crop_to_aspect(None).unwrap().dimensions(), (36, 27));
    }

    #[test]
    fn test_resize() {
        let image = canvas(200, 100);
        assert_eq!(image.resize(100, 100, true).unwrap().dimensions(), (100, 50));
        assert_eq!(image.resize(300, 50, true).unwrap().dimensions(), (100, 50));
        assert_eq!(image.resize(30, 70, false).unwrap().dimensions(), (30, 70));
        assert!(image.resize(0, 10, false).is_err());
    }

    #[test]
    fn test_circle_shape() {
        let shaped = canvas(40, 40).shape(Shape::Circle);
        assert_eq!(alpha_at(&shaped, 0, 0), 0);
        assert_eq!(alpha_at(&shaped, 20, 20), 255);
        assert_eq!(alpha_at(&shaped, 20, 0), 255);
    }

    #[test]
    fn test_rounded_shape() {
        let shaped = canvas(100, 60).shape(Shape::Rounded(20));
        assert_eq!(alpha_at(&shaped, 0, 0), 0);
        assert_eq!(alpha_at(&shaped, 99, 59), 0);
        assert_eq!(alpha_at(&shaped, 50, 0), 255);
        assert_eq!(alpha_at(&shaped, 0, 30), 255);
        assert_eq!(alpha_at(&canvas(10, 10).shape(Shape::Square), 0, 0), 255);
    }

    #[test]
    fn test_export_and_decode() {
        let image = canvas(8, 6);
        let png = image.export(ExportFormat::Png).unwrap();
        assert_eq!(&png[1..4], b"PNG");
        assert_eq!(RasterCanvas::decode(&png).unwrap().dimensions(), (8, 6));

        let jpeg = image.export(ExportFormat::parse("jpg", 85).unwrap()).unwrap();
        assert_eq!(&jpeg[0..2], &[0xff, 0xd8]);
        assert!(ExportFormat::parse("jpeg", 0).is_err());
        assert!(ExportFormat::parse("bmp", 80).is_err());
    }

    #[test]
    fn test_load_limits() {
        let files = MemoryFileAccess::new().with_file("broken.png", b"not an image".to_vec());
        assert!(matches!(
            RasterCanvas::load(&files, Path::new("broken.png")),
            Err(Error::ImageError(_))
        ));
        assert!(matches!(
            RasterCanvas::load(&files, Path::new("missing.png")),
            Err(Error::FileReadError { .. })
        ));
    }

    #[test]
    fn test_filenames() {
        assert_eq!(resized_filename(800, 600, ExportFormat::Jpeg(85)), "resized-image-800x600.jpg");
        assert_eq!(shaped_filename(Shape::Rounded(20)), "shaped-image-rounded.png");
        assert_eq!(cropped_filename("16:9"), "cropped-16-9.jpg");
    }
}
