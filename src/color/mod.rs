//! Color parsing and conversion between the usual CSS notations.
//!
//! Output strings follow the conventions of the CSS color tooling found on
//! the web: lowercase hex, integer channels, percentages rounded to integers
//! and the alpha channel rounded to two decimals.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::color::HISTORY_SIZE;
use crate::error::{invalid, Error, Result};

pub mod gradient;
mod names;

pub use gradient::{ColorStop, Gradient, GradientKind};
pub use names::NAMED_COLORS;

static HEX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new("^#?([0-9a-f]{3,4}|[0-9a-f]{6}|[0-9a-f]{8})$").unwrap());

static FUNCTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new("^(rgba?|hsla?|hsva?)\\s*\\(\\s*([^)]*?)\\s*\\)$").unwrap()
});

static ARGUMENT_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new("[\\s,/]+").unwrap());

/// An sRGB color with floating point channels in `0..=255` and alpha in `0..=1`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    r: f64,
    g: f64,
    b: f64,
    a: f64,
}

impl Color {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: bound_alpha(a),
        }
    }

    /// Builds a color from hue (degrees), saturation and lightness (`0..=1`)
    pub fn from_hsl(h: f64, s: f64, l: f64, a: f64) -> Self {
        let (h, s, l) = (h.rem_euclid(360.0) / 360.0, s.clamp(0.0, 1.0), l.clamp(0.0, 1.0));
        let (r, g, b) = if s == 0.0 {
            (l, l, l)
        } else {
            let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
            let p = 2.0 * l - q;
            (
                hue_to_rgb(p, q, h + 1.0 / 3.0),
                hue_to_rgb(p, q, h),
                hue_to_rgb(p, q, h - 1.0 / 3.0),
            )
        };
        Color {
            r: r * 255.0,
            g: g * 255.0,
            b: b * 255.0,
            a: bound_alpha(a),
        }
    }

    /// Builds a color from hue (degrees), saturation and value (`0..=1`)
    pub fn from_hsv(h: f64, s: f64, v: f64, a: f64) -> Self {
        let (h, s, v) = (h.rem_euclid(360.0) / 60.0, s.clamp(0.0, 1.0), v.clamp(0.0, 1.0));
        let sector = h.floor();
        let f = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - f * s);
        let t = v * (1.0 - (1.0 - f) * s);
        let (r, g, b) = match sector as u8 % 6 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Color {
            r: r * 255.0,
            g: g * 255.0,
            b: b * 255.0,
            a: bound_alpha(a),
        }
    }

    pub fn random() -> Self {
        Self::random_with(&mut rand::thread_rng())
    }

    pub fn random_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::rgb(rng.gen(), rng.gen(), rng.gen())
    }

    pub fn alpha(&self) -> f64 {
        self.a
    }

    /// Channels rounded to integers
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        (channel(self.r), channel(self.g), channel(self.b))
    }

    /// Hue in degrees `0..360`, saturation and lightness in `0..=1`
    pub fn to_hsl(&self) -> (f64, f64, f64) {
        let (r, g, b) = (self.r / 255.0, self.g / 255.0, self.b / 255.0);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        if max == min {
            return (0.0, 0.0, l);
        }
        let d = max - min;
        let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        (hue(r, g, b, max, d), s, l)
    }

    /// Hue in degrees `0..360`, saturation and value in `0..=1`
    pub fn to_hsv(&self) -> (f64, f64, f64) {
        let (r, g, b) = (self.r / 255.0, self.g / 255.0, self.b / 255.0);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let d = max - min;
        let s = if max == 0.0 { 0.0 } else { d / max };
        let h = if d == 0.0 { 0.0 } else { hue(r, g, b, max, d) };
        (h, s, max)
    }

    /// `#rrggbb`
    pub fn to_hex_string(&self) -> String {
        let (r, g, b) = self.to_rgb8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// `#rrggbbaa`
    pub fn to_hex8_string(&self) -> String {
        let alpha = js_round(self.a * 255.0) as u8;
        format!("{}{:02x}", self.to_hex_string(), alpha)
    }

    /// `rgb(59, 130, 246)` or `rgba(59, 130, 246, 0.5)`
    pub fn to_rgb_string(&self) -> String {
        let (r, g, b) = self.to_rgb8();
        if self.a == 1.0 {
            format!("rgb({}, {}, {})", r, g, b)
        } else {
            format!("rgba({}, {}, {}, {})", r, g, b, self.rounded_alpha())
        }
    }

    /// `hsl(217, 91%, 60%)` or `hsla(217, 91%, 60%, 0.5)`
    pub fn to_hsl_string(&self) -> String {
        let (h, s, l) = self.to_hsl();
        self.functional("hsl", h, s, l)
    }

    /// `hsv(217, 76%, 96%)` or `hsva(217, 76%, 96%, 0.5)`
    pub fn to_hsv_string(&self) -> String {
        let (h, s, v) = self.to_hsv();
        self.functional("hsv", h, s, v)
    }

    /// The CSS name of the color, if it has one. Translucent colors have no name.
    pub fn name(&self) -> Option<&'static str> {
        if self.a == 0.0 {
            return Some("transparent");
        }
        if self.a < 1.0 {
            return None;
        }
        let (r, g, b) = self.to_rgb8();
        names::name_of(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub fn convert(&self) -> ConvertedColors {
        ConvertedColors {
            hex: self.to_hex_string(),
            hex8: self.to_hex8_string(),
            rgb: self.to_rgb_string(),
            hsl: self.to_hsl_string(),
            hsv: self.to_hsv_string(),
            name: self.name().map(|n| n.to_string()),
        }
    }

    fn rounded_alpha(&self) -> f64 {
        js_round(self.a * 100.0) / 100.0
    }

    fn functional(&self, prefix: &str, h: f64, s: f64, x: f64) -> String {
        let (h, s, x) = (js_round(h), js_round(s * 100.0), js_round(x * 100.0));
        if self.a == 1.0 {
            format!("{}({}, {}%, {}%)", prefix, h, s, x)
        } else {
            format!("{}a({}, {}%, {}%, {})", prefix, h, s, x, self.rounded_alpha())
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_string())
    }
}

/// Parses hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`), `rgb()`/`rgba()`,
/// `hsl()`/`hsla()`, `hsv()`/`hsva()` and CSS color names
impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let input = s.trim().to_lowercase();
        let error = || invalid(format!("invalid color \"{}\"", s.trim()));

        if input == "transparent" {
            return Ok(Color::rgba(0, 0, 0, 0.0));
        }
        if let Some(value) = names::lookup(&input) {
            return Ok(Color::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8));
        }
        if let Some(groups) = HEX_REGEX.captures(&input) {
            return parse_hex(&groups[1]).ok_or_else(error);
        }
        if let Some(groups) = FUNCTION_REGEX.captures(&input) {
            let args: Vec<&str> = ARGUMENT_SEPARATOR
                .split(&groups[2])
                .filter(|a| !a.is_empty())
                .collect();
            return parse_function(&groups[1], &args).ok_or_else(error);
        }
        Err(error())
    }
}

/// Every representation of a color shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedColors {
    pub hex: String,
    pub hex8: String,
    pub rgb: String,
    pub hsl: String,
    pub hsv: String,
    pub name: Option<String>,
}

impl ConvertedColors {
    /// Suggested file name when saving the conversion as JSON
    pub fn download_name(&self) -> String {
        format!("color-{}.json", self.hex.trim_start_matches('#'))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub colors: ConvertedColors,
    pub timestamp: DateTime<Utc>,
}

/// Recently converted colors, newest first, without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorHistory {
    entries: VecDeque<HistoryEntry>,
}

impl ColorHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a conversion unless a color with the same hex is already present.
    /// Returns whether the entry was added.
    pub fn record(&mut self, colors: ConvertedColors, timestamp: DateTime<Utc>) -> bool {
        if self.entries.iter().any(|e| e.colors.hex == colors.hex) {
            return false;
        }
        self.entries.push_front(HistoryEntry { colors, timestamp });
        self.entries.truncate(HISTORY_SIZE);
        true
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn parse_hex(digits: &str) -> Option<Color> {
    let expanded: String = match digits.len() {
        3 | 4 => digits.chars().flat_map(|c| [c, c]).collect(),
        _ => digits.to_string(),
    };
    let byte = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    let alpha = match expanded.len() {
        8 => byte(6)? as f64 / 255.0,
        _ => 1.0,
    };
    Some(Color::rgba(byte(0)?, byte(2)?, byte(4)?, alpha))
}

fn parse_function(name: &str, args: &[&str]) -> Option<Color> {
    let (first, second, third, alpha) = match args {
        [a, b, c] => (*a, *b, *c, 1.0),
        [a, b, c, d] => (*a, *b, *c, parse_alpha(d)),
        _ => return None,
    };
    match name.trim_end_matches('a') {
        "rgb" => Some(Color {
            r: parse_channel(first)?,
            g: parse_channel(second)?,
            b: parse_channel(third)?,
            a: alpha,
        }),
        "hsl" => Some(Color::from_hsl(
            parse_number(first)?,
            parse_fraction(second)?,
            parse_fraction(third)?,
            alpha,
        )),
        "hsv" => Some(Color::from_hsv(
            parse_number(first)?,
            parse_fraction(second)?,
            parse_fraction(third)?,
            alpha,
        )),
        _ => None,
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim_end_matches("deg").parse::<f64>().ok().filter(|n| n.is_finite())
}

/// `0..=255`, or a percentage of it
fn parse_channel(value: &str) -> Option<f64> {
    let channel = match value.strip_suffix('%') {
        Some(percent) => parse_number(percent)? * 255.0 / 100.0,
        None => parse_number(value)?,
    };
    Some(channel.clamp(0.0, 255.0))
}

/// A percentage, or a plain number read as a fraction when at most 1
fn parse_fraction(value: &str) -> Option<f64> {
    let fraction = match value.strip_suffix('%') {
        Some(percent) => parse_number(percent)? / 100.0,
        None => {
            let n = parse_number(value)?;
            if n <= 1.0 {
                n
            } else {
                n / 100.0
            }
        }
    };
    Some(fraction.clamp(0.0, 1.0))
}

fn parse_alpha(value: &str) -> f64 {
    let alpha = match value.strip_suffix('%') {
        Some(percent) => parse_number(percent).map(|p| p / 100.0),
        None => parse_number(value),
    };
    bound_alpha(alpha.unwrap_or(1.0))
}

/// Out of range alpha values mean fully opaque
fn bound_alpha(a: f64) -> f64 {
    if (0.0..=1.0).contains(&a) {
        a
    } else {
        1.0
    }
}

fn hue(r: f64, g: f64, b: f64, max: f64, d: f64) -> f64 {
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    h * 60.0
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Rounds half up, like `Math.round`
fn js_round(x: f64) -> f64 {
    (x + 0.5).floor()
}

fn channel(x: f64) -> u8 {
    js_round(x).clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn parse(s: &str) -> Color {
        s.parse().unwrap()
    }

    #[test]
    fn test_hex_conversions() {
        let colors = parse("#3b82f6").convert();
        assert_eq!(colors.hex, "#3b82f6");
        assert_eq!(colors.hex8, "#3b82f6ff");
        assert_eq!(colors.rgb, "rgb(59, 130, 246)");
        assert_eq!(colors.hsl, "hsl(217, 91%, 60%)");
        assert_eq!(colors.hsv, "hsv(217, 76%, 96%)");
        assert_eq!(colors.name, None);
        assert_eq!(colors.download_name(), "color-3b82f6.json");
    }

    #[test]
    fn test_short_hex_and_alpha() {
        assert_eq!(parse("#f00").to_hex_string(), "#ff0000");
        assert_eq!(parse("F00").to_hex_string(), "#ff0000");
        let translucent = parse("#ff000080");
        assert_eq!(translucent.to_rgb_string(), "rgba(255, 0, 0, 0.5)");
        assert_eq!(translucent.to_hex8_string(), "#ff000080");
        assert_eq!(translucent.name(), None);
    }

    #[test]
    fn test_functional_notations() {
        assert_eq!(parse("rgb(255, 165, 0)").to_hex_string(), "#ffa500");
        assert_eq!(parse("rgba(0 0 255 / 0.25)").to_rgb_string(), "rgba(0, 0, 255, 0.25)");
        assert_eq!(parse("hsl(0, 100%, 50%)").to_hex_string(), "#ff0000");
        assert_eq!(parse("hsl(120, 100%, 25%)").to_hex_string(), "#008000");
        assert_eq!(parse("hsv(240, 100%, 100%)").to_hex_string(), "#0000ff");
        assert_eq!(parse("hsla(0, 0%, 100%, 0.5)").to_hsl_string(), "hsla(0, 0%, 100%, 0.5)");
    }

    #[test]
    fn test_names() {
        assert_eq!(parse("red").name(), Some("red"));
        assert_eq!(parse("RebeccaPurple").to_hex_string(), "#663399");
        assert_eq!(parse("#00ffff").name(), Some("cyan"));
        assert_eq!(parse("#808080").name(), Some("grey"));
        assert_eq!(parse("transparent").name(), Some("transparent"));
    }

    #[test]
    fn test_invalid_colors() {
        for input in ["", "#12", "#gggggg", "rgb(1, 2)", "hsl(a, b, c)", "not a color"] {
            assert!(
                matches!(input.parse::<Color>(), Err(Error::ValidationError(_))),
                "{}",
                input
            );
        }
    }

    #[test]
    fn test_round_trip_through_hsl() {
        for hex in ["#3b82f6", "#8b5cf6", "#000000", "#ffffff", "#123456"] {
            let color = parse(hex);
            let (h, s, l) = color.to_hsl();
            assert_eq!(Color::from_hsl(h, s, l, 1.0).to_hex_string(), hex);
            let (h, s, v) = color.to_hsv();
            assert_eq!(Color::from_hsv(h, s, v, 1.0).to_hex_string(), hex);
        }
    }

    #[test]
    fn test_history_is_deduplicated_and_bounded() {
        let mut history = ColorHistory::new();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert!(history.record(parse("red").convert(), now));
        assert!(!history.record(parse("#f00").convert(), now));
        for i in 0..12u8 {
            history.record(Color::rgb(i, i, i).convert(), now);
        }
        assert_eq!(history.len(), HISTORY_SIZE);
        assert_eq!(history.entries().next().unwrap().colors.hex, "#0b0b0b");
    }
}
