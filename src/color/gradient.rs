use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::Color;
use crate::constants::gradient::{DEFAULT_ANGLE, MAX_STOPS, MIN_STOPS};
use crate::error::{invalid, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    #[strum(serialize = "linear")]
    Linear,
    #[strum(serialize = "radial")]
    Radial,
}

impl FromStr for GradientKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(GradientKind::Linear),
            "radial" => Ok(GradientKind::Radial),
            _ => Err(invalid(format!("unknown gradient type \"{}\"", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ColorStop {
    pub color: String,
    /// Percentage along the gradient line
    pub position: u8,
}

impl ColorStop {
    pub fn new<S: Into<String>>(color: S, position: u8) -> Self {
        Self {
            color: color.into(),
            position,
        }
    }
}

/// Parses `COLOR` or `COLOR:POSITION`
impl FromStr for ColorStop {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (color, position) = match s.rsplit_once(':') {
            Some((color, position)) => {
                let position = position
                    .trim()
                    .trim_end_matches('%')
                    .parse::<u8>()
                    .map_err(|_| invalid(format!("invalid color stop position in \"{}\"", s)))?;
                (color, Some(position))
            }
            None => (s, None),
        };
        color.parse::<Color>()?;
        Ok(ColorStop {
            color: color.trim().to_string(),
            position: position.unwrap_or(0),
        })
    }
}

/// A CSS gradient definition, serialized the same way as the exported
/// gradient configuration files
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    pub gradient_type: GradientKind,
    #[serde(default = "default_angle")]
    pub angle: u16,
    pub color_stops: Vec<ColorStop>,
}

fn default_angle() -> u16 {
    DEFAULT_ANGLE
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            gradient_type: GradientKind::Linear,
            angle: DEFAULT_ANGLE,
            color_stops: vec![ColorStop::new("#3b82f6", 0), ColorStop::new("#8b5cf6", 100)],
        }
    }
}

impl Gradient {
    /// Builds a gradient from colors spread evenly between 0% and 100%
    pub fn evenly_spaced(kind: GradientKind, angle: u16, colors: &[&str]) -> Result<Self> {
        let last = colors.len().saturating_sub(1).max(1);
        let gradient = Gradient {
            gradient_type: kind,
            angle,
            color_stops: colors
                .iter()
                .enumerate()
                .map(|(i, color)| ColorStop::new(color.trim(), (i * 100 / last) as u8))
                .collect(),
        };
        gradient.validate()?;
        Ok(gradient)
    }

    pub fn validate(&self) -> Result<()> {
        if self.color_stops.len() < MIN_STOPS {
            return Err(invalid(format!("minimum {} color stops required", MIN_STOPS)));
        }
        if self.color_stops.len() > MAX_STOPS {
            return Err(invalid(format!("maximum {} color stops allowed", MAX_STOPS)));
        }
        if self.angle > 360 {
            return Err(invalid(format!("angle must be between 0 and 360, got {}", self.angle)));
        }
        for stop in &self.color_stops {
            if stop.position > 100 {
                return Err(invalid(format!(
                    "color stop position must be between 0 and 100, got {}",
                    stop.position
                )));
            }
            stop.color.parse::<Color>()?;
        }
        Ok(())
    }

    /// Appends a white stop 10% after the last one
    pub fn add_stop(&mut self) -> Result<()> {
        if self.color_stops.len() >= MAX_STOPS {
            return Err(invalid(format!("maximum {} color stops allowed", MAX_STOPS)));
        }
        let position = self
            .color_stops
            .last()
            .map_or(0, |stop| stop.position.saturating_add(10).min(100));
        self.color_stops.push(ColorStop::new("#ffffff", position));
        Ok(())
    }

    pub fn remove_stop(&mut self, index: usize) -> Result<()> {
        if self.color_stops.len() <= MIN_STOPS {
            return Err(invalid(format!("minimum {} color stops required", MIN_STOPS)));
        }
        if index >= self.color_stops.len() {
            return Err(invalid(format!("no color stop at index {}", index)));
        }
        self.color_stops.remove(index);
        Ok(())
    }

    /// The CSS value, e.g. `linear-gradient(90deg, #3b82f6 0%, #8b5cf6 100%)`
    pub fn css_value(&self) -> String {
        let stops = self
            .color_stops
            .iter()
            .map(|stop| format!("{} {}%", stop.color, stop.position))
            .collect::<Vec<_>>()
            .join(", ");
        match self.gradient_type {
            GradientKind::Linear => format!("linear-gradient({}deg, {})", self.angle, stops),
            GradientKind::Radial => format!("radial-gradient(circle, {})", stops),
        }
    }

    /// The CSS declaration, e.g. `background: linear-gradient(...);`
    pub fn css_code(&self) -> String {
        format!("background: {};", self.css_value())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let gradient: Gradient = serde_json::from_str(json)?;
        gradient.validate()?;
        Ok(gradient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_linear_gradient() {
        let gradient = Gradient::default();
        assert_eq!(
            gradient.css_value(),
            "linear-gradient(90deg, #3b82f6 0%, #8b5cf6 100%)"
        );
        assert_eq!(
            gradient.css_code(),
            "background: linear-gradient(90deg, #3b82f6 0%, #8b5cf6 100%);"
        );
    }

    #[test]
    fn test_radial_gradient() {
        let gradient =
            Gradient::evenly_spaced(GradientKind::Radial, 0, &["red", "white", "blue"]).unwrap();
        assert_eq!(
            gradient.css_value(),
            "radial-gradient(circle, red 0%, white 50%, blue 100%)"
        );
    }

    #[test]
    fn test_stop_limits() {
        assert!(Gradient::evenly_spaced(GradientKind::Linear, 90, &["red"]).is_err());

        let mut gradient = Gradient::default();
        assert!(gradient.remove_stop(0).is_err());
        for _ in 0..6 {
            gradient.add_stop().unwrap();
        }
        assert_eq!(gradient.color_stops.len(), MAX_STOPS);
        assert_eq!(gradient.color_stops.last().unwrap().position, 100);
        assert!(gradient.add_stop().is_err());
        gradient.remove_stop(2).unwrap();
        assert_eq!(gradient.color_stops.len(), MAX_STOPS - 1);
    }

    #[test]
    fn test_config_round_trip() {
        let json = r##"{"gradientType":"radial","colorStops":[{"color":"#fff","position":0},{"color":"#000","position":100}]}"##;
        let gradient = Gradient::from_json(json).unwrap();
        assert_eq!(gradient.gradient_type, GradientKind::Radial);
        assert_eq!(gradient.angle, DEFAULT_ANGLE);
        assert_eq!(Gradient::from_json(&gradient.to_json().unwrap()).unwrap(), gradient);

        assert!(matches!(
            Gradient::from_json(r#"{"angle": 45}"#),
            Err(Error::InvalidJson(_))
        ));
    }

    #[test]
    fn test_parse_color_stop() {
        assert_eq!("red:25".parse::<ColorStop>().unwrap(), ColorStop::new("red", 25));
        assert_eq!("#abc".parse::<ColorStop>().unwrap(), ColorStop::new("#abc", 0));
        assert!("nope:10".parse::<ColorStop>().is_err());
        assert!("red:x".parse::<ColorStop>().is_err());
    }
}
