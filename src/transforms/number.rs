//! Locale style number formatting.
//!
//! Grouped styles round half away from zero on the shortest decimal
//! representation of the value (`1.005` becomes `1.01` with two decimals), the
//! way `Intl.NumberFormat` does. Scientific notation relies on Rust's
//! exponent formatting, which rounds the exact binary value half to even.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::{Options, Transform};
use crate::constants::number::{CURRENCY_SYMBOL, DEFAULT_DECIMAL_PLACES, MAX_DECIMAL_PLACES};
use crate::error::{invalid, Error, Result};

pub const DECIMAL_PLACES_OPTION: &str = "decimal_places";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberStyle {
    #[strum(serialize = "comma")]
    Comma,
    #[strum(serialize = "indian")]
    Indian,
    #[strum(serialize = "scientific")]
    Scientific,
    #[strum(serialize = "currency")]
    Currency,
}

impl NumberStyle {
    pub const ALL: [NumberStyle; 4] = [
        NumberStyle::Comma,
        NumberStyle::Indian,
        NumberStyle::Scientific,
        NumberStyle::Currency,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            NumberStyle::Comma => "Comma separated (1,234.56)",
            NumberStyle::Indian => "Indian grouping (12,34,567)",
            NumberStyle::Scientific => "Scientific notation (1.23e+3)",
            NumberStyle::Currency => "Currency (USD)",
        }
    }
}

impl FromStr for NumberStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "comma" => Ok(NumberStyle::Comma),
            "indian" => Ok(NumberStyle::Indian),
            "scientific" => Ok(NumberStyle::Scientific),
            "currency" => Ok(NumberStyle::Currency),
            _ => Err(invalid(format!("unknown number style \"{}\"", s))),
        }
    }
}

/// Registry adapter formatting every non-empty line of the input as a number
pub struct NumberFormatter {
    style: NumberStyle,
}

impl NumberFormatter {
    pub fn new(style: NumberStyle) -> Self {
        Self { style }
    }
}

impl Transform for NumberFormatter {
    fn transform(&self, text: &str, options: &Options) -> Result<String> {
        let decimals = options.get_u8(DECIMAL_PLACES_OPTION, DEFAULT_DECIMAL_PLACES)?;
        let lines: Vec<&str> = text
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect();
        if lines.is_empty() {
            return Err(Error::NotANumber(text.to_string()));
        }
        let formatted = lines
            .into_iter()
            .map(|line| parse_number(line).and_then(|n| format_number(n, self.style, decimals)))
            .collect::<Result<Vec<_>>>()?;
        Ok(formatted.join("\n"))
    }
}

/// Parses a finite floating point number, ignoring surrounding whitespace
pub fn parse_number(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(Error::NotANumber(trimmed.to_string())),
    }
}

/// Formats a number using the given style and a fixed number of decimals (0 to 8)
///
/// # Examples
///
/// ```
/// use toolshed::transforms::{format_number, NumberStyle};
///
/// assert_eq!(format_number(1234.5, NumberStyle::Comma, 2).unwrap(), "1,234.50");
/// assert_eq!(format_number(1234567.0, NumberStyle::Indian, 0).unwrap(), "12,34,567");
/// assert_eq!(format_number(1234.5, NumberStyle::Scientific, 2).unwrap(), "1.23e+3");
/// ```
pub fn format_number(value: f64, style: NumberStyle, decimals: u8) -> Result<String> {
    if decimals > MAX_DECIMAL_PLACES {
        return Err(invalid(format!(
            "decimal places must be between 0 and {}, got {}",
            MAX_DECIMAL_PLACES, decimals
        )));
    }
    if !value.is_finite() {
        return Err(Error::NotANumber(value.to_string()));
    }

    if style == NumberStyle::Scientific {
        return Ok(scientific(value, decimals));
    }

    let (integer, fraction) = round_half_away(value.abs(), decimals as usize);
    let is_zero = integer.bytes().chain(fraction.bytes()).all(|b| b == b'0');
    let negative = value < 0.0 && !is_zero;

    let grouped = match style {
        NumberStyle::Indian => group_indian(&integer),
        _ => group_thousands(&integer),
    };

    let mut result = String::new();
    if negative {
        result.push('-');
    }
    if style == NumberStyle::Currency {
        result.push_str(CURRENCY_SYMBOL);
    }
    result.push_str(&grouped);
    if !fraction.is_empty() {
        result.push('.');
        result.push_str(&fraction);
    }
    Ok(result)
}

/// Renders `value` like JavaScript's `toExponential` (`1.23e+3`)
fn scientific(value: f64, decimals: u8) -> String {
    let raw = format!("{:.*e}", decimals as usize, value);
    match raw.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{}", mantissa, sign, exponent.abs())
        }
        None => raw,
    }
}

/// Rounds a non-negative value to `decimals` digits working on its shortest
/// decimal representation. Returns the integer and fraction digit strings.
fn round_half_away(value: f64, decimals: usize) -> (String, String) {
    let repr = value.to_string();
    let (integer, fraction) = repr.split_once('.').unwrap_or((repr.as_str(), ""));

    if fraction.len() <= decimals {
        return (integer.to_string(), format!("{:0<width$}", fraction, width = decimals));
    }

    let round_up = fraction.as_bytes()[decimals] >= b'5';
    let mut digits: Vec<u8> = integer
        .bytes()
        .chain(fraction[..decimals].bytes())
        .map(|b| b - b'0')
        .collect();

    if round_up {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == 9 {
                *digit = 0;
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, 1);
        }
    }

    let text: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
    let split = text.len() - decimals;
    (text[..split].to_string(), text[split..].to_string())
}

fn group_thousands(integer: &str) -> String {
    let len = integer.len();
    integer
        .chars()
        .enumerate()
        .fold(String::with_capacity(len + len / 3), |mut acc, (i, c)| {
            if i > 0 && (len - i) % 3 == 0 {
                acc.push(',');
            }
            acc.push(c);
            acc
        })
}

/// Groups the last three digits, then every two digits (`12,34,567`)
fn group_indian(integer: &str) -> String {
    if integer.len() <= 3 {
        return integer.to_string();
    }
    let (head, tail) = integer.split_at(integer.len() - 3);
    let head_len = head.len();
    let mut result = head
        .chars()
        .enumerate()
        .fold(String::new(), |mut acc, (i, c)| {
            if i > 0 && (head_len - i) % 2 == 0 {
                acc.push(',');
            }
            acc.push(c);
            acc
        });
    result.push(',');
    result.push_str(tail);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_style() {
        assert_eq!(format_number(1234.5, NumberStyle::Comma, 2).unwrap(), "1,234.50");
        assert_eq!(format_number(0.0, NumberStyle::Comma, 0).unwrap(), "0");
        assert_eq!(format_number(999.999, NumberStyle::Comma, 2).unwrap(), "1,000.00");
        assert_eq!(format_number(-1234567.891, NumberStyle::Comma, 1).unwrap(), "-1,234,567.9");
        assert_eq!(format_number(123.0, NumberStyle::Comma, 0).unwrap(), "123");
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        assert_eq!(format_number(2.5, NumberStyle::Comma, 0).unwrap(), "3");
        assert_eq!(format_number(-2.5, NumberStyle::Comma, 0).unwrap(), "-3");
        assert_eq!(format_number(1.005, NumberStyle::Comma, 2).unwrap(), "1.01");
        assert_eq!(format_number(0.125, NumberStyle::Comma, 2).unwrap(), "0.13");
        assert_eq!(format_number(-0.001, NumberStyle::Comma, 2).unwrap(), "0.00");
    }

    #[test]
    fn test_indian_style() {
        assert_eq!(format_number(1234567.0, NumberStyle::Indian, 0).unwrap(), "12,34,567");
        assert_eq!(format_number(123456789.5, NumberStyle::Indian, 2).unwrap(), "12,34,56,789.50");
        assert_eq!(format_number(1000.0, NumberStyle::Indian, 0).unwrap(), "1,000");
        assert_eq!(format_number(999.0, NumberStyle::Indian, 0).unwrap(), "999");
    }

    #[test]
    fn test_currency_style() {
        assert_eq!(format_number(1234.5, NumberStyle::Currency, 2).unwrap(), "$1,234.50");
        assert_eq!(format_number(-1234.5, NumberStyle::Currency, 2).unwrap(), "-$1,234.50");
    }

    #[test]
    fn test_scientific_style() {
        assert_eq!(format_number(1234.5, NumberStyle::Scientific, 2).unwrap(), "1.23e+3");
        assert_eq!(format_number(0.00012, NumberStyle::Scientific, 1).unwrap(), "1.2e-4");
        assert_eq!(format_number(0.0, NumberStyle::Scientific, 2).unwrap(), "0.00e+0");
    }

    #[test]
    fn test_decimal_places_bounds() {
        assert!(format_number(1.0, NumberStyle::Comma, 8).is_ok());
        assert!(matches!(
            format_number(1.0, NumberStyle::Comma, 9),
            Err(Error::ValidationError(_))
        ));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 42.5 ").unwrap(), 42.5);
        assert!(matches!(parse_number("abc"), Err(Error::NotANumber(_))));
        assert!(matches!(parse_number("inf"), Err(Error::NotANumber(_))));
        assert!(matches!(parse_number("1,234"), Err(Error::NotANumber(_))));
    }

    #[test]
    fn test_formatter_handles_lines() {
        let formatter = NumberFormatter::new(NumberStyle::Comma);
        let options = Options::new().with(DECIMAL_PLACES_OPTION, 0);
        assert_eq!(
            formatter.transform("1000\n\n  2500000 \n", &options).unwrap(),
            "1,000\n2,500,000"
        );
        assert!(matches!(
            formatter.transform("12\nnope", &options),
            Err(Error::NotANumber(_))
        ));
        assert!(matches!(
            formatter.transform("   ", &options),
            Err(Error::NotANumber(_))
        ));
    }
}
