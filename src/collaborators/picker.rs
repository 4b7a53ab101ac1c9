use std::io::{BufRead, Write};

use crate::color::Color;
use crate::error::{invalid, Result};

/// Source of a color chosen by the user
pub trait ColorPicker {
    /// Returns the picked color as a hex string
    fn pick(&mut self) -> Result<String>;
}

/// Asks for a color on a prompt, retrying a few times on invalid input
pub struct PromptColorPicker<R: BufRead, W: Write> {
    input: R,
    output: W,
    attempts: usize,
}

impl<R: BufRead, W: Write> PromptColorPicker<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            attempts: 3,
        }
    }

    pub fn attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts.max(1);
        self
    }
}

impl<R: BufRead, W: Write> ColorPicker for PromptColorPicker<R, W> {
    fn pick(&mut self) -> Result<String> {
        for _ in 0..self.attempts {
            write!(self.output, "Color (hex, rgb(), hsl() or name): ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            match line.trim().parse::<Color>() {
                Ok(color) => return Ok(color.to_hex_string()),
                Err(e) => writeln!(self.output, "{}", e)?,
            }
        }
        Err(invalid("no valid color was picked"))
    }
}

/// Always picks the same color
#[derive(Debug, Clone)]
pub struct FixedColorPicker {
    color: String,
}

impl FixedColorPicker {
    pub fn new<S: Into<String>>(color: S) -> Self {
        Self {
            color: color.into(),
        }
    }
}

impl ColorPicker for FixedColorPicker {
    fn pick(&mut self) -> Result<String> {
        Ok(self.color.parse::<Color>()?.to_hex_string())
    }
}
