//! Whitespace and layout clean-ups applied to whole text buffers.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r\n|\n|\r").expect("valid line break regex"));

/// Collapses every whitespace run into a single space and trims both ends
pub fn remove_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn remove_line_breaks(text: &str) -> String {
    LINE_BREAK.replace_all(text, " ").into_owned()
}

/// Keeps the first occurrence of every space separated token
pub fn remove_duplicates(text: &str) -> String {
    let mut seen = HashSet::new();
    text.split(' ')
        .filter(|token| seen.insert(*token))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn trim_lines(text: &str) -> String {
    text.split('\n')
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join("\n")
}
