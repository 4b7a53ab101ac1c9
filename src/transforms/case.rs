//! Case conversions over arbitrary Unicode text.
//!
//! All functions work on code points (never bytes) and use the
//! locale-independent Unicode case mappings from the standard library.

use once_cell::sync::Lazy;
use regex::Regex;

static SENTENCE_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^\s*\w|[.!?]\s*\w)").expect("valid sentence regex"));

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

pub fn upper(text: &str) -> String {
    text.to_uppercase()
}

pub fn lower(text: &str) -> String {
    text.to_lowercase()
}

/// Capitalizes the first character of every whitespace-delimited token and
/// lowercases the rest. Whitespace is preserved as is.
///
/// ```
/// use toolshed::transforms::case::title;
///
/// assert_eq!(title("the quick brown fox"), "The Quick Brown Fox");
/// assert_eq!(title("HELLO  wORLD"), "Hello  World");
/// ```
pub fn title(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut at_token_start = true;
    for c in text.chars() {
        if c.is_whitespace() {
            result.push(c);
            at_token_start = true;
        } else if at_token_start {
            result.extend(c.to_uppercase());
            at_token_start = false;
        } else {
            result.extend(c.to_lowercase());
        }
    }
    result
}

/// Lowercases the text and uppercases the first word character of the text
/// and the first word character after each `.`, `!` or `?`.
///
/// With consecutive punctuation (`wait... what`) only the last mark is
/// followed by the word, so the result is `Wait... What`.
pub fn sentence(text: &str) -> String {
    let lowered = text.to_lowercase();
    SENTENCE_START
        .replace_all(&lowered, |caps: &regex::Captures| caps[0].to_uppercase())
        .into_owned()
}

pub fn reverse(text: &str) -> String {
    text.chars().rev().collect()
}

/// Lowercases even positions and uppercases odd ones. Every code point,
/// letter or not, counts towards the parity.
pub fn alternating(text: &str) -> String {
    text.chars()
        .enumerate()
        .fold(String::with_capacity(text.len()), |mut acc, (i, c)| {
            if i % 2 == 0 {
                acc.extend(c.to_lowercase());
            } else {
                acc.extend(c.to_uppercase());
            }
            acc
        })
}

pub fn inverse(text: &str) -> String {
    text.chars()
        .fold(String::with_capacity(text.len()), |mut acc, c| {
            if c.is_uppercase() {
                acc.extend(c.to_lowercase());
            } else if c.is_lowercase() {
                acc.extend(c.to_uppercase());
            } else {
                acc.push(c);
            }
            acc
        })
}

/// Joins the alphanumeric runs of the lowercased text, capitalizing every
/// run after the first. Leading separators never capitalize the first run.
///
/// ```
/// use toolshed::transforms::case::camel;
///
/// assert_eq!(camel("Hello big-world"), "helloBigWorld");
/// assert_eq!(camel("  __first_name"), "firstName");
/// ```
pub fn camel(text: &str) -> String {
    join_words(text, false)
}

pub fn pascal(text: &str) -> String {
    join_words(text, true)
}

pub fn kebab(text: &str) -> String {
    separated(text, '-', |c| c == '-' || c == '_')
}

pub fn snake(text: &str) -> String {
    separated(text, '_', |c| c == '_')
}

fn join_words(text: &str, capitalize_first: bool) -> String {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .enumerate()
        .map(|(i, word)| {
            if i == 0 && !capitalize_first {
                word.to_string()
            } else {
                capitalize(word)
            }
        })
        .collect()
}

/// Lowercases, replaces whitespace runs by the separator and drops every
/// character outside `[a-z0-9]` that is not accepted by `keep`.
fn separated<F>(text: &str, separator: char, keep: F) -> String
where
    F: Fn(char) -> bool,
{
    let lowered = text.to_lowercase();
    WHITESPACE_RUN
        .replace_all(&lowered, separator.to_string().as_str())
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || keep(*c))
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
