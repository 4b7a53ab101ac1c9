use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::constants::lorem::{OPENER, PARAGRAPHS, SENTENCES, WORDS};
use crate::error::{invalid, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoremUnit {
    #[strum(serialize = "words")]
    Words,
    #[strum(serialize = "sentences")]
    Sentences,
    #[strum(serialize = "paragraphs")]
    Paragraphs,
}

impl LoremUnit {
    /// Inclusive bounds accepted for the number of units
    pub fn bounds(&self) -> (usize, usize) {
        match self {
            LoremUnit::Words => (1, 1000),
            LoremUnit::Sentences => (1, 50),
            LoremUnit::Paragraphs => (1, 20),
        }
    }

    pub fn clamp(&self, count: usize) -> usize {
        let (min, max) = self.bounds();
        num::clamp(count, min, max)
    }
}

impl FromStr for LoremUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "words" | "word" => Ok(LoremUnit::Words),
            "sentences" | "sentence" => Ok(LoremUnit::Sentences),
            "paragraphs" | "paragraph" => Ok(LoremUnit::Paragraphs),
            _ => Err(invalid(format!("unknown lorem unit \"{}\"", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoremOptions {
    pub start_with_lorem: bool,
    pub html_tags: bool,
}

impl Default for LoremOptions {
    fn default() -> Self {
        Self {
            start_with_lorem: true,
            html_tags: false,
        }
    }
}

/// Generates placeholder text using the thread local random generator
///
/// # Examples
///
/// ```
/// use toolshed::generators::lorem::{generate, LoremOptions, LoremUnit};
///
/// let text = generate(LoremUnit::Words, 5, LoremOptions::default());
/// assert_eq!(text.split(' ').count(), 5);
/// ```
pub fn generate(unit: LoremUnit, count: usize, options: LoremOptions) -> String {
    generate_with(&mut rand::thread_rng(), unit, count, options)
}

/// Generates placeholder text sampling uniformly, with replacement, from the corpus.
///
/// `count` is clamped to the unit bounds. Clearing `start_with_lorem` removes
/// "lorem" from the words and the "Lorem ipsum " opener from the first
/// sentence and paragraph.
pub fn generate_with<R: Rng + ?Sized>(
    rng: &mut R,
    unit: LoremUnit,
    count: usize,
    options: LoremOptions,
) -> String {
    let count = unit.clamp(count);
    match unit {
        LoremUnit::Words => {
            let corpus: &[&str] = if options.start_with_lorem {
                &WORDS
            } else {
                &WORDS[1..]
            };
            (0..count)
                .map(|_| *pick(rng, corpus))
                .collect::<Vec<_>>()
                .join(" ")
        }
        LoremUnit::Sentences => sample_items(rng, &SENTENCES, count, options).join(" "),
        LoremUnit::Paragraphs => {
            let paragraphs = sample_items(rng, &PARAGRAPHS, count, options);
            if options.html_tags {
                paragraphs
                    .iter()
                    .map(|p| format!("<p>{}</p>", p))
                    .collect::<Vec<_>>()
                    .join("\n")
            } else {
                paragraphs.join("\n\n")
            }
        }
    }
}

/// Suggested file name when saving generated text
pub fn download_name(unit: LoremUnit, count: usize) -> String {
    format!("lorem-ipsum-{}-{}.txt", unit, unit.clamp(count))
}

fn sample_items<R: Rng + ?Sized>(
    rng: &mut R,
    items: &[&str],
    count: usize,
    options: LoremOptions,
) -> Vec<String> {
    let mut corpus: Vec<String> = items.iter().map(|s| s.to_string()).collect();
    if !options.start_with_lorem {
        corpus[0] = corpus[0].replacen(OPENER, "", 1);
    }
    (0..count).map(|_| pick(rng, &corpus).clone()).collect()
}

/// `items` must not be empty
fn pick<'a, R: Rng + ?Sized, T>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_word_count() {
        for count in [1, 2, 5, 37] {
            let text = generate(LoremUnit::Words, count, LoremOptions::default());
            assert_eq!(text.split(' ').count(), count);
        }
    }

    #[test]
    fn test_counts_are_clamped() {
        let text = generate(LoremUnit::Words, 0, LoremOptions::default());
        assert_eq!(text.split(' ').count(), 1);
        let text = generate(LoremUnit::Words, 5000, LoremOptions::default());
        assert_eq!(text.split(' ').count(), 1000);
        let text = generate(LoremUnit::Paragraphs, 99, LoremOptions::default());
        assert_eq!(text.split("\n\n").count(), 20);
    }

    #[test]
    fn test_lorem_words_are_sampled() {
        let mut rng = StdRng::seed_from_u64(7);
        let text = generate_with(&mut rng, LoremUnit::Words, 500, LoremOptions::default());
        let words: Vec<&str> = text.split(' ').collect();
        assert!(words.iter().all(|w| WORDS.contains(w)));
        assert!(words.contains(&"lorem"));
    }

    #[test]
    fn test_without_lorem_opener() {
        let options = LoremOptions {
            start_with_lorem: false,
            html_tags: false,
        };
        let mut rng = StdRng::seed_from_u64(42);
        let words = generate_with(&mut rng, LoremUnit::Words, 300, options);
        assert!(words.split(' ').all(|w| w != "lorem"));
        assert!(words.split(' ').all(|w| WORDS[1..].contains(&w)));

        let sentences = generate_with(&mut rng, LoremUnit::Sentences, 50, options);
        assert!(!sentences.contains("Lorem ipsum"));
    }

    #[test]
    fn test_html_paragraphs() {
        let options = LoremOptions {
            start_with_lorem: true,
            html_tags: true,
        };
        let text = generate(LoremUnit::Paragraphs, 3, options);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.starts_with("<p>") && l.ends_with("</p>")));
    }

    #[test]
    fn test_download_name() {
        assert_eq!(download_name(LoremUnit::Sentences, 4), "lorem-ipsum-sentences-4.txt");
        assert_eq!("Paragraphs".parse::<LoremUnit>().unwrap(), LoremUnit::Paragraphs);
    }
}
