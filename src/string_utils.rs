use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

/// Counters displayed next to every text buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TextStats {
    /// Unicode code points
    pub characters: usize,
    /// User perceived characters
    pub graphemes: usize,
    pub words: usize,
    pub lines: usize,
}

impl TextStats {
    /// Computes the statistics of the given text.
    ///
    /// Words are whitespace separated tokens. Blank text has no lines.
    ///
    /// # Examples
    ///
    /// ```
    /// use toolshed::string_utils::TextStats;
    ///
    /// let stats = TextStats::of("hello world\nbye");
    /// assert_eq!(stats.words, 3);
    /// assert_eq!(stats.lines, 2);
    /// ```
    pub fn of(text: &str) -> Self {
        let blank = text.trim().is_empty();
        TextStats {
            characters: text.chars().count(),
            graphemes: text.graphemes(true).count(),
            words: text.split_whitespace().count(),
            lines: if blank { 0 } else { text.split('\n').count() },
        }
    }
}

/// Returns true if the given text has no visible content
pub fn is_visually_empty(text: &str) -> bool {
    text.trim().is_empty()
}

/// Truncates the text to a maximum number of graphemes appending an ellipsis
pub fn ellipsize(text: &str, max: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= max {
        return text.to_string();
    }
    let mut result: String = graphemes[..max.saturating_sub(1)].concat();
    result.push('…');
    result
}
