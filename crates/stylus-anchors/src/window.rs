//! Word windows around an error offset

use unicode_segmentation::UnicodeSegmentation;

/// The region of text searched for anchors
///
/// Covers `radius` words on either side of the word containing the error,
/// shrinking near the start and end of the text. Punctuation between the
/// boundary words and their neighbours is included.
#[derive(Debug, Clone)]
pub struct ContextWindow<'a> {
    text: &'a str,
    words: Vec<(usize, usize)>,
    error_word: usize,
    error_offset: usize,
    start: usize,
    end: usize,
}

impl<'a> ContextWindow<'a> {
    /// Build the window around a byte offset (clamped to the text)
    pub fn around(text: &'a str, error_offset: usize, radius: usize) -> Self {
        let mut error_offset = error_offset.min(text.len());
        while !text.is_char_boundary(error_offset) {
            error_offset -= 1;
        }
        let words: Vec<(usize, usize)> = text
            .unicode_word_indices()
            .map(|(start, word)| (start, start + word.len()))
            .collect();

        if words.is_empty() {
            return Self {
                text,
                words,
                error_word: 0,
                error_offset,
                start: 0,
                end: text.len(),
            };
        }

        let last = words.len() - 1;
        let error_word = words
            .iter()
            .position(|&(_, end)| end > error_offset)
            .unwrap_or(last);
        let lo = error_word.saturating_sub(radius);
        let hi = (error_word + radius).min(last);
        let start = if lo == 0 { 0 } else { words[lo - 1].1 };
        let end = if hi == last { text.len() } else { words[hi + 1].0 };

        Self {
            text,
            words,
            error_word,
            error_offset,
            start,
            end,
        }
    }

    /// Window text
    pub fn as_str(&self) -> &'a str {
        &self.text[self.start..self.end]
    }

    /// Byte offset of the window within the full text
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset one past the window end
    pub fn end(&self) -> usize {
        self.end
    }

    /// Clamped error offset
    pub fn error_offset(&self) -> usize {
        self.error_offset
    }

    /// Number of words in the window
    pub fn word_count(&self) -> usize {
        self.words
            .iter()
            .filter(|&&(s, e)| s >= self.start && e <= self.end)
            .count()
    }

    /// Distance in words between the error word and the word containing `offset`
    pub fn distance_to(&self, offset: usize) -> usize {
        if self.words.is_empty() {
            return 0;
        }
        let word = self
            .words
            .iter()
            .position(|&(_, end)| end > offset)
            .unwrap_or(self.words.len() - 1);
        word.abs_diff(self.error_word)
    }

    /// Byte range within `buffer_chars` characters of the error offset
    pub fn exact_range(&self, buffer_chars: usize) -> (usize, usize) {
        if buffer_chars == 0 {
            return (self.error_offset, self.error_offset);
        }
        let before = &self.text[..self.error_offset];
        let lo = before
            .char_indices()
            .rev()
            .nth(buffer_chars - 1)
            .map(|(i, _)| i)
            .unwrap_or(0);
        let after = &self.text[self.error_offset..];
        let hi = after
            .char_indices()
            .nth(buffer_chars)
            .map(|(i, _)| self.error_offset + i)
            .unwrap_or(self.text.len());
        (lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_window_radius() {
        let text = words(40);
        let offset = text.find("w20").unwrap();
        let window = ContextWindow::around(&text, offset, 3);
        assert_eq!(window.as_str().trim(), "w17 w18 w19 w20 w21 w22 w23");
        assert_eq!(window.word_count(), 7);
    }

    #[test]
    fn test_window_shrinks_at_boundaries() {
        let text = words(10);
        let window = ContextWindow::around(&text, 0, 15);
        assert_eq!(window.as_str(), text);
        assert_eq!(window.start(), 0);
        assert_eq!(window.end(), text.len());
    }

    #[test]
    fn test_distance() {
        let text = "alpha beta gamma delta epsilon";
        let window = ContextWindow::around(text, text.find("gamma").unwrap(), 15);
        assert_eq!(window.distance_to(text.find("gamma").unwrap()), 0);
        assert_eq!(window.distance_to(text.find("alpha").unwrap()), 2);
        assert_eq!(window.distance_to(text.find("epsilon").unwrap()), 2);
    }

    #[test]
    fn test_offset_clamped() {
        let text = "short text";
        let window = ContextWindow::around(text, 1_000, 15);
        assert_eq!(window.error_offset(), text.len());
        assert_eq!(window.distance_to(text.len()), 0);
    }

    #[test]
    fn test_empty_text() {
        let window = ContextWindow::around("", 5, 15);
        assert_eq!(window.as_str(), "");
        assert_eq!(window.word_count(), 0);
        assert_eq!(window.distance_to(0), 0);
    }

    #[test]
    fn test_exact_range_respects_char_boundaries() {
        let text = "ééééé target ééééé";
        let offset = text.find("target").unwrap();
        let window = ContextWindow::around(text, offset, 15);
        let (lo, hi) = window.exact_range(3);
        assert!(text.is_char_boundary(lo) && text.is_char_boundary(hi));
        assert_eq!(&text[lo..offset], "éé ");
        assert_eq!(&text[offset..hi], "tar");
        assert_eq!(window.exact_range(0), (offset, offset));
    }
}
