//! Scrolling text banner.
//!
//! Text is held as grapheme clusters so a rotation never splits a combined
//! character. Each advance moves the first cluster to the end.

use unicode_segmentation::UnicodeSegmentation;

/// A rotating line of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Marquee {
    graphemes: Vec<String>,
    offset: usize,
}

impl Marquee {
    /// Create a marquee showing `text` from its start.
    pub fn new(text: &str) -> Self {
        Self {
            graphemes: split(text),
            offset: 0,
        }
    }

    /// Replace the text, keeping the scroll position modulo the new length.
    pub fn set_text(&mut self, text: &str) {
        self.graphemes = split(text);
        self.offset = if self.graphemes.is_empty() {
            0
        } else {
            self.offset % self.graphemes.len()
        };
    }

    /// Rotate by one grapheme.
    pub fn advance(&mut self) {
        if !self.graphemes.is_empty() {
            self.offset = (self.offset + 1) % self.graphemes.len();
        }
    }

    /// Whether there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.graphemes.is_empty()
    }

    /// Current rotation.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Unrotated text.
    pub fn text(&self) -> String {
        self.graphemes.concat()
    }

    /// Text as currently rotated.
    pub fn visible(&self) -> String {
        let (head, tail) = self.graphemes.split_at(self.offset);
        let mut out = tail.concat();
        out.push_str(&head.concat());
        out
    }
}

fn split(text: &str) -> Vec<String> {
    text.graphemes(true).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation() {
        let mut marquee = Marquee::new("abc");
        assert_eq!(marquee.visible(), "abc");
        marquee.advance();
        assert_eq!(marquee.visible(), "bca");
        marquee.advance();
        marquee.advance();
        assert_eq!(marquee.visible(), "abc");
        assert_eq!(marquee.text(), "abc");
    }

    #[test]
    fn test_set_text_keeps_position() {
        let mut marquee = Marquee::new("abcdef");
        for _ in 0..4 {
            marquee.advance();
        }
        marquee.set_text("xyz");
        assert_eq!(marquee.offset(), 1);
        assert_eq!(marquee.visible(), "yzx");
    }

    #[test]
    fn test_empty_text() {
        let mut marquee = Marquee::new("");
        marquee.advance();
        assert!(marquee.is_empty());
        assert_eq!(marquee.visible(), "");

        marquee.set_text("hi");
        assert_eq!(marquee.visible(), "hi");
    }

    #[test]
    fn test_graphemes_stay_whole() {
        let mut marquee = Marquee::new("e\u{301}x");
        marquee.advance();
        assert_eq!(marquee.visible(), "xe\u{301}");
    }
}
