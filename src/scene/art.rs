//! Art templates: the static rows an entity is drawn from.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use unicode_width::UnicodeWidthStr;

/// An immutable block of ASCII art.
///
/// Rows are stored as characters; the width is the widest row's display
/// width. Trailing blank rows are dropped, leading and inner ones kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Art {
    rows: Vec<Vec<char>>,
    width: usize,
}

impl Art {
    /// The boat that ships with the engine.
    pub const BOAT: &'static str = concat!(
        "    __|__ |___| |\\\n",
        "    |o__| |___| | \\\n",
        "    |___| |___| |o \\\n",
        "   _|___| |___| |__o\\\n",
        "  /...\\_____|___|____\\_/\n",
        "  \\   o * o * * o o  /\n",
    );

    /// Parse art from text. Returns `None` if no row has visible content.
    pub fn parse(source: &str) -> Option<Self> {
        let mut lines: Vec<&str> = source
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .collect();
        while lines.last().is_some_and(|line| line.trim().is_empty()) {
            lines.pop();
        }
        if lines.is_empty() {
            return None;
        }

        let width = lines.iter().map(|line| line.width()).max().unwrap_or(0);
        let rows = lines.iter().map(|line| line.chars().collect()).collect();
        Some(Self { rows, width })
    }

    /// Load art from a file.
    ///
    /// A file that cannot be opened is [`Error::MissingAsset`]; one with no
    /// visible content is [`Error::EmptyAsset`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| Error::MissingAsset {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source).ok_or_else(|| Error::EmptyAsset {
            path: path.to_path_buf(),
        })
    }

    /// The built-in boat.
    pub fn boat() -> Self {
        // BOAT is non-empty, so parsing always yields art
        Self::parse(Self::BOAT).unwrap_or_else(|| Self {
            rows: vec![vec!['#']],
            width: 1,
        })
    }

    /// Rows of the art, top to bottom.
    pub fn rows(&self) -> &[Vec<char>] {
        &self.rows
    }

    /// Display width of the widest row.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }
}
