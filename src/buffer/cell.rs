//! Cell: The atomic unit of a rendered frame.
//!
//! A cell is one character plus a set of [`Layer`] tags recording which part
//! of the scene produced it. The tags never reach the terminal; they exist so
//! the compositor's output can be inspected without pattern-matching glyphs.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │  Cell Layout (8 bytes)       │
//! ├─────────────┬───────┬────────┤
//! │  ch         │ layer │ pad    │
//! │  char (u32) │  u8   │ [u8;3] │
//! └─────────────┴───────┴────────┘
//! ```

use bitflags::bitflags;
use unicode_width::UnicodeWidthChar;

bitflags! {
    /// Scene layers a cell can belong to.
    ///
    /// An empty set means background.
    ///
    /// # Example
    /// ```
    /// use marquee::Layer;
    /// let tags = Layer::ENTITY | Layer::EFFECT;
    /// assert!(tags.contains(Layer::EFFECT));
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
    pub struct Layer: u8 {
        /// Part of an animated entity's art (including its padding).
        const ENTITY = 0b0000_0001;
        /// Part of the wave band.
        const WAVE = 0b0000_0010;
        /// A transient glyph: impact marker, scorch, turbulence or splash.
        const EFFECT = 0b0000_0100;
        /// Part of the scrolling text banner.
        const BANNER = 0b0000_1000;
        /// Right half of a double-width character; emits nothing.
        const CONTINUATION = 0b1000_0000;
    }
}

/// A single character cell of a frame.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    ch: char,
    layer: Layer,
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

impl Cell {
    /// Background cell (space, no layer).
    pub const BLANK: Self = Self {
        ch: ' ',
        layer: Layer::empty(),
    };

    /// Create a cell holding `ch` on the given layer.
    #[inline]
    pub const fn new(ch: char, layer: Layer) -> Self {
        Self { ch, layer }
    }

    /// Create the placeholder that follows a double-width character.
    #[inline]
    pub const fn continuation(layer: Layer) -> Self {
        Self {
            ch: ' ',
            layer: layer.union(Layer::CONTINUATION),
        }
    }

    /// The character stored in this cell.
    #[inline]
    pub const fn ch(&self) -> char {
        self.ch
    }

    /// The layer tags of this cell.
    #[inline]
    pub const fn layer(&self) -> Layer {
        self.layer
    }

    /// Whether this cell is the right half of a wide character.
    #[inline]
    pub const fn is_continuation(&self) -> bool {
        self.layer.contains(Layer::CONTINUATION)
    }

    /// Whether this cell is untouched background.
    #[inline]
    pub fn is_blank(&self) -> bool {
        *self == Self::BLANK
    }

    /// Columns this cell's character occupies on screen.
    ///
    /// Control characters count as one column because frames sanitize
    /// them to spaces before they are stored.
    #[inline]
    pub fn display_width(&self) -> usize {
        if self.is_continuation() {
            0
        } else {
            self.ch.width().unwrap_or(1)
        }
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.layer.is_empty() {
            write!(f, "Cell({:?})", self.ch)
        } else {
            write!(f, "Cell({:?}, {:?})", self.ch, self.layer)
        }
    }
}
