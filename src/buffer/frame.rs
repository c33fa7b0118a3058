//! `FrameBuffer`: A fixed grid of cells holding one rendered frame.
//!
//! The buffer uses contiguous memory allocation for cache efficiency.
//! Cells are stored in row-major order.

use super::cell::{Cell, Layer};
use unicode_width::UnicodeWidthChar;

/// A fixed-size grid of cells representing one frame of the scene.
///
/// Access is in row-major order: `index = y * width + x`. Writes outside
/// the grid are dropped, never wrapped.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    /// Contiguous cell storage (row-major order).
    cells: Vec<Cell>,
    /// Width in columns.
    width: u16,
    /// Height in rows.
    height: u16,
}

impl FrameBuffer {
    /// Create a new frame with the given dimensions, filled with blanks.
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(width > 0 && height > 0, "Frame dimensions must be non-zero");
        let size = (width as usize) * (height as usize);
        Self {
            cells: vec![Cell::BLANK; size],
            width,
            height,
        }
    }

    /// Get the frame width.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the frame height.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Get the total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the frame is empty (never true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get a reference to the underlying cell slice.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Convert (x, y) coordinates to a linear index.
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn index_of(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y as usize) * (self.width as usize) + (x as usize))
        } else {
            None
        }
    }

    /// Signed variant of [`index_of`](Self::index_of) used by scene drawing,
    /// where positions can run off either edge.
    #[inline]
    fn signed_index(&self, x: i32, y: i32) -> Option<usize> {
        let x = u16::try_from(x).ok()?;
        let y = u16::try_from(y).ok()?;
        self.index_of(x, y)
    }

    /// Get a reference to a cell at (x, y).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    /// Set a cell at (x, y).
    ///
    /// Returns `false` if coordinates are out of bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        self.put(i32::from(x), i32::from(y), cell)
    }

    /// Set a cell at signed coordinates, dropping it if off-grid.
    ///
    /// Overwriting either half of a double-width character blanks the other
    /// half so a row always emits exactly `width` columns.
    pub fn put(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        let Some(idx) = self.signed_index(x, y) else {
            return false;
        };

        let old = self.cells[idx];
        if old.is_continuation() {
            if let Some(left) = self.signed_index(x - 1, y) {
                self.cells[left] = Cell::BLANK;
            }
        } else if old.display_width() == 2 {
            if let Some(right) = self.signed_index(x + 1, y) {
                self.cells[right] = Cell::BLANK;
            }
        }

        self.cells[idx] = cell;
        true
    }

    /// Write a character at signed coordinates, handling display width.
    ///
    /// Control characters become spaces, zero-width characters are skipped,
    /// and a double-width character also claims the cell to its right (or is
    /// replaced by a space when it would straddle the right edge).
    ///
    /// Returns the number of columns the caller should advance.
    pub fn put_char(&mut self, x: i32, y: i32, ch: char, layer: Layer) -> usize {
        if ch.is_control() {
            self.put(x, y, Cell::new(' ', layer));
            return 1;
        }
        match ch.width() {
            None => {
                self.put(x, y, Cell::new(' ', layer));
                1
            }
            Some(0) => 0,
            Some(2) => {
                let fits = self.signed_index(x + 1, y).is_some();
                if fits {
                    self.put(x, y, Cell::new(ch, layer));
                    self.put(x + 1, y, Cell::continuation(layer));
                } else {
                    self.put(x, y, Cell::new(' ', layer));
                }
                2
            }
            Some(w) => {
                self.put(x, y, Cell::new(ch, layer));
                w
            }
        }
    }

    /// Fill every cell with `cell`.
    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Clear the entire frame (fill with blank cells).
    pub fn clear(&mut self) {
        self.fill(Cell::BLANK);
    }

    /// Get an iterator over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width as usize)
    }

    /// The visible text of row `y`, continuation cells omitted.
    pub fn row_text(&self, y: u16) -> Option<String> {
        if y >= self.height {
            return None;
        }
        let start = (y as usize) * (self.width as usize);
        let row = &self.cells[start..start + self.width as usize];
        Some(
            row.iter()
                .filter(|cell| !cell.is_continuation())
                .map(Cell::ch)
                .collect(),
        )
    }

    /// Count the cells carrying any of the given layer tags.
    pub fn count_layer(&self, layer: Layer) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.layer().intersects(layer))
            .count()
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
