//! `OutputBuffer`: Single-syscall output buffer for ANSI sequences.
//!
//! Everything one tick draws (frame rows, padding rows, the prompt) is
//! accumulated here and handed to the [`Screen`](super::Screen) in a single
//! `write_raw` so the display lock is held for one write only.

use crate::buffer::FrameBuffer;
use std::io::Write;

/// Where each part of the display lives, in terminal rows.
///
/// ```text
/// anchor                 ┐
///   frame rows           │ rewritten every tick
///   padding rows         ┘
/// prompt row             "> typed text"
/// message rows           command output
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    /// Row of the frame's top-left corner.
    pub anchor: u16,
    /// Height of the frame.
    pub frame_rows: u16,
    /// Blank rows written after the frame.
    pub padding_rows: u16,
}

impl ScreenLayout {
    /// Rows of blank padding after each frame.
    pub const DEFAULT_PADDING: u16 = 2;

    /// Layout for a frame of `frame_rows` rows anchored at the top.
    pub const fn new(frame_rows: u16) -> Self {
        Self {
            anchor: 0,
            frame_rows,
            padding_rows: Self::DEFAULT_PADDING,
        }
    }

    /// Row holding the input prompt.
    pub const fn prompt_row(&self) -> u16 {
        self.anchor + self.frame_rows + self.padding_rows
    }

    /// First row of command output.
    pub const fn message_row(&self) -> u16 {
        self.prompt_row() + 1
    }
}

/// Prompt prefix drawn before the typed text.
pub const PROMPT: &str = "> ";

/// Pre-allocated buffer for building ANSI escape sequences.
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer sized for a typical scene (4KB).
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the buffer length.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write a string.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    /// Write a single character.
    #[inline]
    pub fn write_char(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.data
            .extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    }

    /// Move cursor to (x, y) position (1-indexed for ANSI).
    #[inline]
    pub fn cursor_move(&mut self, x: u16, y: u16) {
        // CSI row ; col H
        let _ = write!(self.data, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1);
    }

    /// Hide cursor.
    #[inline]
    pub fn cursor_hide(&mut self) {
        self.data.extend_from_slice(b"\x1b[?25l");
    }

    /// Show cursor.
    #[inline]
    pub fn cursor_show(&mut self) {
        self.data.extend_from_slice(b"\x1b[?25h");
    }

    /// Erase the whole current line.
    #[inline]
    pub fn clear_line(&mut self) {
        self.data.extend_from_slice(b"\x1b[2K");
    }

    /// Erase from the cursor to the end of the screen.
    #[inline]
    pub fn clear_below(&mut self) {
        self.data.extend_from_slice(b"\x1b[J");
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a full redraw of `frame` (no diffing) followed by blank padding
/// rows and the prompt line.
///
/// The bytes assume the cursor was already moved to the layout's anchor;
/// every later row is addressed absolutely.
pub fn encode_frame(frame: &FrameBuffer, layout: &ScreenLayout, prompt: &str, out: &mut OutputBuffer) {
    out.clear();

    // Hide cursor during redraw
    out.cursor_hide();

    for (y, row) in (0u16..).zip(frame.rows()) {
        if y > 0 {
            out.cursor_move(0, layout.anchor + y);
        }
        for cell in row.iter().filter(|cell| !cell.is_continuation()) {
            out.write_char(cell.ch());
        }
    }

    for pad in 0..layout.padding_rows {
        out.cursor_move(0, layout.anchor + layout.frame_rows + pad);
        out.clear_line();
    }

    write_prompt(layout, prompt, out);
    out.cursor_show();
}

/// Encode just the prompt line, leaving the cursor after the typed text.
pub fn encode_prompt(layout: &ScreenLayout, prompt: &str, out: &mut OutputBuffer) {
    out.clear();
    write_prompt(layout, prompt, out);
}

/// Encode command output into the message area, replacing what was there.
pub fn encode_message(layout: &ScreenLayout, message: &str, out: &mut OutputBuffer) {
    out.clear();
    out.cursor_move(0, layout.message_row());
    out.clear_below();
    for (i, line) in message.lines().enumerate() {
        if i > 0 {
            out.write_str("\r\n");
        }
        out.write_str(line);
    }
}

fn write_prompt(layout: &ScreenLayout, prompt: &str, out: &mut OutputBuffer) {
    out.cursor_move(0, layout.prompt_row());
    out.clear_line();
    out.write_str(PROMPT);
    out.write_str(prompt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{Cell, Layer};

    #[test]
    fn test_cursor_move_is_one_indexed() {
        let mut out = OutputBuffer::new();
        out.cursor_move(10, 5);
        assert_eq!(out.as_bytes(), b"\x1b[6;11H");
    }

    #[test]
    fn test_layout_rows() {
        let layout = ScreenLayout::new(14);
        assert_eq!(layout.prompt_row(), 16);
        assert_eq!(layout.message_row(), 17);
    }

    #[test]
    fn test_encode_frame() {
        let mut frame = FrameBuffer::new(3, 2);
        frame.set(0, 0, Cell::new('A', Layer::ENTITY));
        frame.set(1, 0, Cell::new('B', Layer::ENTITY));
        frame.set(2, 1, Cell::new('~', Layer::WAVE));
        let layout = ScreenLayout::new(2);

        let mut out = OutputBuffer::new();
        encode_frame(&frame, &layout, "set_sp", &mut out);

        let text = String::from_utf8_lossy(out.as_bytes());
        assert!(text.starts_with("\x1b[?25lAB \x1b[2;1H  ~"));
        // Padding rows are erased
        assert!(text.contains("\x1b[3;1H\x1b[2K\x1b[4;1H\x1b[2K"));
        // Prompt last, then the cursor comes back
        assert!(text.ends_with("\x1b[5;1H\x1b[2K> set_sp\x1b[?25h"));
    }

    #[test]
    fn test_encode_frame_skips_continuations() {
        let mut frame = FrameBuffer::new(3, 1);
        frame.put_char(0, 0, '日', Layer::BANNER);
        let mut out = OutputBuffer::new();
        encode_frame(&frame, &ScreenLayout::new(1), "", &mut out);
        let text = String::from_utf8_lossy(out.as_bytes());
        assert!(text.contains("日 "));
        assert!(!text.contains("日  "));
    }

    #[test]
    fn test_encode_message_lines() {
        let layout = ScreenLayout::new(2);
        let mut out = OutputBuffer::new();
        encode_message(&layout, "one\ntwo", &mut out);
        assert_eq!(out.as_bytes(), b"\x1b[6;1H\x1b[Jone\r\ntwo");
    }
}
