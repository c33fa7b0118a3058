//! In-memory drivers: an emulated screen and a scripted keyboard.
//!
//! [`MemoryScreen`] feeds everything written to it through a `vt100`
//! emulator, so callers can inspect exactly what a real terminal would show.
//! [`ScriptedKeyboard`] replays a fixed sequence of keys and lines.

use super::{Key, Keyboard, Screen};
use std::collections::VecDeque;
use std::io;

/// A screen that records output into a VT100 emulator.
pub struct MemoryScreen {
    parser: vt100::Parser,
    bytes_written: u64,
    writes: u64,
    clears: u64,
}

impl MemoryScreen {
    /// Create an emulated screen of `rows` x `cols`.
    pub fn new(rows: u16, cols: u16) -> Self {
        Self {
            parser: vt100::Parser::new(rows, cols, 0),
            bytes_written: 0,
            writes: 0,
            clears: 0,
        }
    }

    /// Text of row `y` as currently displayed, trailing spaces kept.
    pub fn row(&self, y: u16) -> String {
        let screen = self.parser.screen();
        let (_, cols) = screen.size();
        let mut row = String::with_capacity(cols as usize);
        for x in 0..cols {
            match screen.cell(y, x) {
                Some(cell) if cell.is_wide_continuation() => {}
                Some(cell) if cell.has_contents() => row.push_str(&cell.contents()),
                _ => row.push(' '),
            }
        }
        row
    }

    /// Whole screen contents, one line per row, trailing spaces trimmed.
    pub fn contents(&self) -> String {
        self.parser.screen().contents()
    }

    /// Cursor position as (row, col).
    pub fn cursor(&self) -> (u16, u16) {
        self.parser.screen().cursor_position()
    }

    /// Number of `write_raw` calls so far.
    pub const fn write_count(&self) -> u64 {
        self.writes
    }

    /// Total bytes written so far.
    pub const fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Number of `clear_screen` calls so far.
    pub const fn clear_count(&self) -> u64 {
        self.clears
    }
}

impl Screen for MemoryScreen {
    fn set_cursor(&mut self, x: u16, y: u16) -> io::Result<()> {
        let seq = format!("\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1);
        self.parser.process(seq.as_bytes());
        Ok(())
    }

    fn write_raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.parser.process(bytes);
        self.writes += 1;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        self.parser.process(b"\x1b[2J\x1b[H");
        self.clears += 1;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for MemoryScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryScreen")
            .field("size", &self.parser.screen().size())
            .field("writes", &self.writes)
            .finish_non_exhaustive()
    }
}

/// One scripted input step.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Key(Key),
    Line(String),
    Idle,
}

/// A keyboard that replays a script and then reports end of input.
///
/// In key mode an exhausted script returns `UnexpectedEof` so a loop that
/// forgot its `exit` fails instead of spinning.
#[derive(Debug, Default)]
pub struct ScriptedKeyboard {
    script: VecDeque<Step>,
}

impl ScriptedKeyboard {
    /// Create an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a single key.
    #[must_use]
    pub fn key(mut self, key: Key) -> Self {
        self.script.push_back(Step::Key(key));
        self
    }

    /// Queue the keystrokes of `text` followed by Enter.
    #[must_use]
    pub fn typed(mut self, text: &str) -> Self {
        self.script
            .extend(text.chars().map(|c| Step::Key(Key::Char(c))));
        self.script.push_back(Step::Key(Key::Enter));
        self
    }

    /// Queue a whole line for line mode.
    #[must_use]
    pub fn line(mut self, text: &str) -> Self {
        self.script.push_back(Step::Line(text.to_string()));
        self
    }

    /// Queue `polls` empty key polls.
    #[must_use]
    pub fn idle(mut self, polls: usize) -> Self {
        self.script.extend(std::iter::repeat_n(Step::Idle, polls));
        self
    }

    /// Steps not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Keyboard for ScriptedKeyboard {
    fn read_key_nonblocking(&mut self) -> io::Result<Option<Key>> {
        match self.script.pop_front() {
            Some(Step::Key(key)) => Ok(Some(key)),
            Some(Step::Idle | Step::Line(_)) => Ok(None),
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "keyboard script exhausted",
            )),
        }
    }

    fn read_line_blocking(&mut self) -> io::Result<Option<String>> {
        loop {
            match self.script.pop_front() {
                Some(Step::Line(line)) => return Ok(Some(line)),
                Some(Step::Key(_) | Step::Idle) => {}
                None => return Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_screen_positions_text() {
        let mut screen = MemoryScreen::new(4, 10);
        screen.set_cursor(2, 1).unwrap();
        screen.write_raw(b"hi").unwrap();
        assert_eq!(screen.row(1), "  hi      ");
        assert_eq!(screen.cursor(), (1, 4));
        assert_eq!(screen.write_count(), 1);
        assert_eq!(screen.bytes_written(), 2);
    }

    #[test]
    fn test_memory_screen_clear() {
        let mut screen = MemoryScreen::new(2, 5);
        screen.write_raw(b"abc").unwrap();
        screen.clear_screen().unwrap();
        assert_eq!(screen.contents().trim(), "");
        assert_eq!(screen.clear_count(), 1);
    }

    #[test]
    fn test_scripted_keys() {
        let mut keyboard = ScriptedKeyboard::new().idle(1).typed("ok");
        assert_eq!(keyboard.read_key_nonblocking().unwrap(), None);
        assert_eq!(keyboard.read_key_nonblocking().unwrap(), Some(Key::Char('o')));
        assert_eq!(keyboard.read_key_nonblocking().unwrap(), Some(Key::Char('k')));
        assert_eq!(keyboard.read_key_nonblocking().unwrap(), Some(Key::Enter));
        let err = keyboard.read_key_nonblocking().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_scripted_lines() {
        let mut keyboard = ScriptedKeyboard::new().line("help").line("exit");
        assert_eq!(keyboard.read_line_blocking().unwrap().as_deref(), Some("help"));
        assert_eq!(keyboard.read_line_blocking().unwrap().as_deref(), Some("exit"));
        assert_eq!(keyboard.read_line_blocking().unwrap(), None);
    }
}
