//! Crossterm driver: a real terminal on stdin/stdout.

use super::{Key, Keyboard, Screen};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, queue,
    terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, BufRead, Stdout, Write};
use std::time::Duration;

/// Screen backed by the process's stdout.
pub struct CrosstermScreen {
    out: Stdout,
}

impl CrosstermScreen {
    /// Wrap stdout.
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl Screen for CrosstermScreen {
    fn set_cursor(&mut self, x: u16, y: u16) -> io::Result<()> {
        queue!(self.out, cursor::MoveTo(x, y))
    }

    fn write_raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.write_all(bytes)
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Keyboard backed by crossterm's event queue (keys) or stdin (lines).
#[derive(Debug, Default)]
pub struct CrosstermKeyboard;

impl CrosstermKeyboard {
    /// Create a keyboard reader.
    pub const fn new() -> Self {
        Self
    }

    /// Convert a crossterm key event to our Key.
    fn convert_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Key> {
        Some(match code {
            KeyCode::Char('c' | 'd') if modifiers.contains(KeyModifiers::CONTROL) => {
                Key::Interrupt
            }
            KeyCode::Char(_) if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                return None;
            }
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Esc => Key::Esc,
            _ => return None, // Ignore other key codes
        })
    }
}

impl Keyboard for CrosstermKeyboard {
    fn read_key_nonblocking(&mut self) -> io::Result<Option<Key>> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key_event) = event::read()? {
                // Only process key press events (not release or repeat)
                if key_event.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(key) = Self::convert_key(key_event.code, key_event.modifiers) {
                    return Ok(Some(key));
                }
            }
        }
        Ok(None)
    }

    fn read_line_blocking(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Puts the terminal into raw mode on an alternate screen and restores it
/// on drop.
pub struct TerminalGuard {
    alternate_screen: bool,
}

impl TerminalGuard {
    /// Enter raw mode, optionally switching to the alternate screen.
    pub fn enter(alternate_screen: bool) -> io::Result<Self> {
        terminal::enable_raw_mode()?;

        let mut stdout = io::stdout();
        if alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        execute!(stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;

        Ok(Self { alternate_screen })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Restore terminal state
        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show);
        if self.alternate_screen {
            let _ = execute!(stdout, LeaveAlternateScreen);
        }
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_key() {
        let none = KeyModifiers::NONE;
        assert_eq!(CrosstermKeyboard::convert_key(KeyCode::Char('a'), none), Some(Key::Char('a')));
        assert_eq!(CrosstermKeyboard::convert_key(KeyCode::Enter, none), Some(Key::Enter));
        assert_eq!(CrosstermKeyboard::convert_key(KeyCode::Backspace, none), Some(Key::Backspace));
        assert_eq!(
            CrosstermKeyboard::convert_key(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Some(Key::Interrupt)
        );
        assert_eq!(CrosstermKeyboard::convert_key(KeyCode::Char('x'), KeyModifiers::ALT), None);
        assert_eq!(CrosstermKeyboard::convert_key(KeyCode::Left, none), None);
    }

    #[test]
    fn test_convert_key_shifted_char() {
        assert_eq!(
            CrosstermKeyboard::convert_key(KeyCode::Char('A'), KeyModifiers::SHIFT),
            Some(Key::Char('A'))
        );
    }
}
