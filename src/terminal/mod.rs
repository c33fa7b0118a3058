//! Terminal: The narrow driver interface the engine draws and reads through.
//!
//! The engine never touches terminal modes itself. Output goes through a
//! [`Screen`], which the render and input threads share behind one mutex;
//! input comes from a [`Keyboard`], owned by the command thread alone so a
//! blocking read never holds the display lock.
//!
//! Two drivers are provided:
//! - [`CrosstermScreen`] / [`CrosstermKeyboard`]: a real terminal
//! - [`MemoryScreen`] / [`ScriptedKeyboard`]: an emulated screen and a
//!   scripted key source, for tests and headless runs

mod memory;
mod output;
mod tty;

pub use memory::{MemoryScreen, ScriptedKeyboard};
pub use output::{
    encode_frame, encode_message, encode_prompt, OutputBuffer, ScreenLayout, PROMPT,
};
pub use tty::{CrosstermKeyboard, CrosstermScreen, TerminalGuard};

use std::io;

/// Keys the command line understands.
///
/// This is the subset of terminal key events a line editor needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// Enter/Return: submit the line.
    Enter,
    /// Backspace: delete the last character.
    Backspace,
    /// Escape: discard the line.
    Esc,
    /// Ctrl+C or Ctrl+D: leave the program.
    Interrupt,
}

/// Output side of a terminal.
pub trait Screen: Send {
    /// Move the cursor to column `x`, row `y` (0-indexed).
    fn set_cursor(&mut self, x: u16, y: u16) -> io::Result<()>;

    /// Write bytes at the current cursor position.
    fn write_raw(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Erase the whole screen and home the cursor.
    fn clear_screen(&mut self) -> io::Result<()>;

    /// Push any buffered output to the device.
    fn flush(&mut self) -> io::Result<()>;
}

/// Input side of a terminal.
pub trait Keyboard {
    /// Return the next key if one is already available, without waiting.
    fn read_key_nonblocking(&mut self) -> io::Result<Option<Key>>;

    /// Block until a whole line is available. `None` means end of input.
    fn read_line_blocking(&mut self) -> io::Result<Option<String>>;
}
