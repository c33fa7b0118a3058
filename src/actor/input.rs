//! Input line editing and its display mirror.
//!
//! The command thread owns a [`LineEditor`] and feeds it keys. Each change
//! is published to an [`InputLine`], a read-only copy the render thread
//! draws on the prompt row. The editor's own buffer is never shared.

use crate::terminal::Key;
use std::sync::{Arc, Mutex, PoisonError};

/// Mirror of the line being typed, readable from the render thread.
#[derive(Debug, Default)]
pub struct InputLine {
    line: Mutex<String>,
}

impl InputLine {
    /// An empty mirror.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current line.
    pub fn snapshot(&self) -> String {
        self.line
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn publish(&self, text: &str) {
        let mut guard = self.line.lock().unwrap_or_else(PoisonError::into_inner);
        text.clone_into(&mut guard);
    }
}

/// Result of feeding one key to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// The line changed and should be redrawn.
    Changed,
    /// Nothing happened.
    Unchanged,
    /// Enter was pressed; the completed line is returned and the editor
    /// starts over.
    Submitted(String),
    /// The user asked to leave.
    Interrupt,
}

/// Single-line editor for the command prompt.
#[derive(Debug)]
pub struct LineEditor {
    buffer: String,
    mirror: Arc<InputLine>,
}

impl LineEditor {
    /// Longest line the editor accepts, in characters.
    pub const MAX_LEN: usize = 256;

    /// Create an editor publishing to `mirror`.
    pub fn new(mirror: Arc<InputLine>) -> Self {
        mirror.publish("");
        Self {
            buffer: String::new(),
            mirror,
        }
    }

    /// Current contents.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Apply a key.
    pub fn apply(&mut self, key: Key) -> Edit {
        match key {
            Key::Char(c) if !c.is_control() => {
                if self.buffer.chars().count() >= Self::MAX_LEN {
                    return Edit::Unchanged;
                }
                self.buffer.push(c);
            }
            Key::Char(_) => return Edit::Unchanged,
            Key::Backspace => {
                if self.buffer.pop().is_none() {
                    return Edit::Unchanged;
                }
            }
            Key::Esc => {
                if self.buffer.is_empty() {
                    return Edit::Unchanged;
                }
                self.buffer.clear();
            }
            Key::Enter => {
                let line = std::mem::take(&mut self.buffer);
                self.mirror.publish("");
                return Edit::Submitted(line);
            }
            Key::Interrupt => return Edit::Interrupt,
        }
        self.mirror.publish(&self.buffer);
        Edit::Changed
    }
}
