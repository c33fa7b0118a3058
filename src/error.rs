//! Error types.
//!
//! [`Error`] covers startup and I/O failures that abort the program or a
//! single terminal write. [`CommandError`] covers a rejected input line; it is
//! always reported to the user and never leaves the dispatcher.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while setting up or driving the engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The art template file could not be opened.
    #[error("could not open art template {}: {source}", path.display())]
    MissingAsset {
        /// Path that was tried.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The art template exists but contains no drawable rows.
    #[error("art template {} is empty", path.display())]
    EmptyAsset {
        /// Path that was read.
        path: PathBuf,
    },

    /// A configuration value was rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The render thread could not be spawned.
    #[error("failed to spawn render thread: {0}")]
    ThreadSpawn(#[source] io::Error),

    /// Terminal I/O failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A rejected command line. State is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// An argument failed to parse or validate.
    #[error("Invalid {command} argument '{value}': {reason}")]
    InvalidArgument {
        /// Command name.
        command: &'static str,
        /// Raw argument text.
        value: String,
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// A command that needs an argument was given none.
    #[error("Usage: {usage}")]
    MissingArgument {
        /// Usage line for the command.
        usage: &'static str,
    },

    /// The first word of the line is not a known command.
    #[error("Unknown command: {0}. Type 'help' for a list of commands.")]
    UnknownCommand(String),
}
