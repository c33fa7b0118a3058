//! Command parsing and the outcome of running one.
//!
//! A line is split into a command word and the rest. The word is matched
//! case-insensitively; the rest is kept exactly as typed (after trimming),
//! so `set_text` preserves case and inner spacing.

use crate::error::CommandError;

/// Text shown by `help`.
pub const HELP: &str = "\
Commands:
 help                 - show this command list
 start_marquee        - start (or resume) the animation   [alias: start]
 stop_marquee         - stop (or pause) the animation     [alias: stop]
 set_speed <ms>       - set milliseconds per frame
 set_text <text>      - change the banner text (keeps scroll position)
 show_status          - show current status               [alias: status]
 exit                 - close the program                 [alias: quit]";

const SPEED_USAGE: &str = "set_speed <positive number of milliseconds>";
const TEXT_USAGE: &str = "set_text <text>";

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the commands.
    Help,
    /// Start or resume the animation.
    Start,
    /// Stop or pause the animation.
    Stop,
    /// Set milliseconds per tick.
    SetSpeed(u64),
    /// Replace the banner text.
    SetText(String),
    /// Report the current state.
    Status,
    /// Leave the program.
    Exit,
}

impl Command {
    /// Parse a line. A blank line is `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "help" => no_argument(Self::Help, "help", rest)?,
            "start" | "start_marquee" => no_argument(Self::Start, "start_marquee", rest)?,
            "stop" | "stop_marquee" => no_argument(Self::Stop, "stop_marquee", rest)?,
            "status" | "show_status" => no_argument(Self::Status, "show_status", rest)?,
            "exit" | "quit" => no_argument(Self::Exit, "exit", rest)?,
            "set_speed" => Self::SetSpeed(parse_speed(rest)?),
            "set_text" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument { usage: TEXT_USAGE });
                }
                Self::SetText(rest.to_string())
            }
            _ => return Err(CommandError::UnknownCommand(word.to_string())),
        };
        Ok(Some(command))
    }
}

fn no_argument(command: Command, name: &'static str, rest: &str) -> Result<Command, CommandError> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(CommandError::InvalidArgument {
            command: name,
            value: rest.to_string(),
            reason: "this command takes no argument",
        })
    }
}

fn parse_speed(arg: &str) -> Result<u64, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingArgument { usage: SPEED_USAGE });
    }
    let invalid = |reason| CommandError::InvalidArgument {
        command: "set_speed",
        value: arg.to_string(),
        reason,
    };
    match arg.parse::<i64>() {
        Ok(ms) if ms > 0 => u64::try_from(ms).map_err(|_| invalid("must be a positive number")),
        Ok(_) => Err(invalid("must be a positive number")),
        Err(_) => Err(invalid("not a number")),
    }
}

/// How a command went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    /// State changed as asked.
    Applied,
    /// Nothing to do (already running, already paused, blank line).
    Notice,
    /// The command was rejected; state unchanged.
    Rejected,
}

/// The user-visible result of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// What happened.
    pub kind: OutcomeKind,
    /// Message for the user (may be empty).
    pub message: String,
    /// The program should exit.
    pub exit: bool,
}

impl Outcome {
    /// State changed.
    pub fn applied(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::Applied, message)
    }

    /// Informational only.
    pub fn notice(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::Notice, message)
    }

    /// Rejected, state unchanged.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::Rejected, message)
    }

    /// Nothing to report.
    pub fn silent() -> Self {
        Self::notice(String::new())
    }

    /// Leave the program after showing `message`.
    pub fn exit(message: impl Into<String>) -> Self {
        Self {
            exit: true,
            ..Self::applied(message)
        }
    }

    fn new(kind: OutcomeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            exit: false,
        }
    }
}

impl From<CommandError> for Outcome {
    fn from(err: CommandError) -> Self {
        Self::rejected(err.to_string())
    }
}
