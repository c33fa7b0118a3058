//! `marquee`: run the boat scene in the current terminal.
//!
//! Usage: `marquee [ART_FILE]`. Settings come from `MARQUEE_*` environment
//! variables. Logs go to stderr, filtered by `RUST_LOG`. On a terminal they
//! are off unless `RUST_LOG` is set, since stderr shares the animated screen;
//! with piped input the default level is `warn`.

use marquee::{
    Art, CrosstermKeyboard, CrosstermScreen, Engine, EngineConfig, InputMode, TerminalGuard,
};
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let interactive = io::stdin().is_terminal() && io::stdout().is_terminal();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(log_filter(interactive))
        .init();

    match run(interactive) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "fatal");
            eprintln!("marquee: {err}");
            ExitCode::FAILURE
        }
    }
}

fn log_filter(interactive: bool) -> EnvFilter {
    if interactive {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

fn run(interactive: bool) -> marquee::Result<()> {
    let mut config = EngineConfig::from_env()?;
    if let Some(path) = std::env::args_os().nth(1) {
        config.art_path = path.into();
    }

    // Missing or empty art is fatal before anything touches the terminal
    let art = Art::load(&config.art_path)?;
    info!(path = %config.art_path.display(), width = art.width(), height = art.height(), "art loaded");

    let _guard = if interactive {
        Some(TerminalGuard::enter(false)?)
    } else {
        None
    };
    let mode = if interactive {
        InputMode::Keys
    } else {
        InputMode::Lines
    };

    let mut engine = Engine::new(config, art, CrosstermScreen::stdout())?;
    let mut keyboard = CrosstermKeyboard::new();
    engine.run(&mut keyboard, mode)
}
