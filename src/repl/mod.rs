//! Interactive console standing in for the voice front end
//!
//! Each line the user types is sent to the retrieval engine as a query and
//! the ranked passages are printed back. `:`-prefixed lines are commands.

pub mod commands;
pub mod input;

use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::cli::Verbosity;
use crate::rag::{EngineHandle, DEFAULT_TOP_K};
use crate::repl::commands::{is_command, Command};
pub use crate::repl::input::InputHandler;
use crate::telemetry::{TelemetryCollector, TelemetryDisplay};

/// Outcome of one line of input
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Ranked passages for a query
    Answer(String),
    /// Informational output from a command
    Info(String),
    /// A query or command that failed
    Error(String),
    /// Blank line
    Nothing,
    Quit,
}

/// Console session state
pub struct ReplSession {
    handle: Arc<EngineHandle>,
    telemetry: TelemetryCollector,
    verbosity: Verbosity,
    k: usize,
    queries: usize,
}

impl ReplSession {
    pub fn new(handle: Arc<EngineHandle>, telemetry: TelemetryCollector) -> Self {
        Self {
            handle,
            telemetry,
            verbosity: Verbosity::Normal,
            k: DEFAULT_TOP_K,
            queries: 0,
        }
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k.max(1);
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn query_count(&self) -> usize {
        self.queries
    }

    /// Handle one line of input without touching the terminal
    pub fn respond(&mut self, input: &str) -> Reply {
        let input = input.trim();
        if input.is_empty() {
            return Reply::Nothing;
        }

        if is_command(input) {
            return self.run_command(commands::parse(input));
        }

        self.queries += 1;
        match self.handle.search(input, self.k) {
            Ok(answer) => Reply::Answer(answer),
            Err(e) => Reply::Error(e.to_string()),
        }
    }

    fn run_command(&mut self, command: Command) -> Reply {
        match command {
            Command::Help => Reply::Info(commands::help_text().to_string()),
            Command::Quit => Reply::Quit,
            Command::ShowK => Reply::Info(format!("k = {}", self.k)),
            Command::SetK { k } => {
                self.k = k;
                Reply::Info(format!("k set to {}", k))
            }
            Command::Stats => {
                let display = TelemetryDisplay::new(self.telemetry.clone(), self.verbosity);
                Reply::Info(display.summary())
            }
            Command::Unknown { input } => {
                Reply::Error(format!("Unknown command: {} (try :help)", input))
            }
        }
    }

    /// Read-eval-print until `:quit`, Ctrl-D or Ctrl-C
    pub fn run(&mut self, input: &mut InputHandler) -> Result<()> {
        if self.verbosity.show_progress() {
            println!(
                "{} Type a question, {} for commands.",
                "voicerag console.".bold(),
                ":help".cyan()
            );
        }

        debug!(entries = input.history_len(), "Console history loaded");

        while let Some(line) = input.read_line()? {
            match self.respond(&line) {
                Reply::Answer(answer) => {
                    for (rank, passage) in answer.lines().enumerate() {
                        println!("{} {}", format!("{}.", rank + 1).green(), passage);
                    }
                }
                Reply::Info(text) => println!("{}", text),
                Reply::Error(text) => eprintln!("{}", text.red()),
                Reply::Nothing => {}
                Reply::Quit => break,
            }
        }

        input.save_history()?;
        Ok(())
    }
}

/// Default history location: ~/.voicerag/history
pub fn default_history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".voicerag").join("history"))
}
