//! Command-line argument parsing for voicerag
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::EncoderBackend;

/// voicerag - knowledge lookup for voice assistants
#[derive(Parser, Debug)]
#[command(name = "voicerag")]
#[command(version)]
#[command(about = "Search a static knowledge base the way a voice agent's lookup tool does", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Knowledge base file (overrides the configured path)
    #[arg(long, global = true)]
    pub knowledge: Option<PathBuf>,

    /// Text encoder (overrides the configured backend)
    #[arg(long, value_enum, global = true)]
    pub encoder: Option<EncoderBackend>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress everything except results)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Search the knowledge base once and print the ranked passages
    Search {
        /// Free-text question
        #[arg(value_name = "QUERY")]
        query: String,

        /// Number of passages to return
        #[arg(short, long)]
        k: Option<usize>,
    },

    /// Start an interactive console that sends each line as a query
    Start,

    /// Execute a tool call the way an agent runtime would
    Tool {
        /// Tool arguments as JSON, e.g. '{"query": "What is RAG?"}'
        #[arg(value_name = "JSON")]
        args: String,

        /// Tool name
        #[arg(long, default_value = "lookup_knowledge")]
        name: String,
    },

    /// Build the index and report its size
    Index,

    /// Display current configuration
    Config {
        /// Also write the effective configuration to this file
        #[arg(long, value_name = "PATH")]
        write: Option<PathBuf>,
    },
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity_or(Verbosity::Normal)
    }

    /// Verbosity from flags, falling back to `default` when none are given
    pub fn verbosity_or(&self, default: Verbosity) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => default,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Check argument combinations clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.quiet && self.verbose > 0 {
            return Err("Cannot combine --quiet with --verbose.".to_string());
        }

        match &self.command {
            Commands::Search { query, k } => {
                if query.trim().is_empty() {
                    return Err("Query must not be empty.".to_string());
                }
                if *k == Some(0) {
                    return Err("k must be at least 1.".to_string());
                }
            }
            Commands::Tool { args, .. } if args.trim().is_empty() => {
                return Err("Tool arguments must be a JSON object.".to_string());
            }
            _ => {}
        }

        Ok(())
    }
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Parse the configuration file spelling
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "quiet" => Some(Verbosity::Quiet),
            "normal" => Some(Verbosity::Normal),
            "verbose" => Some(Verbosity::Verbose),
            "very_verbose" => Some(Verbosity::VeryVerbose),
            _ => None,
        }
    }

    /// Default tracing filter for this level (RUST_LOG takes precedence)
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn,voicerag=info",
            Verbosity::Verbose => "info,voicerag=debug",
            Verbosity::VeryVerbose => "debug",
        }
    }

    /// Check if should show progress spinners
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }

    /// Check if should show detailed events
    pub fn show_events(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }
}
