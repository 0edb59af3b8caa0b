//! Library interface for the `quillgate` CLI.
//!
//! Exposes the argument parser and command implementations so they can be
//! tested and documented without going through `main.rs`.
//!
//! # Structure
//!
//! - [`Cli`] - The root argument parser (clap derive)
//! - [`Commands`] - Available subcommands
//! - [`commands`] - Command implementations

pub mod commands;

#[cfg(feature = "mcp")]
pub mod server;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Color output preference.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect terminal capabilities automatically.
    #[default]
    Auto,
    /// Always emit colors.
    Always,
    /// Never emit colors.
    Never,
}

impl ColorChoice {
    /// Configure global color output. Call once at startup.
    pub fn apply(self) {
        match self {
            Self::Auto => {} // owo-colors auto-detects by default
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }
}

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    RUST_LOG                      Log filter (e.g., debug, quillgate=trace)
    QUILLGATE_LOG_PATH            Explicit log file path
    QUILLGATE_LOG_DIR             Log directory
    QUILLGATE_GENERATOR           Default generator command for `revise`
    QUILLGATE_SCORING__PASS_SCORE Pass bar for `score` and `revise`
";

/// Command-line interface definition for quillgate.
#[derive(Parser)]
#[command(name = "quillgate")]
#[command(about = "Quality gate and revision loop for AI-generated blog posts", long_about = None)]
#[command(version, arg_required_else_help = true)]
#[command(after_long_help = ENV_HELP)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Print only the version number (for scripting)
    #[arg(long)]
    pub version_only: bool,

    /// Path to configuration file (overrides discovery)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run as if started in DIR
    #[arg(short = 'C', long, global = true)]
    pub chdir: Option<PathBuf>,

    /// Only print errors (suppresses warnings/info)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More detail (repeatable; e.g. -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Colorize output
    #[arg(long, global = true, value_enum, default_value_t)]
    pub color: ColorChoice,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available subcommands for the CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Score a blog post and list what to fix
    Score(commands::score::ScoreArgs),

    /// Print a blog-post generation prompt
    Prompt(commands::prompt::PromptArgs),

    /// Score a post and ask a generator for one rewrite if it fails
    Revise(commands::revise::ReviseArgs),

    /// Parse a model-judge reply into a structured evaluation
    Judge(commands::judge::JudgeArgs),

    /// Summarize saved JSON reports
    Stats(commands::stats::StatsArgs),

    /// Show package information
    Info(commands::info::InfoArgs),

    /// Start MCP (Model Context Protocol) server on stdio
    #[cfg(feature = "mcp")]
    Serve(commands::serve::ServeArgs),
}

/// Returns the clap command for documentation generation
pub fn command() -> clap::Command {
    Cli::command()
}
