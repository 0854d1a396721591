//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::report::is_valid_date_format;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ghbattle - GitHub profile lookup and star battles
///
/// Look up a GitHub user's profile card, or pit two users against each
/// other: whoever has more stars across all repositories wins.
///
/// Examples:
///   ghbattle octocat
///   ghbattle octocat torvalds
///   ghbattle octocat torvalds --format html --output battle.html
///   ghbattle --interactive
///   ghbattle --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// One handle to look up, or two handles to battle
    #[arg(
        value_name = "HANDLE",
        num_args = 0..=2,
        required_unless_present_any = ["init_config", "interactive"]
    )]
    pub handles: Vec<String>,

    /// Output format (markdown, html, json)
    ///
    /// Defaults to the config file setting, or markdown.
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the cards to a file instead of stdout
    #[arg(short, long, value_name = "FILE", conflicts_with = "interactive")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .ghbattle.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// GitHub API root URL
    #[arg(long, value_name = "URL", env = "GHBATTLE_API_URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    ///
    /// Unset by default, which keeps the HTTP client's own default.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// strftime pattern for the join date (default: "%d %b %Y")
    #[arg(long, value_name = "FMT")]
    pub date_format: Option<String>,

    /// Read handles from stdin, one action per line
    ///
    /// Commands: :single, :battle, :quit
    #[arg(short, long)]
    pub interactive: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .ghbattle.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the cards.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// HTML card markup
    Html,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref api_url) = self.api_url {
            if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref date_format) = self.date_format {
            if !is_valid_date_format(date_format) {
                return Err(format!("Invalid date format: {}", date_format));
            }
        }

        if self.interactive && !self.handles.is_empty() {
            return Err("Handles cannot be passed together with --interactive".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
