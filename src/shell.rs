//! Interaction shell.
//!
//! Turns user input into lookups and writes the outcome into a
//! [`DisplaySurface`] with two regions: a status line and a result area.
//! Both regions are overwritten on every action, never merged.

use crate::analysis::{self, fetch_profile};
use crate::cli::OutputFormat;
use crate::github::ProfileSource;
use crate::models::Emphasis;
use crate::report::{render_card, render_comparison, render_page, RenderOptions};
use anyhow::Result;
use std::fmt;
use tracing::debug;

/// Status shown while a single lookup is in flight.
pub const LOADING: &str = "Loading...";

/// Status shown while a battle is in flight.
pub const BATTLING: &str = "Battling...";

/// Content of the status region.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Empty,
    Pending(String),
    Error(String),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Empty => Ok(()),
            Status::Pending(message) | Status::Error(message) => write!(f, "{}", message),
        }
    }
}

/// Something that can show the status and result regions.
pub trait DisplaySurface {
    fn show_status(&mut self, status: Status);
    fn show_result(&mut self, result: String);
}

/// In-memory regions; the view model the shell computes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Regions {
    pub status: Status,
    pub result: String,
}

impl DisplaySurface for Regions {
    fn show_status(&mut self, status: Status) {
        self.status = status;
    }

    fn show_result(&mut self, result: String) {
        self.result = result;
    }
}

/// Which form is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Single,
    Battle,
}

/// Text currently typed into the input fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inputs {
    pub username: String,
    pub first: String,
    pub second: String,
}

/// What an action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Input was empty; nothing happened.
    Skipped,
    /// Cards were rendered.
    Succeeded,
    /// The lookup failed and the error is in the status region.
    Failed,
}

/// What one line typed at the interactive prompt did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// `:quit` or `:q`.
    Quit,
    /// `:single` or `:battle`.
    ModeChanged(Mode),
    /// A `:` command the prompt does not know. Nothing else happens.
    UnknownCommand(String),
    /// A battle line with more than two handles. Nothing else happens.
    TooManyHandles(usize),
    /// The line filled the active form and submitted it.
    Submitted(ActionOutcome),
}

/// Drives lookups against a profile source and a display surface.
pub struct Shell<'a, S: ?Sized, D> {
    source: &'a S,
    display: D,
    mode: Mode,
    format: OutputFormat,
    options: RenderOptions,
    pub inputs: Inputs,
}

impl<'a, S, D> Shell<'a, S, D>
where
    S: ProfileSource + ?Sized,
    D: DisplaySurface,
{
    /// Create a shell in single mode with empty inputs.
    pub fn new(source: &'a S, display: D, format: OutputFormat, options: RenderOptions) -> Self {
        Self {
            source,
            display,
            mode: Mode::Single,
            format,
            options,
            inputs: Inputs::default(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Switch forms. Both regions are cleared.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.display.show_status(Status::Empty);
        self.display.show_result(String::new());
    }

    /// Run the action of the active form (the Enter key).
    pub async fn submit(&mut self) -> Result<ActionOutcome> {
        match self.mode {
            Mode::Single => self.search().await,
            Mode::Battle => self.battle().await,
        }
    }

    /// Handle one line of the interactive prompt.
    ///
    /// Lines starting with `:` are commands. Anything else fills the active
    /// form and submits it: the whole line is the username in single mode,
    /// and in battle mode the line holds two whitespace-separated handles.
    /// A battle line with fewer than two handles submits with an empty field,
    /// which is a no-op.
    pub async fn handle_line(&mut self, line: &str) -> Result<LineOutcome> {
        let line = line.trim();

        match line {
            ":quit" | ":q" => return Ok(LineOutcome::Quit),
            ":single" => {
                self.set_mode(Mode::Single);
                return Ok(LineOutcome::ModeChanged(Mode::Single));
            }
            ":battle" => {
                self.set_mode(Mode::Battle);
                return Ok(LineOutcome::ModeChanged(Mode::Battle));
            }
            _ if line.starts_with(':') => {
                return Ok(LineOutcome::UnknownCommand(line.to_string()));
            }
            _ => {}
        }

        match self.mode {
            Mode::Single => self.inputs.username = line.to_string(),
            Mode::Battle => {
                let handles: Vec<&str> = line.split_whitespace().collect();
                if handles.len() > 2 {
                    return Ok(LineOutcome::TooManyHandles(handles.len()));
                }
                self.inputs.first = handles.first().copied().unwrap_or_default().to_string();
                self.inputs.second = handles.get(1).copied().unwrap_or_default().to_string();
            }
        }

        self.submit().await.map(LineOutcome::Submitted)
    }

    /// Look up the handle in the username field.
    pub async fn search(&mut self) -> Result<ActionOutcome> {
        let handle = self.inputs.username.trim().to_string();
        if handle.is_empty() {
            return Ok(ActionOutcome::Skipped);
        }

        self.display.show_status(Status::Pending(LOADING.to_string()));
        self.display.show_result(String::new());

        match fetch_profile(self.source, &handle).await {
            Ok(result) => {
                let card = render_card(&result, Emphasis::Neutral, self.format, &self.options)?;
                self.display.show_status(Status::Empty);
                self.display.show_result(render_page(&[card], self.format));
                self.inputs.username.clear();
                Ok(ActionOutcome::Succeeded)
            }
            Err(e) => {
                debug!("Lookup of '{}' failed ({}): {}", handle, e.kind(), e);
                self.display
                    .show_status(Status::Error(e.user_message().to_string()));
                Ok(ActionOutcome::Failed)
            }
        }
    }

    /// Battle the handles in the two battle fields.
    pub async fn battle(&mut self) -> Result<ActionOutcome> {
        let first = self.inputs.first.trim().to_string();
        let second = self.inputs.second.trim().to_string();
        if first.is_empty() || second.is_empty() {
            return Ok(ActionOutcome::Skipped);
        }

        self.display
            .show_status(Status::Pending(BATTLING.to_string()));
        self.display.show_result(String::new());

        match analysis::battle(self.source, &first, &second).await {
            Ok(outcome) => {
                let (a, b) =
                    render_comparison(&outcome.first, &outcome.second, self.format, &self.options)?;
                self.inputs.first.clear();
                self.inputs.second.clear();
                self.display.show_status(Status::Empty);
                self.display.show_result(render_page(&[a, b], self.format));
                Ok(ActionOutcome::Succeeded)
            }
            Err(e) => {
                debug!(
                    "Battle '{}' vs '{}' failed ({}): {}",
                    first,
                    second,
                    e.kind(),
                    e
                );
                self.display
                    .show_status(Status::Error(e.user_message().to_string()));
                Ok(ActionOutcome::Failed)
            }
        }
    }
}
