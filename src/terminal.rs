//! Terminal display surface.
//!
//! Pending status is shown as a spinner on stderr, errors are printed to
//! stderr, and the result region is kept until the caller writes it out.

use crate::shell::{DisplaySurface, Regions, Status};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct Terminal {
    regions: Regions,
    spinner: Option<ProgressBar>,
    show_progress: bool,
    echo_results: bool,
}

impl Terminal {
    /// `echo_results` prints every non-empty result to stdout as it arrives
    /// (interactive mode). Otherwise the result is only kept for [`Terminal::result`].
    pub fn new(show_progress: bool, echo_results: bool) -> Self {
        Self {
            regions: Regions::default(),
            spinner: None,
            show_progress,
            echo_results,
        }
    }

    /// Content of the result region.
    pub fn result(&self) -> &str {
        &self.regions.result
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl DisplaySurface for Terminal {
    fn show_status(&mut self, status: Status) {
        self.stop_spinner();

        match status {
            Status::Empty => {}
            Status::Pending(ref message) => {
                if self.show_progress {
                    let spinner = ProgressBar::new_spinner();
                    if let Ok(style) =
                        ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
                    {
                        spinner.set_style(style);
                    }
                    spinner.set_message(message.clone());
                    spinner.enable_steady_tick(Duration::from_millis(100));
                    self.spinner = Some(spinner);
                }
            }
            Status::Error(ref message) => {
                eprintln!("❌ {}", message);
            }
        }

        self.regions.show_status(status);
    }

    fn show_result(&mut self, result: String) {
        if self.echo_results && !result.is_empty() {
            println!("{}", result);
        }
        self.regions.show_result(result);
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        self.stop_spinner();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_region_is_overwritten() {
        let mut terminal = Terminal::new(false, false);
        terminal.show_result("first".to_string());
        terminal.show_result("second".to_string());
        assert_eq!(terminal.result(), "second");

        terminal.show_result(String::new());
        assert!(terminal.result().is_empty());
    }

    #[test]
    fn test_pending_without_progress_has_no_spinner() {
        let mut terminal = Terminal::new(false, false);
        terminal.show_status(Status::Pending("Loading...".to_string()));
        assert!(terminal.spinner.is_none());
        assert_eq!(
            terminal.regions.status,
            Status::Pending("Loading...".to_string())
        );
    }

    #[test]
    fn test_status_change_stops_spinner() {
        let mut terminal = Terminal::new(true, false);
        terminal.show_status(Status::Pending("Battling...".to_string()));
        assert!(terminal.spinner.is_some());

        terminal.show_status(Status::Empty);
        assert!(terminal.spinner.is_none());
    }
}
