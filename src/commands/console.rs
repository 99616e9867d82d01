use super::Host;
use super::args::ColorMode;
use chrono::Local;
use core::fmt::Display;
use owo_colors::OwoColorize;
use std::io::{IsTerminal, Write, stdout};

/// Progress messages written to the host's output stream.
#[derive(Debug, Clone, Copy)]
pub struct Console {
    verbose: bool,
    color: bool,
}

impl Console {
    #[must_use]
    pub fn new(verbose: bool, color: ColorMode) -> Self {
        let color = match color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => stdout().is_terminal(),
        };

        Self { verbose, color }
    }

    fn stamp(&self) -> String {
        if self.verbose {
            format!("{} ", Local::now().format("%Y-%m-%d %H:%M:%S"))
        } else {
            String::new()
        }
    }

    pub fn banner<H: Host>(host: &mut H) {
        let rule = "-".repeat(70);
        let _ = writeln!(host.output(), "{rule}\n    devops-analyzer\n{rule}\n");
    }

    pub fn message<H: Host>(&self, host: &mut H, message: impl Display) {
        let _ = writeln!(host.output(), "{}{message}", self.stamp());
    }

    /// A message announcing a file being written, highlighted when color is enabled.
    pub fn success<H: Host>(&self, host: &mut H, message: impl Display) {
        if self.color {
            let _ = writeln!(host.output(), "{}{}", self.stamp(), message.green());
        } else {
            self.message(host, message);
        }
    }

    pub fn warning<H: Host>(&self, host: &mut H, message: impl Display) {
        if self.color {
            let _ = writeln!(host.error(), "{}{} {message}", self.stamp(), "WARNING:".yellow());
        } else {
            let _ = writeln!(host.error(), "{}WARNING: {message}", self.stamp());
        }
    }
}
