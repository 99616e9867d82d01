//! Command-line interface and orchestration for devops-analyzer
//!
//! This module parses the command line, loads the optional configuration file, and drives a run
//! from the first request to the final summary.
//!
//! # Execution Flow
//!
//! 1. Parse arguments with clap and load `devops-analyzer.toml` (or `--config`)
//! 2. Validate the project URLs and compile the repository filter; failures here are fatal
//! 3. When base information is requested, collect projects, teams and team members from the
//!    collection URL
//! 4. For each project: list and filter repositories, then collect every enabled resource kind,
//!    project the records into rows and hand them to the CSV sink
//! 5. Print a summary of rows written and of the calls that failed
//!
//! Failures of individual calls are reported as warnings and counted; they never end the run.
//!
//! All console output goes through the [`Host`] trait so the whole flow can be exercised with
//! in-memory buffers.

mod analyze;
mod args;
mod config;
mod console;
mod host;
mod run;
mod summary;

pub use args::{AnalyzeArgs, ColorMode, LogLevel};
pub use config::{CalendarConfig, Config, DEFAULT_CONFIG_FILE};
pub use host::Host;
pub use run::run;
pub use summary::RunSummary;
