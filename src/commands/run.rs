//! Command dispatch logic for devops-analyzer

use super::analyze::analyze;
use super::args::AnalyzeArgs;
use crate::{Host, Result};
use clap::Parser;
use std::io::Write;

/// Parse command-line arguments and run the analysis
///
/// This function is designed to be called from main.rs with the program arguments.
/// Usage errors, `--help` and `--version` are written to the host and end with
/// [`Host::exit`] rather than terminating the process directly.
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if configuration is invalid or the output cannot be prepared
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let args = match AnalyzeArgs::try_parse_from(args) {
        Ok(args) => args,
        Err(e) => {
            let text = e.render();
            let _ = if e.use_stderr() {
                write!(host.error(), "{text}")
            } else {
                write!(host.output(), "{text}")
            };

            host.exit(e.exit_code());
            return Ok(());
        }
    };

    analyze(host, &args).await
}
