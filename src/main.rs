//! Extracts repository activity from Azure DevOps into CSV reports.
//!
//! # Quick Start
//!
//! ```bash
//! devops-analyzer --project https://dev.azure.com/contoso/Fabrikam --token $PAT
//! ```
//!
//! This writes `Fabrikam-repositories.csv`, `Fabrikam-commits.csv`, `Fabrikam-pushes.csv` and
//! `Fabrikam-pullrequests.csv` to the current directory.
//!
//! # Scanning Several Projects
//!
//! ```bash
//! devops-analyzer --project https://dev.azure.com/contoso/A,https://dev.azure.com/contoso/B
//! ```
//!
//! Rows from all projects land in `multi-<kind>.csv` files with a single header line.
//!
//! # Filtering Repositories
//!
//! ```bash
//! devops-analyzer -u <url> --filter '^legacy-,-archive$' --exclusion
//! ```
//!
//! Without `--exclusion` the patterns select the repositories to keep.
//!
//! # Builds, Artifacts and Base Information
//!
//! Builds, build artifacts and collection-level information (projects, teams, team members,
//! area paths) are skipped by default because they multiply the number of API calls:
//!
//! ```bash
//! devops-analyzer -u <url> --skip-builds false --skip-build-artifacts false
//! devops-analyzer -u <url> -x https://dev.azure.com/contoso --skip-base false
//! ```
//!
//! # Reproducible Calendar Columns
//!
//! The `weekofyear`, `dayofweek` and `hour` columns depend on a time zone and a week-numbering
//! rule. Both are pinned in `devops-analyzer.toml`:
//!
//! ```toml
//! [calendar]
//! time_zone = "utc"
//! week_rule = "iso"
//! ```

use devops_analyzer::{Host, run};
use std::io::Write;
use std::io::{stderr, stdout};

/// Default host that talks to the real console.
#[derive(Debug, Clone, Default)]
pub struct RealHost;

impl Host for RealHost {
    fn output(&mut self) -> impl Write {
        stdout()
    }

    fn error(&mut self) -> impl Write {
        stderr()
    }

    fn exit(&mut self, code: i32) {
        std::process::exit(code);
    }
}

#[tokio::main]
async fn main() -> Result<(), ohno::AppError> {
    run(&mut RealHost, std::env::args()).await
}
