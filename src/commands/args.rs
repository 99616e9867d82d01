use camino::Utf8PathBuf;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{ArgAction, Parser, ValueEnum};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

#[derive(Parser, Debug)]
#[command(name = "devops-analyzer", author, version, long_about = None)]
#[command(about = "Extract Azure DevOps repository activity into CSV reports")]
#[command(styles = CLAP_STYLES)]
#[expect(clippy::struct_excessive_bools, reason = "each flag is an independent command-line switch")]
pub struct AnalyzeArgs {
    /// Comma-separated project URLs to scan
    #[arg(long, short = 'u', value_name = "URLS")]
    pub project: String,

    /// Collection URL, required for projects, teams, team members and area paths
    #[arg(long, short = 'x', value_name = "URL")]
    pub collection: Option<String>,

    /// Personal access token
    #[arg(long, short = 't', value_name = "TOKEN", env = "AZURE_DEVOPS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Prefix console messages with the time of day
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Maximum number of commits to retrieve per repository
    #[arg(long, short = 'c', value_name = "COUNT", default_value_t = 100_000, help_heading = "Limits")]
    pub commit_count: u32,

    /// Maximum number of pushes to retrieve per repository
    #[arg(long, short = 'p', value_name = "COUNT", default_value_t = 100_000, help_heading = "Limits")]
    pub push_count: u32,

    /// Maximum number of builds to retrieve per build definition
    #[arg(long, short = 'b', value_name = "COUNT", default_value_t = 5000, help_heading = "Limits")]
    pub build_count: u32,

    /// Maximum number of pull requests to retrieve per repository
    #[arg(long, short = 'g', value_name = "COUNT", default_value_t = 5000, help_heading = "Limits")]
    pub pull_request_count: u32,

    /// Only retrieve activity on or after this date (e.g. 2024-01-31)
    #[arg(long, short = 'd', value_name = "DATE", help_heading = "Limits")]
    pub from_date: Option<String>,

    /// Committer emails containing this text are reported as internal
    #[arg(long, short = 'i', value_name = "TEXT")]
    pub identifier: Option<String>,

    /// Comma-separated regular expressions selecting repositories by name
    #[arg(long, short = 'f', value_name = "PATTERNS", help_heading = "Repository Selection")]
    pub filter: Option<String>,

    /// Drop repositories matching the filter instead of keeping them
    #[arg(long, short = 'e', help_heading = "Repository Selection")]
    pub exclusion: bool,

    /// Branch to scan instead of each repository's default branch
    #[arg(long, short = 'r', value_name = "BRANCH", help_heading = "Repository Selection")]
    pub branch: Option<String>,

    /// Leave the commit message column empty
    #[arg(long, short = 'l')]
    pub no_messages: bool,

    /// Don't collect commits
    #[arg(long, help_heading = "Resources")]
    pub skip_commits: bool,

    /// Don't collect pushes
    #[arg(long, help_heading = "Resources")]
    pub skip_pushes: bool,

    /// Don't collect pull requests
    #[arg(long, help_heading = "Resources")]
    pub skip_pull_requests: bool,

    /// Don't collect builds
    #[arg(long, value_name = "BOOL", default_value_t = true, default_missing_value = "true", num_args = 0..=1, action = ArgAction::Set, help_heading = "Resources")]
    pub skip_builds: bool,

    /// Don't collect build artifacts (requires builds)
    #[arg(long, value_name = "BOOL", default_value_t = true, default_missing_value = "true", num_args = 0..=1, action = ArgAction::Set, help_heading = "Resources")]
    pub skip_build_artifacts: bool,

    /// Don't collect projects, teams, team members and area paths
    #[arg(long, value_name = "BOOL", default_value_t = true, default_missing_value = "true", num_args = 0..=1, action = ArgAction::Set, help_heading = "Resources")]
    pub skip_base: bool,

    /// Also collect the commit history across all branches
    #[arg(long, help_heading = "Resources")]
    pub all_commits: bool,

    /// Retrieve a single build listing instead of the history of every build definition
    #[arg(long, help_heading = "Resources")]
    pub latest_builds_only: bool,

    /// Prefix for output file names [default: the project name, or 'multi' for several projects]
    #[arg(long, short = 'o', value_name = "PREFIX", help_heading = "Report Output")]
    pub output_prefix: Option<String>,

    /// Directory the CSV files are written to
    #[arg(long, value_name = "PATH", default_value = ".", help_heading = "Report Output")]
    pub output_dir: Utf8PathBuf,

    /// Path to configuration file (default is `devops-analyzer.toml`)
    #[arg(long, value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_well_formed() {
        AnalyzeArgs::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = AnalyzeArgs::try_parse_from(["devops-analyzer", "-u", "https://h/c/P"]).unwrap();

        assert_eq!(args.commit_count, 100_000);
        assert_eq!(args.push_count, 100_000);
        assert_eq!(args.build_count, 5000);
        assert_eq!(args.pull_request_count, 5000);
        assert!(args.skip_builds);
        assert!(args.skip_build_artifacts);
        assert!(args.skip_base);
        assert!(!args.skip_commits);
        assert!(!args.exclusion);
        assert_eq!(args.output_dir, ".");
        assert_eq!(args.log_level, LogLevel::None);
    }

    #[test]
    fn test_boolean_toggles_take_values() {
        let args = AnalyzeArgs::try_parse_from([
            "devops-analyzer",
            "-u",
            "https://h/c/P",
            "--skip-builds",
            "false",
            "--skip-base=false",
            "--skip-build-artifacts",
        ])
        .unwrap();

        assert!(!args.skip_builds);
        assert!(!args.skip_base);
        assert!(args.skip_build_artifacts);
    }

    #[test]
    fn test_short_flags() {
        let args = AnalyzeArgs::try_parse_from([
            "devops-analyzer",
            "-u",
            "https://h/c/P",
            "-c",
            "10",
            "-f",
            "^legacy",
            "-e",
            "-r",
            "develop",
            "-l",
            "-i",
            "contoso",
        ])
        .unwrap();

        assert_eq!(args.commit_count, 10);
        assert_eq!(args.filter.as_deref(), Some("^legacy"));
        assert!(args.exclusion);
        assert_eq!(args.branch.as_deref(), Some("develop"));
        assert!(args.no_messages);
        assert_eq!(args.identifier.as_deref(), Some("contoso"));
    }

    #[test]
    fn test_project_is_required() {
        let _ = AnalyzeArgs::try_parse_from(["devops-analyzer"]).unwrap_err();
    }
}
