//! The end-to-end run: collection-level information, then every project in turn.

use super::Host;
use super::args::{AnalyzeArgs, LogLevel};
use super::config::Config;
use super::console::Console;
use super::summary::RunSummary;
use crate::Result;
use crate::collect::{CollectOptions, Collected, Collector, FetchOutcome, FilterMode, RepositoryFilter, filter_repositories, flatten};
use crate::devops::models::{Build, Team};
use crate::devops::{Client, DevOpsApi, ProjectRef};
use crate::reports::{CalendarSettings, CsvSink, ProjectionContext, ResourceKind, projector};
use camino::Utf8Path;
use core::fmt::Display;
use core::time::Duration;
use ohno::{IntoAppError, bail};
use std::fs;
use std::time::Instant;

const LOG_TARGET: &str = "   analyze";

/// Run a full analysis as described by `args`.
pub async fn analyze<H: Host>(host: &mut H, args: &AnalyzeArgs) -> Result<()> {
    init_logging(args.log_level);
    let start = Instant::now();

    let config = Config::load(Utf8Path::new("."), args.config.as_ref())?;
    let projects = ProjectRef::parse_list(&args.project)?;

    let mode = if args.exclusion { FilterMode::Exclude } else { FilterMode::Include };
    let filter = args.filter.as_deref().map(|p| RepositoryFilter::parse(p, mode)).transpose()?;

    let collection = if args.skip_base {
        None
    } else {
        match args.collection.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Some(url.trim_end_matches('/').to_string()),
            _ => bail!("a collection URL (--collection) is required unless --skip-base is set"),
        }
    };

    fs::create_dir_all(&args.output_dir).into_app_err_with(|| format!("creating output directory '{}'", args.output_dir))?;

    let client = Client::new(args.token.as_deref(), config.request_timeout())?;
    let versions = config.api_versions();
    let calendar = config.calendar_settings();
    let options = CollectOptions {
        commit_count: args.commit_count,
        push_count: args.push_count,
        build_count: args.build_count,
        pull_request_count: args.pull_request_count,
        from_date: args.from_date.clone(),
        branch: args.branch.clone(),
        latest_builds_only: args.latest_builds_only,
    };

    let mut analyzer = Analyzer {
        host,
        console: Console::new(args.verbose, args.color),
        collector: Collector::new(&client, &versions, &options),
        sink: CsvSink::new(args.output_dir.clone()),
        summary: RunSummary::default(),
        filter,
        args,
        calendar: &calendar,
        prefix: output_prefix(args.output_prefix.as_deref(), &projects),
    };

    analyzer.run(collection.as_deref(), &projects).await;
    analyzer.finish(start.elapsed());

    Ok(())
}

/// Initialize logger based on log level
fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    // a second run in the same process keeps the first logger
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}

/// `--output-prefix` when given, otherwise the project name, or `multi` for several projects.
fn output_prefix(explicit: Option<&str>, projects: &[ProjectRef]) -> String {
    match (explicit.map(str::trim), projects) {
        (Some(prefix), _) if !prefix.is_empty() => prefix.to_string(),
        (_, [single]) => single.name().to_string(),
        _ => "multi".to_string(),
    }
}

struct Analyzer<'a, H, A> {
    host: &'a mut H,
    console: Console,
    collector: Collector<'a, A>,
    sink: CsvSink,
    summary: RunSummary,
    filter: Option<RepositoryFilter>,
    args: &'a AnalyzeArgs,
    calendar: &'a CalendarSettings,
    prefix: String,
}

impl<H: Host, A: DevOpsApi> Analyzer<'_, H, A> {
    fn say(&mut self, message: impl Display) {
        self.console.message(&mut *self.host, message);
    }

    fn warn(&mut self, message: impl Display) {
        self.console.warning(&mut *self.host, message);
    }

    /// Record an outcome, reporting anything other than success, and hand back the payload.
    fn accept<T>(&mut self, kind: ResourceKind, subject: &str, outcome: FetchOutcome<T>) -> Option<T> {
        self.summary.record(&outcome);

        match outcome {
            FetchOutcome::Fetched(value) => Some(value),
            FetchOutcome::Skipped(reason) => {
                log::info!(target: LOG_TARGET, "Skipping {kind} for {subject}: {reason}");
                None
            }
            FetchOutcome::Unavailable => {
                log::warn!(target: LOG_TARGET, "Could not retrieve {kind} for {subject}: service returned an error status");
                self.warn(format_args!("could not retrieve {kind} for {subject}: service returned an error status"));
                None
            }
            FetchOutcome::Failed(e) => {
                log::warn!(target: LOG_TARGET, "Could not retrieve {kind} for {subject}: {e:#}");
                self.warn(format_args!("could not retrieve {kind} for {subject}: {e:#}"));
                None
            }
        }
    }

    fn accept_all<T>(&mut self, kind: ResourceKind, collected: Vec<Collected<T>>) -> Vec<T> {
        collected
            .into_iter()
            .filter_map(|c| self.accept(kind, &c.subject, c.outcome))
            .collect()
    }

    fn write(&mut self, kind: ResourceKind, rows: &[String]) {
        let path = self.sink.path_for(kind, &self.prefix);
        self.console.success(&mut *self.host, format_args!("Writing {} {kind} to {path}", rows.len()));

        match self.sink.write(kind, &self.prefix, rows) {
            Ok(path) => self.summary.record_rows(kind, path, rows.len()),
            Err(e) => {
                log::error!(target: LOG_TARGET, "Could not write {path}: {e:#}");
                self.warn(format_args!("could not write {path}: {e:#}"));
                self.summary.record_write_failure();
            }
        }
    }

    async fn run(&mut self, collection: Option<&str>, projects: &[ProjectRef]) {
        Console::banner(&mut *self.host);

        let teams = match collection {
            Some(collection) => self.base_info(collection).await,
            None => Vec::new(),
        };

        for project in projects {
            self.project(project, &teams).await;
        }
    }

    /// Projects, teams and team members of the collection. Returns the teams for later per-project use.
    async fn base_info(&mut self, collection: &str) -> Vec<Team> {
        self.say("Retrieving projects");
        let outcome = self.collector.projects(collection).await;
        let projects = self.accept(ResourceKind::Projects, collection, outcome).unwrap_or_default();
        let rows: Vec<_> = projects.iter().map(|p| projector::project_row(collection, p)).collect();
        self.write(ResourceKind::Projects, &rows);

        self.say("Retrieving teams");
        let outcome = self.collector.teams(collection).await;
        let teams = self.accept(ResourceKind::Teams, collection, outcome).unwrap_or_default();
        let rows: Vec<_> = teams.iter().map(|t| projector::team_row(collection, t)).collect();
        self.write(ResourceKind::Teams, &rows);

        self.say(format_args!("Retrieving members of {} teams", teams.len()));
        let collected = self.collector.team_members(collection, &teams).await;
        let members = self.accept_all(ResourceKind::TeamMembers, collected);
        let rows: Vec<_> = members
            .iter()
            .flat_map(|tm| {
                tm.members
                    .iter()
                    .map(|m| projector::team_member_row(collection, &tm.project_name, &tm.team_name, m))
            })
            .collect();
        self.write(ResourceKind::TeamMembers, &rows);

        teams
    }

    #[expect(clippy::too_many_lines, reason = "one section per resource kind, in output order")]
    async fn project(&mut self, project: &ProjectRef, teams: &[Team]) {
        let args = self.args;
        let ctx = ProjectionContext {
            project_url: project.url(),
            internal_identifier: args.identifier.as_deref(),
            include_messages: !args.no_messages,
            calendar: self.calendar,
        };

        self.say(format_args!("---------------- Project {} ----------------", project.name()));

        self.say("Retrieving repositories");
        let outcome = self.collector.repositories(project).await;
        let all = self.accept(ResourceKind::Repositories, project.name(), outcome).unwrap_or_default();
        if self.filter.is_some() {
            self.say("Applying filters");
        }
        let repos = filter_repositories(all, self.filter.as_ref());
        self.say(format_args!("Retrieved {} repositories", repos.len()));
        let rows: Vec<_> = repos.iter().map(|r| projector::repository_row(&ctx, r)).collect();
        self.write(ResourceKind::Repositories, &rows);

        if !args.skip_base {
            self.say("Retrieving area paths");
            let outcome = self.collector.area_paths(project).await;
            let rows: Vec<_> = self
                .accept(ResourceKind::AreaPaths, project.name(), outcome)
                .map(|root| flatten(&root, project.url(), project.name()).map(|r| projector::area_path_row(&r)).collect::<Vec<_>>())
                .unwrap_or_default();
            self.write(ResourceKind::AreaPaths, &rows);

            self.say("Retrieving team area paths");
            let collected = self.collector.team_area_paths(project, teams).await;
            let rows: Vec<_> = self
                .accept_all(ResourceKind::TeamAreaPaths, collected)
                .iter()
                .flat_map(|t| t.values.iter().map(|v| projector::team_area_path_row(&ctx, &t.team_name, v)))
                .collect();
            self.write(ResourceKind::TeamAreaPaths, &rows);
        }

        if !args.skip_commits {
            self.say(format_args!("Retrieving commits from {} repositories", repos.len()));
            let collected = self.collector.commits(project, &repos).await;
            let rows: Vec<_> = self
                .accept_all(ResourceKind::Commits, collected)
                .iter()
                .flatten()
                .map(|c| projector::commit_row(&ctx, c))
                .collect();
            self.write(ResourceKind::Commits, &rows);
        }

        if args.all_commits {
            self.say(format_args!("Retrieving commits on all branches from {} repositories", repos.len()));
            let collected = self.collector.all_commits(project, &repos).await;
            let rows: Vec<_> = self
                .accept_all(ResourceKind::AllCommits, collected)
                .iter()
                .flatten()
                .map(|c| projector::commit_row(&ctx, c))
                .collect();
            self.write(ResourceKind::AllCommits, &rows);
        }

        if !args.skip_pushes {
            self.say(format_args!("Retrieving pushes from {} repositories", repos.len()));
            let collected = self.collector.pushes(project, &repos).await;
            let rows: Vec<_> = self
                .accept_all(ResourceKind::Pushes, collected)
                .iter()
                .flatten()
                .map(|p| projector::push_row(&ctx, p))
                .collect();
            self.write(ResourceKind::Pushes, &rows);
        }

        if !args.skip_builds {
            self.say(format_args!("Retrieving builds of {}", project.name()));
            let collected = self.collector.builds(project).await;
            let builds: Vec<Build> = self.accept_all(ResourceKind::Builds, collected).into_iter().flatten().collect();
            let rows: Vec<_> = builds.iter().map(|b| projector::build_row(&ctx, b)).collect();
            self.write(ResourceKind::Builds, &rows);

            if !args.skip_build_artifacts {
                self.say(format_args!("Retrieving artifacts of {} builds", builds.len()));
                let collected = self.collector.build_artifacts(project, &builds).await;
                let rows: Vec<_> = self
                    .accept_all(ResourceKind::BuildArtifacts, collected)
                    .iter()
                    .flat_map(|ba| {
                        ba.artifacts
                            .iter()
                            .map(|a| projector::build_artifact_row(&ctx, ba.build_id, &ba.build_number, &ba.definition, a))
                    })
                    .collect();
                self.write(ResourceKind::BuildArtifacts, &rows);
            }
        }

        if !args.skip_pull_requests {
            self.say(format_args!("Retrieving pull requests from {} repositories", repos.len()));
            let collected = self.collector.pull_requests(project, &repos).await;
            let rows: Vec<_> = self
                .accept_all(ResourceKind::PullRequests, collected)
                .iter()
                .flatten()
                .map(|pr| projector::pull_request_row(&ctx, pr))
                .collect();
            self.write(ResourceKind::PullRequests, &rows);
        }
    }

    fn finish(&mut self, elapsed: Duration) {
        if let Err(e) = self.summary.write_to(self.host.output(), elapsed) {
            log::warn!(target: LOG_TARGET, "Could not print the run summary: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projects(urls: &str) -> Vec<ProjectRef> {
        ProjectRef::parse_list(urls).unwrap()
    }

    #[test]
    fn test_prefix_single_project() {
        assert_eq!(output_prefix(None, &projects("https://h/c/Fabrikam")), "Fabrikam");
    }

    #[test]
    fn test_prefix_multiple_projects() {
        assert_eq!(output_prefix(None, &projects("https://h/c/A,https://h/c/B")), "multi");
    }

    #[test]
    fn test_prefix_override() {
        assert_eq!(output_prefix(Some("q3"), &projects("https://h/c/A,https://h/c/B")), "q3");
        assert_eq!(output_prefix(Some(" "), &projects("https://h/c/A")), "A");
    }
}
