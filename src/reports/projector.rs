//! Turns collected records into CSV lines.
//!
//! Every function here is total: missing optional values render as empty fields rather than
//! failing, so a sparse payload still produces a row with the full column count.

use super::calendar::{CalendarFields, CalendarSettings};
use super::row::Row;
use crate::collect::AreaPathRow;
use crate::devops::models::{
    Build, BuildArtifact, Commit, Project, PullRequest, Push, Repository, Team, TeamFieldValue, TeamMember,
};
use chrono::{DateTime, TimeDelta, Utc};
use percent_encoding::percent_decode_str;

const MS_PER_MINUTE: f64 = 60_000.0;
const MS_PER_HOUR: f64 = 3_600_000.0;
const MS_PER_DAY: f64 = 86_400_000.0;

/// Per-project settings shared by every projected row.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionContext<'a> {
    pub project_url: &'a str,

    /// Substring identifying internal committers by email; everyone is internal when unset.
    pub internal_identifier: Option<&'a str>,

    /// When false the commit `comment` column is left empty.
    pub include_messages: bool,

    pub calendar: &'a CalendarSettings,
}

impl ProjectionContext<'_> {
    /// Whether the email contains the internal identifier, ignoring case.
    #[must_use]
    pub fn is_internal(&self, email: &str) -> bool {
        match self.internal_identifier {
            None => true,
            Some(id) if id.is_empty() => true,
            Some(id) => email.to_lowercase().contains(&id.to_lowercase()),
        }
    }
}

fn calendar_columns(row: Row, fields: Option<&CalendarFields>) -> Row {
    match fields {
        Some(f) => row
            .field(f.year)
            .field(f.month)
            .field(f.day)
            .field(&f.day_of_week)
            .field(f.week_of_year)
            .field(f.hour),
        None => (0..6).fold(row, |row, _| row.field("")),
    }
}

/// Length of `start..end` in the given unit, rounded half away from zero.
#[expect(clippy::cast_precision_loss, reason = "spans of real activity are far below 2^52 milliseconds")]
fn rounded_span(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>, unit_ms: f64) -> String {
    let (Some(start), Some(end)) = (start, end) else {
        return String::new();
    };

    let span: TimeDelta = end - start;

    // adding zero turns a negative zero into a plain zero
    let value = (span.num_milliseconds() as f64 / unit_ms).round() + 0.0;
    format!("{value}")
}

/// Repository name taken from the path segment following `_git` in a commit URL.
fn repository_from_remote_url(url: &str) -> String {
    let segment = url.split('/').skip_while(|s| *s != "_git").nth(1).unwrap_or_default();
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

#[must_use]
pub fn repository_row(ctx: &ProjectionContext<'_>, repo: &Repository) -> String {
    Row::new()
        .field(ctx.project_url)
        .opt(repo.default_branch.as_deref())
        .field(&repo.id)
        .field(&repo.name)
        .field(&repo.project.name)
        .opt(repo.remote_url.as_deref())
        .opt(repo.ssh_url.as_deref())
        .opt(repo.url.as_deref())
        .opt(repo.web_url.as_deref())
        .opt(repo.size)
        .field(repo.is_disabled.unwrap_or(false))
        .finish()
}

#[must_use]
pub fn area_path_row(row: &AreaPathRow<'_>) -> String {
    Row::new().field(row.project_url).field(&row.path).field(row.name).finish()
}

#[must_use]
pub fn team_area_path_row(ctx: &ProjectionContext<'_>, team_name: &str, value: &TeamFieldValue) -> String {
    Row::new()
        .field(ctx.project_url)
        .field(team_name)
        .field(&value.value)
        .field(value.include_children)
        .finish()
}

#[must_use]
pub fn commit_row(ctx: &ProjectionContext<'_>, commit: &Commit) -> String {
    let committed = ctx.calendar.fields(commit.committer.date);
    let comment = if ctx.include_messages { commit.comment.as_str() } else { "" };

    let row = Row::new()
        .field(ctx.project_url)
        .field(repository_from_remote_url(&commit.remote_url))
        .opt(commit.branch.as_deref())
        .field(ctx.is_internal(&commit.committer.email))
        .field(ctx.calendar.format_timestamp(commit.author.date))
        .field(&commit.author.email)
        .field(&commit.author.name)
        .field(commit.change_counts.add)
        .field(commit.change_counts.delete)
        .field(commit.change_counts.edit)
        .field(&commit.commit_id)
        .field(&committed.timestamp);

    calendar_columns(row, Some(&committed))
        .field(&commit.committer.email)
        .field(&commit.committer.name)
        .field(&commit.remote_url)
        .field(comment)
        .finish()
}

#[must_use]
pub fn push_row(ctx: &ProjectionContext<'_>, push: &Push) -> String {
    let pushed = ctx.calendar.fields(push.date);

    let row = Row::new()
        .field(ctx.project_url)
        .field(&push.repository.name)
        .opt(push.branch.as_deref())
        .field(push.push_id)
        .field(&pushed.timestamp);

    calendar_columns(row, Some(&pushed))
        .field(&push.pushed_by.unique_name)
        .field(&push.pushed_by.display_name)
        .opt(push.repository.remote_url.as_deref())
        .finish()
}

#[must_use]
pub fn build_row(ctx: &ProjectionContext<'_>, build: &Build) -> String {
    let started = build.start_time.map(|t| ctx.calendar.fields(t));

    let row = Row::new()
        .field(ctx.project_url)
        .field(build.id)
        .opt(build.reason.as_deref())
        .field(&build.build_number)
        .field(&build.definition.name)
        .opt(build.result.as_deref())
        .field(&build.requested_for.display_name)
        .field(&build.requested_for.unique_name)
        .field(&build.repository.name)
        .opt(started.as_ref().map(|f| f.timestamp.as_str()));

    calendar_columns(row, started.as_ref())
        .field(ctx.calendar.format_optional(build.finish_time))
        .field(ctx.calendar.format_optional(build.queue_time))
        .field(rounded_span(build.start_time, build.finish_time, MS_PER_MINUTE))
        .finish()
}

#[must_use]
pub fn build_artifact_row(
    ctx: &ProjectionContext<'_>,
    build_id: u64,
    build_number: &str,
    definition: &str,
    artifact: &BuildArtifact,
) -> String {
    Row::new()
        .field(ctx.project_url)
        .field(build_id)
        .field(build_number)
        .field(definition)
        .field(artifact.id)
        .field(&artifact.name)
        .opt(artifact.size())
        .finish()
}

#[must_use]
pub fn pull_request_row(ctx: &ProjectionContext<'_>, pr: &PullRequest) -> String {
    let created = ctx.calendar.fields(pr.creation_date);

    let row = Row::new()
        .field(ctx.project_url)
        .field(pr.pull_request_id)
        .field(&pr.repository.name)
        .field(&pr.target_ref_name)
        .field(pr.reviewers.len())
        .opt(pr.merge_strategy())
        .field(&created.timestamp)
        .field(ctx.calendar.format_optional(pr.closed_date))
        .field(&pr.created_by.display_name)
        .field(&pr.created_by.unique_name);

    calendar_columns(row, Some(&created))
        .field(rounded_span(Some(pr.creation_date), pr.closed_date, MS_PER_HOUR))
        .field(rounded_span(Some(pr.creation_date), pr.closed_date, MS_PER_DAY))
        .finish()
}

#[must_use]
pub fn project_row(collection_url: &str, project: &Project) -> String {
    Row::new().field(collection_url).field(&project.id).field(&project.name).finish()
}

#[must_use]
pub fn team_row(collection_url: &str, team: &Team) -> String {
    Row::new()
        .field(collection_url)
        .field(&team.id)
        .field(&team.name)
        .field(&team.project_name)
        .finish()
}

#[must_use]
pub fn team_member_row(collection_url: &str, project_name: &str, team_name: &str, member: &TeamMember) -> String {
    Row::new()
        .field(collection_url)
        .field(project_name)
        .field(team_name)
        .field(member.is_team_admin)
        .field(&member.identity.display_name)
        .field(&member.identity.unique_name)
        .finish()
}
