//! Relative paths and query strings for the REST endpoints the analyzer reads.
//!
//! Values coming from the command line or from API payloads (repository names, branch names,
//! dates, team names) are percent-encoded; count and date bounds are otherwise passed through as
//! given.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left unescaped in path segments and query values.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// API versions sent with each request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiVersions {
    pub default: String,
    pub teams: String,
}

impl Default for ApiVersions {
    fn default() -> Self {
        Self {
            default: "7.0".to_string(),
            teams: "7.0-preview".to_string(),
        }
    }
}

fn enc(value: &str) -> impl core::fmt::Display + '_ {
    utf8_percent_encode(value, COMPONENT)
}

fn from_date_param(name: &str, from_date: Option<&str>) -> String {
    from_date.map_or_else(String::new, |date| format!("&{name}={}", enc(date)))
}

#[must_use]
pub fn projects(versions: &ApiVersions) -> String {
    format!("_apis/projects?api-version={}", versions.default)
}

#[must_use]
pub fn teams(versions: &ApiVersions) -> String {
    format!("_apis/teams?api-version={}", versions.teams)
}

#[must_use]
pub fn team_members(versions: &ApiVersions, project: &str, team: &str) -> String {
    format!(
        "_apis/projects/{}/teams/{}/members?api-version={}",
        enc(project),
        enc(team),
        versions.teams
    )
}

#[must_use]
pub fn team_field_values(versions: &ApiVersions, team: &str) -> String {
    format!("{}/_apis/work/teamsettings/teamfieldvalues?api-version={}", enc(team), versions.default)
}

#[must_use]
pub fn repositories(versions: &ApiVersions) -> String {
    format!("_apis/git/repositories?api-version={}", versions.default)
}

#[must_use]
pub fn area_paths(versions: &ApiVersions) -> String {
    format!("_apis/wit/classificationnodes/areas?$depth=100&api-version={}", versions.default)
}

/// Commit history of a repository, optionally constrained to one branch.
#[must_use]
pub fn commits(versions: &ApiVersions, repository: &str, top: u32, branch: Option<&str>, from_date: Option<&str>) -> String {
    let branch = branch.map_or_else(String::new, |b| format!("&searchCriteria.itemVersion.version={}", enc(b)));
    format!(
        "_apis/git/repositories/{}/commits?searchCriteria.$top={top}{branch}{}&api-version={}",
        enc(repository),
        from_date_param("searchCriteria.fromDate", from_date),
        versions.default
    )
}

#[must_use]
pub fn pushes(versions: &ApiVersions, repository: &str, top: u32, ref_name: &str, from_date: Option<&str>) -> String {
    format!(
        "_apis/git/repositories/{}/pushes?$top={top}&searchCriteria.refName={}{}&api-version={}",
        enc(repository),
        enc(ref_name),
        from_date_param("searchCriteria.fromDate", from_date),
        versions.default
    )
}

/// The most recent build of every build definition.
#[must_use]
pub fn latest_build_per_definition(versions: &ApiVersions, from_date: Option<&str>) -> String {
    format!(
        "_apis/build/builds?$top=5000&maxBuildsPerDefinition=1{}&api-version={}",
        from_date_param("minTime", from_date),
        versions.default
    )
}

#[must_use]
pub fn builds(versions: &ApiVersions, definition: Option<u64>, top: u32, from_date: Option<&str>) -> String {
    let definition = definition.map_or_else(String::new, |id| format!("definitions={id}&"));
    format!(
        "_apis/build/builds?{definition}$top={top}{}&api-version={}",
        from_date_param("minTime", from_date),
        versions.default
    )
}

#[must_use]
pub fn build_artifacts(versions: &ApiVersions, build_id: u64) -> String {
    format!("_apis/build/builds/{build_id}/artifacts?api-version={}", versions.default)
}

#[must_use]
pub fn completed_pull_requests(versions: &ApiVersions, repository: &str, target_ref: &str, top: u32) -> String {
    format!(
        "_apis/git/repositories/{}/pullrequests?searchCriteria.status=completed&searchCriteria.targetRefName={}&$top={top}&api-version={}",
        enc(repository),
        enc(target_ref),
        versions.default
    )
}
