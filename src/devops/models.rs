//! Typed records returned by the Azure DevOps REST API.
//!
//! Only the fields the reports consume are modeled. Everything is optional or defaulted where the
//! service is known to omit values, so that a sparse payload still deserializes.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// The `{ "count": n, "value": [...] }` envelope wrapping every list response.
#[derive(Debug, Deserialize)]
pub struct ApiList<T> {
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectReference {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub is_disabled: Option<bool>,
    #[serde(default)]
    pub project: ProjectReference,
    #[serde(default)]
    pub remote_url: Option<String>,
    #[serde(default)]
    pub ssh_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationNode {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub has_children: bool,
    #[serde(default)]
    pub children: Option<Vec<Self>>,
}

impl ClassificationNode {
    /// The node's children, treating a missing list as empty.
    #[must_use]
    pub fn child_nodes(&self) -> &[Self] {
        self.children.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitUserDate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChangeCounts {
    #[serde(default)]
    pub add: u64,
    #[serde(default)]
    pub delete: u64,
    #[serde(default)]
    pub edit: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub commit_id: String,
    pub author: GitUserDate,
    pub committer: GitUserDate,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub change_counts: ChangeCounts,
    #[serde(default)]
    pub remote_url: String,

    /// Branch the commit was collected from; not part of the API payload.
    #[serde(skip)]
    pub branch: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRef {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub unique_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryReference {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub remote_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Push {
    pub push_id: u64,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub pushed_by: IdentityRef,
    #[serde(default)]
    pub repository: RepositoryReference,

    /// Ref the push was collected for; not part of the API payload.
    #[serde(skip)]
    pub branch: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefinitionReference {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    pub id: u64,
    #[serde(default)]
    pub build_number: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub definition: DefinitionReference,
    #[serde(default)]
    pub requested_for: IdentityRef,
    #[serde(default)]
    pub repository: RepositoryReference,
    #[serde(default)]
    pub queue_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finish_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtifactProperties {
    #[serde(default)]
    pub artifactsize: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtifactResource {
    #[serde(default)]
    pub properties: ArtifactProperties,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildArtifact {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub resource: ArtifactResource,
}

impl BuildArtifact {
    #[must_use]
    pub fn size(&self) -> Option<&str> {
        self.resource.properties.artifactsize.as_deref()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOptions {
    #[serde(default)]
    pub merge_strategy: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub pull_request_id: u64,
    #[serde(default)]
    pub repository: RepositoryReference,
    #[serde(default)]
    pub target_ref_name: String,
    #[serde(default)]
    pub reviewers: Vec<IdentityRef>,
    #[serde(default)]
    pub completion_options: Option<CompletionOptions>,
    pub creation_date: DateTime<Utc>,
    #[serde(default)]
    pub closed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: IdentityRef,
}

impl PullRequest {
    #[must_use]
    pub fn merge_strategy(&self) -> Option<&str> {
        self.completion_options.as_ref()?.merge_strategy.as_deref()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub project_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    #[serde(default)]
    pub is_team_admin: bool,
    #[serde(default)]
    pub identity: IdentityRef,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamFieldValue {
    pub value: String,
    #[serde(default)]
    pub include_children: bool,
}

/// Response of the team settings `teamfieldvalues` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamFieldValues {
    #[serde(default)]
    pub values: Vec<TeamFieldValue>,
}
