use super::branch::{RefForm, resolve_branch};
use super::outcome::{Collected, FetchOutcome, SkipReason};
use crate::devops::models::{
    ApiList, Build, BuildArtifact, ClassificationNode, Commit, Project, PullRequest, Push, Repository, Team, TeamFieldValue,
    TeamFieldValues, TeamMember,
};
use crate::devops::{ApiVersions, DevOpsApi, ProjectRef, endpoints};
use ohno::IntoAppError;
use rayon::prelude::*;
use serde::de::DeserializeOwned;

const LOG_TARGET: &str = " collector";

/// Commit batches larger than this are tagged on the rayon pool.
const PARALLEL_TAGGING_THRESHOLD: usize = 5000;

/// Bounds and switches that shape every request the collector issues.
#[derive(Debug, Clone)]
pub struct CollectOptions {
    pub commit_count: u32,
    pub push_count: u32,
    pub build_count: u32,
    pub pull_request_count: u32,
    pub from_date: Option<String>,
    pub branch: Option<String>,
    pub latest_builds_only: bool,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            commit_count: 100_000,
            push_count: 100_000,
            build_count: 5000,
            pull_request_count: 5000,
            from_date: None,
            branch: None,
            latest_builds_only: false,
        }
    }
}

/// Artifacts of one build, along with the build fields the report repeats on every row.
#[derive(Debug, Clone)]
pub struct BuildArtifacts {
    pub build_id: u64,
    pub build_number: String,
    pub definition: String,
    pub artifacts: Vec<BuildArtifact>,
}

#[derive(Debug, Clone)]
pub struct TeamMembers {
    pub project_name: String,
    pub team_name: String,
    pub members: Vec<TeamMember>,
}

#[derive(Debug, Clone)]
pub struct TeamAreaPaths {
    pub team_name: String,
    pub values: Vec<TeamFieldValue>,
}

/// Issues the REST calls for every resource kind.
///
/// Calls are made one at a time. Each one produces its own [`FetchOutcome`], so a failing repository,
/// build or team never prevents the remaining calls from being made.
#[derive(Debug)]
pub struct Collector<'a, A> {
    api: &'a A,
    versions: &'a ApiVersions,
    options: &'a CollectOptions,
}

impl<'a, A: DevOpsApi> Collector<'a, A> {
    pub const fn new(api: &'a A, versions: &'a ApiVersions, options: &'a CollectOptions) -> Self {
        Self { api, versions, options }
    }

    async fn fetch<T: DeserializeOwned>(&self, base_url: &str, path: &str) -> FetchOutcome<T> {
        log::debug!(target: LOG_TARGET, "Requesting {path}");
        let response = self.api.get(base_url, path).await;
        FetchOutcome::from_response(response, |body| {
            serde_json::from_str(body).into_app_err_with(|| format!("decoding response of '{path}'"))
        })
    }

    async fn fetch_list<T: DeserializeOwned>(&self, base_url: &str, path: &str) -> FetchOutcome<Vec<T>> {
        self.fetch::<ApiList<T>>(base_url, path).await.map(|list| list.value)
    }

    /// Every repository of the project, in the order the service returns them.
    pub async fn repositories(&self, project: &ProjectRef) -> FetchOutcome<Vec<Repository>> {
        self.fetch_list(project.url(), &endpoints::repositories(self.versions)).await
    }

    /// The project's area-path tree.
    pub async fn area_paths(&self, project: &ProjectRef) -> FetchOutcome<ClassificationNode> {
        self.fetch(project.url(), &endpoints::area_paths(self.versions)).await
    }

    /// Commits on each repository's resolved branch, tagged with that branch.
    pub async fn commits(&self, project: &ProjectRef, repositories: &[Repository]) -> Vec<Collected<Vec<Commit>>> {
        let mut result = Vec::with_capacity(repositories.len());
        for repo in repositories {
            let outcome = match eligible_default_branch(repo) {
                Ok(default_branch) => {
                    let branch = resolve_branch(self.options.branch.as_deref(), default_branch, RefForm::Short);
                    let path = endpoints::commits(
                        self.versions,
                        &repo.name,
                        self.options.commit_count,
                        Some(&branch),
                        self.options.from_date.as_deref(),
                    );

                    self.fetch_list(project.url(), &path).await.map(|mut commits: Vec<Commit>| {
                        tag_commits(&mut commits, Some(&branch));
                        commits
                    })
                }
                Err(reason) => FetchOutcome::Skipped(reason),
            };

            result.push(Collected::new(&repo.name, outcome));
        }

        result
    }

    /// Commits across all branches of each repository; the records carry no branch.
    pub async fn all_commits(&self, project: &ProjectRef, repositories: &[Repository]) -> Vec<Collected<Vec<Commit>>> {
        let mut result = Vec::with_capacity(repositories.len());
        for repo in repositories {
            let outcome = match eligible_default_branch(repo) {
                Ok(_) => {
                    let path = endpoints::commits(
                        self.versions,
                        &repo.name,
                        self.options.commit_count,
                        None,
                        self.options.from_date.as_deref(),
                    );
                    self.fetch_list(project.url(), &path).await
                }
                Err(reason) => FetchOutcome::Skipped(reason),
            };

            result.push(Collected::new(&repo.name, outcome));
        }

        result
    }

    /// Pushes to each repository's resolved branch, tagged with the full ref.
    pub async fn pushes(&self, project: &ProjectRef, repositories: &[Repository]) -> Vec<Collected<Vec<Push>>> {
        let mut result = Vec::with_capacity(repositories.len());
        for repo in repositories {
            let outcome = match eligible_default_branch(repo) {
                Ok(default_branch) => {
                    let ref_name = resolve_branch(self.options.branch.as_deref(), default_branch, RefForm::Full);
                    let path = endpoints::pushes(
                        self.versions,
                        &repo.name,
                        self.options.push_count,
                        &ref_name,
                        self.options.from_date.as_deref(),
                    );

                    self.fetch_list(project.url(), &path).await.map(|mut pushes: Vec<Push>| {
                        for push in &mut pushes {
                            push.branch = Some(ref_name.clone());
                        }
                        pushes
                    })
                }
                Err(reason) => FetchOutcome::Skipped(reason),
            };

            result.push(Collected::new(&repo.name, outcome));
        }

        result
    }

    /// Completed pull requests targeting each repository's resolved branch.
    pub async fn pull_requests(&self, project: &ProjectRef, repositories: &[Repository]) -> Vec<Collected<Vec<PullRequest>>> {
        let mut result = Vec::with_capacity(repositories.len());
        for repo in repositories {
            let outcome = match eligible_default_branch(repo) {
                Ok(default_branch) => {
                    let target_ref = resolve_branch(self.options.branch.as_deref(), default_branch, RefForm::Full);
                    let path =
                        endpoints::completed_pull_requests(self.versions, &repo.name, &target_ref, self.options.pull_request_count);
                    self.fetch_list(project.url(), &path).await
                }
                Err(reason) => FetchOutcome::Skipped(reason),
            };

            result.push(Collected::new(&repo.name, outcome));
        }

        result
    }

    /// Builds of the project.
    ///
    /// By default the latest build of every definition is listed first, then each definition's
    /// history is fetched on its own. With `latest_builds_only` a single listing is made instead.
    pub async fn builds(&self, project: &ProjectRef) -> Vec<Collected<Vec<Build>>> {
        let from_date = self.options.from_date.as_deref();

        if self.options.latest_builds_only {
            let path = endpoints::builds(self.versions, None, self.options.build_count, from_date);
            return vec![Collected::new(project.name(), self.fetch_list(project.url(), &path).await)];
        }

        let path = endpoints::latest_build_per_definition(self.versions, from_date);
        let latest: Vec<Build> = match self.fetch_list(project.url(), &path).await {
            FetchOutcome::Fetched(latest) => latest,
            other => return vec![Collected::new(project.name(), other)],
        };

        log::info!(target: LOG_TARGET, "Found {} build definitions in {}", latest.len(), project.name());

        let mut result = Vec::with_capacity(latest.len());
        for definition in latest.iter().map(|b| &b.definition) {
            let path = endpoints::builds(self.versions, Some(definition.id), self.options.build_count, from_date);
            result.push(Collected::new(&definition.name, self.fetch_list(project.url(), &path).await));
        }

        result
    }

    /// Artifacts of every given build.
    pub async fn build_artifacts<'b>(
        &self,
        project: &ProjectRef,
        builds: impl IntoIterator<Item = &'b Build>,
    ) -> Vec<Collected<BuildArtifacts>> {
        let mut result = Vec::new();
        for build in builds {
            let path = endpoints::build_artifacts(self.versions, build.id);
            let outcome = self.fetch_list(project.url(), &path).await.map(|artifacts| BuildArtifacts {
                build_id: build.id,
                build_number: build.build_number.clone(),
                definition: build.definition.name.clone(),
                artifacts,
            });

            result.push(Collected::new(&build.build_number, outcome));
        }

        result
    }

    /// Every project of the collection.
    pub async fn projects(&self, collection_url: &str) -> FetchOutcome<Vec<Project>> {
        self.fetch_list(collection_url, &endpoints::projects(self.versions)).await
    }

    /// Every team of the collection.
    pub async fn teams(&self, collection_url: &str) -> FetchOutcome<Vec<Team>> {
        self.fetch_list(collection_url, &endpoints::teams(self.versions)).await
    }

    /// Members of every given team.
    pub async fn team_members(&self, collection_url: &str, teams: &[Team]) -> Vec<Collected<TeamMembers>> {
        let mut result = Vec::with_capacity(teams.len());
        for team in teams {
            let path = endpoints::team_members(self.versions, &team.project_name, &team.name);
            let outcome = self.fetch_list(collection_url, &path).await.map(|members| TeamMembers {
                project_name: team.project_name.clone(),
                team_name: team.name.clone(),
                members,
            });

            result.push(Collected::new(&team.name, outcome));
        }

        result
    }

    /// Area paths owned by each team of the given project; teams of other projects are ignored.
    ///
    /// Project names compare case-insensitively, as the service treats them.
    pub async fn team_area_paths(&self, project: &ProjectRef, teams: &[Team]) -> Vec<Collected<TeamAreaPaths>> {
        let project_name = project.name().to_lowercase();
        let mut result = Vec::new();
        for team in teams.iter().filter(|t| t.project_name.to_lowercase() == project_name) {
            let path = endpoints::team_field_values(self.versions, &team.name);
            let outcome = self
                .fetch::<TeamFieldValues>(project.url(), &path)
                .await
                .map(|field_values| TeamAreaPaths {
                    team_name: team.name.clone(),
                    values: field_values.values,
                });

            result.push(Collected::new(&team.name, outcome));
        }

        result
    }
}

/// The default branch of a repository whose history can be read.
///
/// Repositories without a default branch are empty, and disabled repositories reject reads.
fn eligible_default_branch(repo: &Repository) -> Result<&str, SkipReason> {
    if repo.is_disabled == Some(true) {
        return Err(SkipReason::Disabled);
    }

    repo.default_branch.as_deref().ok_or(SkipReason::NoDefaultBranch)
}

/// Stamp each commit with the branch it was collected from.
fn tag_commits(commits: &mut [Commit], branch: Option<&str>) {
    if commits.len() > PARALLEL_TAGGING_THRESHOLD {
        commits.par_iter_mut().for_each(|c| c.branch = branch.map(str::to_string));
    } else {
        for c in commits {
            c.branch = branch.map(str::to_string);
        }
    }
}
