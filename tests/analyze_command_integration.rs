//! Integration tests for a full analysis run against a mocked Azure DevOps service
//!
//! These tests drive `devops_analyzer::run` end to end: argument parsing, REST calls served by
//! wiremock, row projection, and the CSV files written to a temporary output directory.

use camino::Utf8PathBuf;
use devops_analyzer::Host;
use serde_json::json;
use std::fs;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test host that captures output to in-memory buffers.
struct TestHost {
    output_buf: Vec<u8>,
    error_buf: Vec<u8>,
    exit_code: Option<i32>,
}

impl TestHost {
    const fn new() -> Self {
        Self {
            output_buf: Vec::new(),
            error_buf: Vec::new(),
            exit_code: None,
        }
    }

    fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }

    fn error_str(&self) -> String {
        String::from_utf8_lossy(&self.error_buf).into_owned()
    }
}

impl Host for TestHost {
    fn output(&mut self) -> impl std::io::Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl std::io::Write {
        &mut self.error_buf
    }

    fn exit(&mut self, code: i32) {
        self.exit_code = Some(code);
    }
}

/// Output directory plus a configuration file pinning the calendar to UTC and ISO weeks.
struct Workspace {
    _guard: tempfile::TempDir,
    dir: Utf8PathBuf,
    config: Utf8PathBuf,
}

fn workspace() -> Workspace {
    let guard = tempfile::tempdir().expect("create temp dir");
    let dir = Utf8PathBuf::from_path_buf(guard.path().to_path_buf()).expect("UTF-8 temp dir");
    let config = dir.join("analyzer.toml");
    fs::write(&config, "[calendar]\ntime_zone = \"utc\"\nweek_rule = \"iso\"\nfirst_day_of_week = \"monday\"\n")
        .expect("write config");

    Workspace {
        _guard: guard,
        dir,
        config,
    }
}

fn repository(server: &MockServer, project: &str, name: &str) -> serde_json::Value {
    json!({
        "id": format!("{project}-{name}-id"),
        "name": name,
        "defaultBranch": "refs/heads/main",
        "project": { "name": project },
        "remoteUrl": format!("{}/contoso/{project}/_git/{name}", server.uri()),
    })
}

fn commit(server: &MockServer, project: &str, repo: &str, id: &str) -> serde_json::Value {
    json!({
        "commitId": id,
        "author": { "name": "Ada", "email": "ada@contoso.com", "date": "2024-03-01T10:00:00Z" },
        "committer": { "name": "Ada", "email": "ada@contoso.com", "date": "2024-03-01T10:05:00Z" },
        "comment": "Fix the build, again",
        "changeCounts": { "Add": 1, "Delete": 2, "Edit": 3 },
        "remoteUrl": format!("{}/contoso/{project}/_git/{repo}/commit/{id}", server.uri()),
    })
}

async fn mount_json(server: &MockServer, url_path: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn read_csv(path: &Utf8PathBuf) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).expect("open CSV");
    let headers = reader.headers().expect("headers").iter().map(str::to_string).collect();
    let records = reader
        .records()
        .map(|r| r.expect("record").iter().map(str::to_string).collect())
        .collect();
    (headers, records)
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call sockets")]
async fn test_two_projects_share_one_header() {
    let server = MockServer::start().await;
    let ws = workspace();

    for project in ["A", "B"] {
        mount_json(
            &server,
            &format!("/contoso/{project}/_apis/git/repositories"),
            json!({ "count": 1, "value": [repository(&server, project, "alpha")] }),
        )
        .await;

        Mock::given(method("GET"))
            .and(path(format!("/contoso/{project}/_apis/git/repositories/alpha/commits")))
            .and(query_param("searchCriteria.itemVersion.version", "main"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 2,
                "value": [commit(&server, project, "alpha", "c1"), commit(&server, project, "alpha", "c2")]
            })))
            .mount(&server)
            .await;
    }

    let projects = format!("{0}/contoso/A,{0}/contoso/B", server.uri());
    let mut host = TestHost::new();
    let result = devops_analyzer::run(
        &mut host,
        [
            "devops-analyzer",
            "--project",
            projects.as_str(),
            "--skip-pushes",
            "--skip-pull-requests",
            "--identifier",
            "contoso",
            "--output-dir",
            ws.dir.as_str(),
            "--config",
            ws.config.as_str(),
            "--color",
            "never",
        ],
    )
    .await;

    assert!(result.is_ok(), "run failed: {result:?}");
    assert_eq!(host.exit_code, None);
    assert!(host.error_str().is_empty(), "unexpected warnings: {}", host.error_str());

    let commits_path = ws.dir.join("multi-commits.csv");
    let text = fs::read_to_string(&commits_path).expect("read commits");
    assert_eq!(text.matches("projecturl,").count(), 1);

    let (headers, records) = read_csv(&commits_path);
    assert_eq!(records.len(), 4);

    let column = |name: &str| headers.iter().position(|h| h == name).expect(name);
    let first = &records[0];
    assert_eq!(first[column("projecturl")], format!("{}/contoso/A", server.uri()));
    assert_eq!(first[column("repository")], "alpha");
    assert_eq!(first[column("branch")], "main");
    assert_eq!(first[column("isinternal")], "true");
    assert_eq!(first[column("comment")], "Fix the build, again");
    assert_eq!(first[column("dayofweek")], "Friday");
    assert_eq!(first[column("weekofyear")], "9");
    assert_eq!(first[column("hour")], "10");
    assert_eq!(records[3][column("projecturl")], format!("{}/contoso/B", server.uri()));

    let (_, repos) = read_csv(&ws.dir.join("multi-repositories.csv"));
    assert_eq!(repos.len(), 2);

    let output = host.output_str();
    assert!(output.contains("Writing 4 commits"), "{output}");
    assert!(output.contains("Summary"), "{output}");
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call sockets")]
async fn test_failing_repository_does_not_abort_the_run() {
    let server = MockServer::start().await;
    let ws = workspace();

    mount_json(
        &server,
        "/contoso/Fabrikam/_apis/git/repositories",
        json!({
            "count": 2,
            "value": [repository(&server, "Fabrikam", "alpha"), repository(&server, "Fabrikam", "beta")]
        }),
    )
    .await;

    mount_json(
        &server,
        "/contoso/Fabrikam/_apis/git/repositories/alpha/commits",
        json!({ "count": 1, "value": [commit(&server, "Fabrikam", "alpha", "c1")] }),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/contoso/Fabrikam/_apis/git/repositories/beta/commits"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let project = format!("{}/contoso/Fabrikam", server.uri());
    let mut host = TestHost::new();
    let result = devops_analyzer::run(
        &mut host,
        [
            "devops-analyzer",
            "-u",
            project.as_str(),
            "--skip-pushes",
            "--skip-pull-requests",
            "--no-messages",
            "--output-dir",
            ws.dir.as_str(),
            "--config",
            ws.config.as_str(),
            "--color",
            "never",
        ],
    )
    .await;

    assert!(result.is_ok(), "run failed: {result:?}");

    let errors = host.error_str();
    assert!(errors.contains("WARNING:"), "{errors}");
    assert!(errors.contains("beta"), "{errors}");

    let (headers, records) = read_csv(&ws.dir.join("Fabrikam-commits.csv"));
    assert_eq!(records.len(), 1);
    let comment = headers.iter().position(|h| h == "comment").expect("comment column");
    assert_eq!(records[0][comment], "");

    assert!(host.output_str().contains("1 unavailable"), "{}", host.output_str());
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call sockets")]
async fn test_filter_and_skipped_repositories() {
    let server = MockServer::start().await;
    let ws = workspace();

    let mut empty = repository(&server, "Fabrikam", "empty");
    empty["defaultBranch"] = serde_json::Value::Null;

    mount_json(
        &server,
        "/contoso/Fabrikam/_apis/git/repositories",
        json!({
            "count": 3,
            "value": [
                repository(&server, "Fabrikam", "legacy-tool"),
                repository(&server, "Fabrikam", "service"),
                empty,
            ]
        }),
    )
    .await;

    mount_json(
        &server,
        "/contoso/Fabrikam/_apis/git/repositories/service/commits",
        json!({ "count": 1, "value": [commit(&server, "Fabrikam", "service", "c1")] }),
    )
    .await;

    let project = format!("{}/contoso/Fabrikam", server.uri());
    let mut host = TestHost::new();
    let result = devops_analyzer::run(
        &mut host,
        [
            "devops-analyzer",
            "-u",
            project.as_str(),
            "--filter",
            "^legacy",
            "--exclusion",
            "--skip-pushes",
            "--skip-pull-requests",
            "--output-dir",
            ws.dir.as_str(),
            "--config",
            ws.config.as_str(),
            "--color",
            "never",
        ],
    )
    .await;

    assert!(result.is_ok(), "run failed: {result:?}");
    assert!(host.error_str().is_empty(), "unexpected warnings: {}", host.error_str());

    let (headers, repos) = read_csv(&ws.dir.join("Fabrikam-repositories.csv"));
    let name = headers.iter().position(|h| h == "name").expect("name column");
    let names: Vec<_> = repos.iter().map(|r| r[name].as_str()).collect();
    assert_eq!(names, ["empty", "service"]);

    let (_, commits) = read_csv(&ws.dir.join("Fabrikam-commits.csv"));
    assert_eq!(commits.len(), 1);

    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests.iter().all(|r| !r.url.path().contains("legacy-tool")));
    assert!(requests.iter().all(|r| !r.url.path().contains("/empty/")));
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call sockets")]
async fn test_base_information_is_collected_from_the_collection() {
    let server = MockServer::start().await;
    let ws = workspace();

    mount_json(
        &server,
        "/contoso/_apis/projects",
        json!({ "count": 1, "value": [{ "id": "p1", "name": "Fabrikam" }] }),
    )
    .await;

    mount_json(
        &server,
        "/contoso/_apis/teams",
        json!({ "count": 1, "value": [{ "id": "t1", "name": "Web", "projectName": "Fabrikam" }] }),
    )
    .await;

    mount_json(
        &server,
        "/contoso/_apis/projects/Fabrikam/teams/Web/members",
        json!({ "count": 1, "value": [{ "isTeamAdmin": true, "identity": { "displayName": "Ada", "uniqueName": "ada@contoso.com" } }] }),
    )
    .await;

    mount_json(&server, "/contoso/Fabrikam/_apis/git/repositories", json!({ "count": 0, "value": [] })).await;

    mount_json(
        &server,
        "/contoso/Fabrikam/_apis/wit/classificationnodes/areas",
        json!({
            "name": "Fabrikam",
            "path": "\\Fabrikam\\Area",
            "hasChildren": true,
            "children": [{ "name": "Web", "path": "\\Fabrikam\\Area\\Web", "hasChildren": false }]
        }),
    )
    .await;

    mount_json(
        &server,
        "/contoso/Fabrikam/Web/_apis/work/teamsettings/teamfieldvalues",
        json!({ "values": [{ "value": "Fabrikam\\Web", "includeChildren": true }] }),
    )
    .await;

    let collection = format!("{}/contoso", server.uri());
    let project = format!("{collection}/Fabrikam");
    let mut host = TestHost::new();
    let result = devops_analyzer::run(
        &mut host,
        [
            "devops-analyzer",
            "-u",
            project.as_str(),
            "-x",
            collection.as_str(),
            "--skip-base",
            "false",
            "--skip-commits",
            "--skip-pushes",
            "--skip-pull-requests",
            "--output-dir",
            ws.dir.as_str(),
            "--config",
            ws.config.as_str(),
            "--color",
            "never",
        ],
    )
    .await;

    assert!(result.is_ok(), "run failed: {result:?}");
    assert!(host.error_str().is_empty(), "unexpected warnings: {}", host.error_str());

    let (_, projects) = read_csv(&ws.dir.join("projects.csv"));
    assert_eq!(projects, [vec![collection.clone(), "p1".to_string(), "Fabrikam".to_string()]]);

    let (_, members) = read_csv(&ws.dir.join("teammembers.csv"));
    assert_eq!(members.len(), 1);

    let (_, areas) = read_csv(&ws.dir.join("Fabrikam-areapaths.csv"));
    let paths: Vec<_> = areas.iter().map(|r| r[1].as_str()).collect();
    assert_eq!(paths, ["Fabrikam", "Fabrikam\\Web"]);

    let (_, team_areas) = read_csv(&ws.dir.join("Fabrikam-teamareapaths.csv"));
    assert_eq!(team_areas.len(), 1);
}
