//! Azure DevOps REST client
//!
//! Minimal client that issues a single authenticated GET and hands back the response body.

use crate::Result;
use core::time::Duration;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

const LOG_TARGET: &str = "    client";

/// Abstraction over the REST endpoint so collection logic can run against canned responses.
pub trait DevOpsApi: Send + Sync {
    /// Issue a GET for `path_and_query` relative to `base_url`.
    ///
    /// Returns `Ok(None)` when the service answers with a non-success status and `Err` when the
    /// request could not be completed at all.
    fn get(&self, base_url: &str, path_and_query: &str) -> impl Future<Output = Result<Option<String>>> + Send;
}

/// Production client backed by `reqwest`.
#[derive(Clone)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct Client {
    client: reqwest::Client,
    token: Option<String>,
}

impl core::fmt::Debug for Client {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Client")
            .field("client", &self.client)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Client {
    /// Create a client that authenticates every request with a personal access token.
    pub fn new(token: Option<&str>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent("devops-analyzer")
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            token: token.map(str::to_string),
        })
    }
}

impl DevOpsApi for Client {
    async fn get(&self, base_url: &str, path_and_query: &str) -> Result<Option<String>> {
        let url = join_url(base_url, path_and_query);
        log::debug!(target: LOG_TARGET, "GET {url}");

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            // PATs are sent as the password of an empty user name
            request = request.basic_auth("", Some(token));
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            log::info!(target: LOG_TARGET, "GET {url} returned {status}");
            return Ok(None);
        }

        Ok(Some(resp.text().await?))
    }
}

/// Join a base URL and a relative path the way a base address with a trailing slash would.
#[must_use]
pub fn join_url(base_url: &str, path_and_query: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path_and_query.trim_start_matches('/'))
}
