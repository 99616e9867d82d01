//! Access to the Azure DevOps REST API
//!
//! The [`DevOpsApi`] trait is the single seam between the analyzer and the network: it takes a
//! base URL (a project or collection URL) plus a relative path and returns the raw response body,
//! or `None` when the service answers with a non-success status. [`Client`] implements it with
//! `reqwest`; tests substitute canned responses.
//!
//! [`endpoints`] builds the relative paths, and [`models`] holds the typed records the JSON
//! bodies deserialize into.

mod client;
pub mod endpoints;
pub mod models;
mod project_ref;

pub use client::{Client, DevOpsApi, join_url};
pub use endpoints::ApiVersions;
pub use project_ref::ProjectRef;
