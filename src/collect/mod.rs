//! Selecting repositories and collecting their activity
//!
//! This module sits between the REST client and the reports. It decides which repositories
//! take part in a run, walks the area-path tree, and issues every resource request.
//!
//! # Implementation Model
//!
//! - [`RepositoryFilter`] sorts repositories by name and applies an ordered list of
//!   case-insensitive patterns, in include or exclude mode.
//! - [`flatten`] turns an area-path tree into rows with an explicit stack, so arbitrarily deep
//!   trees never recurse.
//! - [`Collector`] makes one request per repository (or per build, or per team) and records a
//!   [`FetchOutcome`] for each. Failures stay local to the call that produced them.
//!
//! Repositories without a default branch, and disabled repositories, are never queried for
//! commits, pushes or pull requests; they show up as [`FetchOutcome::Skipped`].

mod area_paths;
mod branch;
mod collector;
mod filter;
mod outcome;

pub use area_paths::{AreaPathRow, AreaPaths, flatten, rewrite_area_path};
pub use branch::{RefForm, resolve_branch};
pub use collector::{BuildArtifacts, CollectOptions, Collector, TeamAreaPaths, TeamMembers};
pub use filter::{FilterDecision, FilterMode, RepositoryFilter, filter_repositories};
pub use outcome::{Collected, FetchOutcome, SkipReason};
