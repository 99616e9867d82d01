//! devops-analyzer crate
//!
//! This crate is an implementation detail of the `devops-analyzer` tool. This crate's API is fluid and may change without warning
//! and in a semver-incompatible way.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and run orchestration
//! - [`devops`]: REST client and the typed records the API returns
//! - [`collect`]: Repository filtering, area-path flattening and resource collection
//! - [`reports`]: Row projection and CSV output

/// Result type alias using `ohno::AppError` as the default error type.
pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[doc(hidden)]
pub mod collect;

#[doc(hidden)]
pub mod commands;

#[doc(hidden)]
pub mod devops;

#[doc(hidden)]
pub mod reports;

pub use crate::commands::{Host, run};
