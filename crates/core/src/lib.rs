//! Shared data model for setup-gyro.
//!
//! This crate holds everything both the registry client and the
//! acquisition pipeline need to agree on:
//!
//! - [`VersionRequest`] - parsed user input (`latest` or an exact version)
//! - [`Release`] and [`select_latest`] - the release wire record and the
//!   pure "maximum installable version" fold
//! - [`Os`], [`ArchiveFormat`], [`Artifact`] - host platform mapping and
//!   deterministic archive naming
//! - [`ToolCache`] - the reusable local install cache
//! - [`runner`] - GitHub Actions environment-file and workflow-command
//!   integration

mod cache;
mod error;
mod platform;
mod release;
pub mod runner;
mod version;

pub use cache::ToolCache;
pub use error::{Error, Result};
pub use platform::{ArchiveFormat, Artifact, Os};
pub use release::{Release, select_latest};
pub use version::VersionRequest;
