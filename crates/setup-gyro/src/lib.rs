//! Install the gyro package manager in GitHub Actions jobs.
//!
//! The binary ties three layers together: version resolution against
//! the release registry, cache-aware artifact acquisition, and the
//! runner's PATH publication protocol.

pub mod cli;
mod error;
pub mod install;

pub use error::{Error, Result};
