//! Rate-limit-aware client for the GitHub release registry.
//!
//! Exposes one capability: turning a version request for a repository
//! into a concrete, installable release version. Primary rate limits
//! are retried a bounded number of times after the server-specified
//! wait; secondary (abuse-detection) limits fail immediately.

mod client;
mod error;
mod throttle;

pub use client::ReleasesClient;
pub use error::{Error, Result};
pub use throttle::{RetryPolicy, Sleeper, Throttle, TokioSleeper, classify};
