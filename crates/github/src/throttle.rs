//! Throttle classification and retry policy.
//!
//! GitHub distinguishes two throttling conditions. The primary rate
//! limit (403/429 with `x-ratelimit-remaining: 0`, or a bare
//! `retry-after`) clears once the window resets and is worth a bounded
//! retry. The secondary, abuse-detection limit must never be retried.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Remaining-quota header on rate-limited responses.
const RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";
/// Unix timestamp at which the primary limit window resets.
const RATELIMIT_RESET: &str = "x-ratelimit-reset";

/// A classified throttling condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Throttle {
    /// Primary rate limit; retry after the server-specified wait.
    Primary {
        /// Server-specified wait, when one was given.
        retry_after: Option<Duration>,
    },
    /// Secondary / abuse-detection limit; do not retry.
    Secondary,
}

/// Classify a non-success response as a throttling condition.
///
/// Returns `None` when the response is an ordinary API error rather
/// than throttling. `message` is the `message` field of the error body.
#[must_use]
pub fn classify(status: StatusCode, headers: &HeaderMap, message: &str) -> Option<Throttle> {
    if status != StatusCode::FORBIDDEN && status != StatusCode::TOO_MANY_REQUESTS {
        return None;
    }

    // The secondary limit announces itself in the message body.
    let lowered = message.to_ascii_lowercase();
    if lowered.contains("secondary rate limit") || lowered.contains("abuse") {
        return Some(Throttle::Secondary);
    }

    let retry_after = header_seconds(headers, RETRY_AFTER.as_str());
    if retry_after.is_some() {
        return Some(Throttle::Primary { retry_after });
    }

    let remaining_zero = headers
        .get(RATELIMIT_REMAINING)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0");
    if remaining_zero {
        let reset_delay = headers
            .get(RATELIMIT_RESET)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(|reset| Duration::from_secs(reset.saturating_sub(now_unix())));
        return Some(Throttle::Primary {
            retry_after: reset_delay,
        });
    }

    None
}

fn header_seconds(headers: &HeaderMap, name: &str) -> Option<Duration> {
    headers
        .get(name)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

/// Bounded retry policy for primary rate limits.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt (2 retries = 3 attempts total).
    pub max_retries: u32,
    /// Wait used when the server gave no usable hint.
    pub fallback_delay: Duration,
    /// Cap on the server-specified wait, so a far-off window reset
    /// cannot hang a CI job.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            fallback_delay: Duration::from_secs(30),
            max_delay: Duration::from_secs(120),
        }
    }
}

impl RetryPolicy {
    /// The delay to apply for a primary throttle event.
    #[must_use]
    pub fn delay_for(&self, retry_after: Option<Duration>) -> Duration {
        retry_after.unwrap_or(self.fallback_delay).min(self.max_delay)
    }
}

/// Injected delay, so retry behavior is testable without real waits.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspend the current flow for the given duration.
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                reqwest::header::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn success_statuses_are_not_throttles() {
        assert_eq!(classify(StatusCode::OK, &HeaderMap::new(), ""), None);
        assert_eq!(classify(StatusCode::NOT_FOUND, &HeaderMap::new(), ""), None);
        assert_eq!(
            classify(StatusCode::INTERNAL_SERVER_ERROR, &HeaderMap::new(), ""),
            None
        );
    }

    #[test]
    fn plain_forbidden_is_not_a_throttle() {
        // 403 without limit markers is an authorization problem.
        assert_eq!(
            classify(StatusCode::FORBIDDEN, &HeaderMap::new(), "Resource not accessible"),
            None
        );
    }

    #[test]
    fn retry_after_header_is_primary() {
        let map = headers(&[("retry-after", "7")]);
        assert_eq!(
            classify(StatusCode::FORBIDDEN, &map, "API rate limit exceeded"),
            Some(Throttle::Primary {
                retry_after: Some(Duration::from_secs(7))
            })
        );
    }

    #[test]
    fn exhausted_quota_is_primary() {
        let map = headers(&[("x-ratelimit-remaining", "0")]);
        let classified = classify(StatusCode::TOO_MANY_REQUESTS, &map, "");
        assert!(matches!(classified, Some(Throttle::Primary { .. })));
    }

    #[test]
    fn reset_header_yields_a_delay() {
        let reset = now_unix() + 90;
        let map = headers(&[
            ("x-ratelimit-remaining", "0"),
            ("x-ratelimit-reset", &reset.to_string()),
        ]);
        let Some(Throttle::Primary {
            retry_after: Some(delay),
        }) = classify(StatusCode::FORBIDDEN, &map, "")
        else {
            panic!("expected a primary throttle with a delay");
        };
        // Allow slack for clock movement between the two now_unix reads.
        assert!(delay <= Duration::from_secs(90));
        assert!(delay >= Duration::from_secs(85));
    }

    #[test]
    fn secondary_limit_message_wins_over_headers() {
        let map = headers(&[("retry-after", "60")]);
        assert_eq!(
            classify(
                StatusCode::FORBIDDEN,
                &map,
                "You have exceeded a secondary rate limit. Please wait."
            ),
            Some(Throttle::Secondary)
        );
    }

    #[test]
    fn policy_clamps_and_falls_back() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.delay_for(Some(Duration::from_secs(5))),
            Duration::from_secs(5)
        );
        assert_eq!(policy.delay_for(None), policy.fallback_delay);
        assert_eq!(
            policy.delay_for(Some(Duration::from_secs(3600))),
            policy.max_delay
        );
    }
}
