//! Release registry client with bounded throttle retry.

use crate::error::{Error, Result};
use crate::throttle::{RetryPolicy, Sleeper, Throttle, TokioSleeper, classify};
use semver::Version;
use setup_gyro_core::{Release, VersionRequest, select_latest};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// GitHub REST API root.
const API_ROOT: &str = "https://api.github.com";
/// User agent attached to every API request.
const USER_AGENT: &str = concat!("setup-gyro/", env!("CARGO_PKG_VERSION"));
/// Overall timeout for a single metadata request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One attempt's result: either a value or a classified throttle.
pub(crate) enum RequestOutcome<T> {
    /// The request succeeded.
    Ok(T),
    /// The request was throttled; the retry loop decides what happens.
    Throttled(Throttle),
}

/// Client for the release-listing endpoint of one repository.
///
/// Authentication is optional: a token raises the rate-limit ceiling,
/// its absence only lowers it.
pub struct ReleasesClient {
    http: reqwest::Client,
    repo: String,
    token: Option<String>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl ReleasesClient {
    /// Create a client for `owner/name`.
    pub fn new(repo: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            repo: repo.into(),
            token: None,
            policy: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
        })
    }

    /// Attach an optional bearer credential to every request.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Override the delay implementation.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// The `owner/name` repository this client queries.
    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Turn a version request into a concrete, installable version.
    ///
    /// Exact requests resolve without any network activity. `latest`
    /// lists the published releases and reduces them to the maximum
    /// installable semantic version.
    pub async fn resolve(&self, request: &VersionRequest) -> Result<Version> {
        match request {
            VersionRequest::Exact(version) => Ok(version.clone()),
            VersionRequest::Latest => {
                let releases = self.list_releases().await?;
                let version = select_latest(&releases)
                    .and_then(Release::version)
                    .ok_or_else(|| Error::NoReleasesFound {
                        repo: self.repo.clone(),
                    })?;
                info!(%version, repo = %self.repo, "resolved latest release");
                Ok(version)
            }
        }
    }

    /// List the published releases of the repository.
    pub async fn list_releases(&self) -> Result<Vec<Release>> {
        let url = format!("{API_ROOT}/repos/{}/releases", self.repo);
        debug!(%url, "listing releases");
        with_throttle_retry(&self.policy, self.sleeper.as_ref(), &url, || {
            self.fetch_releases(&url)
        })
        .await
    }

    /// One request round trip, with throttle classification.
    async fn fetch_releases(&self, url: &str) -> Result<RequestOutcome<Vec<Release>>> {
        let mut request = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(RequestOutcome::Ok(response.json().await?));
        }

        let headers = response.headers().clone();
        let message = api_message(response).await;
        match classify(status, &headers, &message) {
            Some(throttle) => Ok(RequestOutcome::Throttled(throttle)),
            None => Err(Error::Api {
                url: url.to_string(),
                status,
                message,
            }),
        }
    }
}

/// Best-effort extraction of the API error body's `message` field.
async fn api_message(response: reqwest::Response) -> String {
    response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|body| {
            body.get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_default()
}

/// Run an attempt through the bounded throttle-retry loop.
///
/// Primary throttles are retried after the server-specified (clamped)
/// wait, up to `policy.max_retries` retries. Secondary throttles fail
/// immediately. Only the current attempt is ever in flight; the delay
/// happens strictly between attempts.
pub(crate) async fn with_throttle_retry<T, F, Fut>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    url: &str,
    mut attempt: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<RequestOutcome<T>>>,
{
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        match attempt().await? {
            RequestOutcome::Ok(value) => return Ok(value),
            RequestOutcome::Throttled(Throttle::Secondary) => {
                warn!(method = "GET", %url, "secondary rate limit hit; not retrying");
                return Err(Error::AbuseDetected {
                    url: url.to_string(),
                });
            }
            RequestOutcome::Throttled(Throttle::Primary { retry_after }) => {
                if attempts > policy.max_retries {
                    warn!(
                        method = "GET",
                        %url,
                        attempts,
                        "primary rate limit still in effect; giving up"
                    );
                    return Err(Error::RateLimited {
                        url: url.to_string(),
                        attempts,
                    });
                }
                let delay = policy.delay_for(retry_after);
                warn!(
                    method = "GET",
                    %url,
                    attempts,
                    delay_secs = delay.as_secs(),
                    "primary rate limit hit; retrying after delay"
                );
                sleeper.sleep(delay).await;
            }
        }
    }
}
