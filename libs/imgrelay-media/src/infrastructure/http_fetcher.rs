//! HTTP Source Fetcher Implementation
//!
//! This module implements the `SourceFetcher` trait over `reqwest`. A single
//! GET per call, default redirect policy, no retry, bounded timeout. Every
//! code path settles with `Ok` or `Err`; a non-success status is an error.

use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, instrument, warn};

use imgrelay_domain::{ports::SourceFetcher, resolution::error::ResolutionError};

/// Default bound on a single upstream fetch
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// reqwest-based implementation of the SourceFetcher port
///
/// ## Timeout
///
/// An unbounded wait on the upstream origin would pin request-handling
/// capacity, so every fetch carries a total-request timeout. Timeouts map to
/// `ResolutionError::FetchTimeout`, everything else to `ResolutionError::Fetch`.
#[derive(Clone)]
pub struct HttpSourceFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpSourceFetcher {
    /// Create a fetcher with the default timeout
    pub fn new() -> Result<Self, ResolutionError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a fetcher with an explicit timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, ResolutionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| {
                ResolutionError::config(format!("Failed to build HTTP client: {}", err))
            })?;
        Ok(Self { client, timeout })
    }

    /// The configured fetch timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl SourceFetcher for HttpSourceFetcher {
    #[instrument(skip(self), fields(url = %source_url))]
    fn fetch(
        &self,
        source_url: &str,
    ) -> impl std::future::Future<Output = Result<Bytes, ResolutionError>> + Send {
        let client = self.client.clone();
        let url = source_url.to_string();

        async move {
            debug!("Fetching source asset");

            let response = client.get(&url).send().await.map_err(|err| {
                if err.is_timeout() {
                    warn!(url = %url, "Upstream fetch timed out");
                    ResolutionError::fetch_timeout(format!("GET {} timed out: {}", url, err))
                } else {
                    warn!(url = %url, error = %err, "Upstream fetch failed");
                    ResolutionError::fetch(format!("GET {} failed: {}", url, err))
                }
            })?;

            let status = response.status();
            if !status.is_success() {
                warn!(url = %url, status = %status, "Upstream responded with non-success status");
                return Err(ResolutionError::fetch(format!(
                    "GET {} returned status {}",
                    url, status
                )));
            }

            let body = response.bytes().await.map_err(|err| {
                if err.is_timeout() {
                    ResolutionError::fetch_timeout(format!("GET {} body timed out: {}", url, err))
                } else {
                    ResolutionError::fetch(format!("GET {} body read failed: {}", url, err))
                }
            })?;

            debug!(size = body.len(), "Fetched source asset");
            Ok(body)
        }
    }
}
