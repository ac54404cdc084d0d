use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

/// Fixed identifying header sent with every request.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (compatible; SeoGapAnalyzer/1.0; +https://example.com/bot)";

pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Fetch failure, surfaced to the caller. No retries here: one call, one
/// outbound request; the caller owns retry policy.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GET {url} timed out")]
    Timeout { url: String },
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Blocking HTTP fetcher with a fixed User-Agent and request timeout.
pub struct HttpClient {
    client: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(HttpClient { client })
    }

    /// Fetch raw HTML. Errors on timeout, transport failure or any non-2xx
    /// status after redirects.
    pub fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let started = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(|e| classify(url, e))?;
        debug!(
            url,
            bytes = body.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "fetched"
        );
        Ok(body)
    }
}

fn classify(url: &str, source: reqwest::Error) -> FetchError {
    if source.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            source,
        }
    }
}

/// Politeness gate for batch callers: blocks until at least `min_interval`
/// has elapsed since the previous `wait` call. Monotonic clock only.
pub struct RateGate {
    min_interval: Duration,
    last: Option<Instant>,
}

impl RateGate {
    pub fn new(min_interval: Duration) -> Self {
        RateGate {
            min_interval,
            last: None,
        }
    }

    pub fn wait(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                thread::sleep(self.min_interval - elapsed);
            }
        }
        self.last = Some(Instant::now());
    }
}
