// src/core/net.rs
// Sequential, paced HTTP GET over a blocking reqwest client.

use std::thread;
use std::time::{Duration, Instant};

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::RETRY_AFTER;
use tracing::{debug, warn};

use crate::config::options::FetchConfig;
use crate::error::{Result, ScrapeError};

const MAX_RETRY_AFTER: Duration = Duration::from_secs(120);

/// Source of complete page documents. Paths are site-relative (`/leagues/`);
/// absolute URLs pass through.
pub trait Fetch {
    fn fetch(&mut self, path: &str) -> Result<String>;
}

impl<F: Fetch + ?Sized> Fetch for &mut F {
    fn fetch(&mut self, path: &str) -> Result<String> {
        (**self).fetch(path)
    }
}

pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
    last_request: Option<Instant>,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config, last_request: None })
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return s!(path);
        }
        let base = self.config.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            join!(base, path)
        } else {
            join!(base, "/", path)
        }
    }

    /// Be polite: keep at least `pause` between consecutive requests.
    fn pace(&self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.config.pause {
                thread::sleep(self.config.pause - elapsed);
            }
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.config.backoff_base.saturating_mul(1u32 << attempt.min(6))
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&mut self, path: &str) -> Result<String> {
        let url = self.url(path);
        let mut attempt = 0u32;
        loop {
            self.pace();
            debug!(%url, attempt, "GET");
            let resp = self.client.get(&url).send();
            self.last_request = Some(Instant::now());
            let resp = resp?;

            let status = resp.status();
            if status.is_success() {
                return Ok(resp.text()?);
            }

            let retryable = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            if !retryable || attempt >= self.config.max_retries {
                return Err(ScrapeError::Status { url, status: status.as_u16() });
            }
            let wait = retry_after(&resp).unwrap_or_else(|| self.backoff(attempt));
            warn!(%url, status = status.as_u16(), wait_ms = wait.as_millis() as u64, "retrying");
            thread::sleep(wait);
            attempt += 1;
        }
    }
}

fn retry_after(resp: &Response) -> Option<Duration> {
    let secs: u64 = resp.headers().get(RETRY_AFTER)?.to_str().ok()?.trim().parse().ok()?;
    Some(Duration::from_secs(secs).min(MAX_RETRY_AFTER))
}
