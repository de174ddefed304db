//! Shared HTTP client for every collector.

use std::time::Duration;

use hdbwatch_core::AppConfig;
use reqwest::{Client, Response, StatusCode};

use crate::error::ScraperError;
use crate::rate_limit::Pacing;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// A `reqwest` client with a per-request timeout, a browser-like
/// `User-Agent`, and the pacing every collector observes.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: Client,
    pacing: Pacing,
}

impl FetchClient {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str, pacing: Pacing) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, pacing })
    }

    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            config.request_timeout_secs,
            &config.user_agent,
            Pacing::from_config(config),
        )
    }

    #[must_use]
    pub fn http(&self) -> &Client {
        &self.client
    }

    #[must_use]
    pub fn pacing(&self) -> &Pacing {
        &self.pacing
    }

    /// GET `url` and return the body as text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`] on HTTP 429.
    /// - [`ScraperError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ScraperError::Http`] on network or TLS failure.
    pub async fn get_text(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-SG,en;q=0.9")
            .send()
            .await?;
        let response = check_status(response, url)?;
        Ok(response.text().await?)
    }
}

/// Map 429 and other non-2xx statuses to typed errors.
///
/// # Errors
///
/// Returns [`ScraperError::RateLimited`] or [`ScraperError::UnexpectedStatus`].
pub(crate) fn check_status(response: Response, url: &str) -> Result<Response, ScraperError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return Err(ScraperError::RateLimited {
            url: url.to_owned(),
            retry_after_secs,
        });
    }

    if !status.is_success() {
        return Err(ScraperError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_owned(),
        });
    }

    Ok(response)
}
