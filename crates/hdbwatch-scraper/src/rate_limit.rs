//! Sleep-based pacing between upstream requests.
//!
//! Scrapers never retry. They pause a fixed interval between feeds, pages and
//! search queries, and when an upstream answers 429 they pause for the
//! configured rate-limit interval and move on to the next request.

use std::time::Duration;

use hdbwatch_core::AppConfig;

use crate::error::ScraperError;

/// Returns `true` if `err` means the upstream asked us to back off.
#[must_use]
pub fn is_rate_limited(err: &ScraperError) -> bool {
    matches!(err, ScraperError::RateLimited { .. })
}

/// Fixed delays applied by every collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Pause between consecutive feeds, pages, and search queries.
    pub between_requests: Duration,
    /// Pause after a 429 before continuing.
    pub rate_limit_pause: Duration,
}

impl Pacing {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            between_requests: Duration::from_millis(config.pacing_ms),
            rate_limit_pause: Duration::from_secs(config.rate_limit_pause_secs),
        }
    }

    /// No delays at all. Used by tests against local mock servers.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            between_requests: Duration::ZERO,
            rate_limit_pause: Duration::ZERO,
        }
    }

    pub async fn between_requests(&self) {
        if !self.between_requests.is_zero() {
            tokio::time::sleep(self.between_requests).await;
        }
    }

    /// Log `err` and, if it was a rate limit, sleep before the caller
    /// continues. Returns whether a rate-limit pause was taken.
    pub async fn after_error(&self, context: &str, err: &ScraperError) -> bool {
        if is_rate_limited(err) {
            tracing::warn!(
                context,
                pause_secs = self.rate_limit_pause.as_secs(),
                error = %err,
                "rate limited; pausing before continuing"
            );
            if !self.rate_limit_pause.is_zero() {
                tokio::time::sleep(self.rate_limit_pause).await;
            }
            true
        } else {
            tracing::warn!(context, error = %err, "request failed; skipping");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate_limited() -> ScraperError {
        ScraperError::RateLimited {
            url: "https://oauth.reddit.com/r/singapore/search".to_owned(),
            retry_after_secs: 60,
        }
    }

    #[test]
    fn only_429_counts_as_rate_limited() {
        assert!(is_rate_limited(&rate_limited()));
        assert!(!is_rate_limited(&ScraperError::UnexpectedStatus {
            status: 500,
            url: "https://www.hdb.gov.sg".to_owned(),
        }));
        assert!(!is_rate_limited(&ScraperError::Reddit("boom".to_owned())));
    }

    #[tokio::test]
    async fn after_error_reports_pause_only_for_rate_limits() {
        let pacing = Pacing::none();
        assert!(pacing.after_error("test", &rate_limited()).await);
        assert!(
            !pacing
                .after_error("test", &ScraperError::Analyzer("bad".to_owned()))
                .await
        );
    }
}
