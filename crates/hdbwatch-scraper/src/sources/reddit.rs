//! Reddit review collector (client-credentials OAuth).

use std::collections::HashSet;

use chrono::Utc;
use hdbwatch_classify::review::{clean_text, is_quality_review};
use hdbwatch_classify::PolarityScorer;
use hdbwatch_core::{AppConfig, Review};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::client::{check_status, FetchClient};
use crate::error::ScraperError;

use super::reddit_helpers::review_from_post;

pub const SUBREDDITS: &[&str] = &["askSingapore", "singaporefi", "singapore"];
pub const SEARCH_LIMIT: usize = 15;
const MAX_COMMENTS: usize = 20;
const MIN_COMMENT_CHARS: usize = 20;

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE: &str = "https://oauth.reddit.com";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Listing<T> {
    data: ListingData<T>,
}

#[derive(Debug, Deserialize)]
struct ListingData<T> {
    #[serde(default = "Vec::new")]
    children: Vec<Thing<T>>,
}

#[derive(Debug, Deserialize)]
struct Thing<T> {
    data: T,
}

/// The fields of a search result that become a review.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostData {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub num_comments: i64,
    #[serde(default)]
    pub created_utc: f64,
}

/// Comment listings mix `t1` comments with `more` stubs, so every field is optional.
#[derive(Debug, Deserialize)]
struct CommentData {
    #[serde(default)]
    body: Option<String>,
}

/// Script-app credentials for the client-credentials grant.
#[derive(Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl std::fmt::Debug for RedditCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditCredentials")
            .field("client_id", &"[redacted]")
            .field("client_secret", &"[redacted]")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl RedditCredentials {
    /// # Errors
    ///
    /// Returns [`ScraperError::Reddit`] if the client id or secret is unset.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        let (Some(client_id), Some(client_secret)) = (
            config.reddit_client_id.clone(),
            config.reddit_client_secret.clone(),
        ) else {
            return Err(ScraperError::Reddit(
                "REDDIT_CLIENT_ID and REDDIT_CLIENT_SECRET must both be set".to_string(),
            ));
        };
        Ok(Self {
            client_id,
            client_secret,
            user_agent: config.reddit_user_agent.clone(),
        })
    }
}

/// Outcome of one Reddit run.
#[derive(Debug, Default)]
pub struct RedditRun {
    pub reviews: Vec<Review>,
    /// Posts rejected by the quality gate.
    pub skipped: usize,
}

/// Reddit API client holding a bearer token.
pub struct RedditClient {
    fetch: FetchClient,
    token: String,
    user_agent: String,
    api_base: String,
}

impl RedditClient {
    /// Exchange credentials for a token against the live endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Reddit`] if the token exchange is rejected, or
    /// [`ScraperError::Http`] on network failure.
    pub async fn connect(fetch: FetchClient, creds: &RedditCredentials) -> Result<Self, ScraperError> {
        Self::connect_with_endpoints(fetch, creds, TOKEN_URL, API_BASE).await
    }

    /// Like [`RedditClient::connect`] with explicit token and API endpoints.
    ///
    /// # Errors
    ///
    /// See [`RedditClient::connect`].
    pub async fn connect_with_endpoints(
        fetch: FetchClient,
        creds: &RedditCredentials,
        token_url: &str,
        api_base: &str,
    ) -> Result<Self, ScraperError> {
        let response = fetch
            .http()
            .post(token_url)
            .header(reqwest::header::USER_AGENT, &creds.user_agent)
            .basic_auth(&creds.client_id, Some(&creds.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ScraperError::Reddit(format!(
                "token exchange failed with status {}",
                response.status()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ScraperError::Reddit(format!("token parse error: {e}")))?;

        Ok(Self {
            fetch,
            token: token.access_token,
            user_agent: creds.user_agent.clone(),
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, ScraperError> {
        let response = self
            .fetch
            .http()
            .get(url)
            .bearer_auth(&self.token)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(params)
            .send()
            .await?;
        let body = check_status(response, url)?.text().await?;
        serde_json::from_str(&body).map_err(|source| ScraperError::Deserialize {
            context: url.to_string(),
            source,
        })
    }

    /// Top posts of the past year in `subreddit` matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::RateLimited`] on 429, or any other request or
    /// decoding error.
    pub async fn search(&self, subreddit: &str, query: &str) -> Result<Vec<PostData>, ScraperError> {
        let url = format!("{}/r/{subreddit}/search", self.api_base);
        let params = [
            ("q", query.to_string()),
            ("restrict_sr", "true".to_string()),
            ("sort", "relevance".to_string()),
            ("t", "year".to_string()),
            ("limit", SEARCH_LIMIT.to_string()),
            ("raw_json", "1".to_string()),
        ];
        let listing: Listing<PostData> = self.get_json(&url, &params).await?;
        Ok(listing.data.children.into_iter().map(|t| t.data).collect())
    }

    /// Cleaned bodies of the first top-level comments on a post, keeping
    /// only those long enough to carry an opinion.
    ///
    /// # Errors
    ///
    /// Returns any request or decoding error.
    pub async fn comments(&self, subreddit: &str, post_id: &str) -> Result<Vec<String>, ScraperError> {
        let url = format!("{}/r/{subreddit}/comments/{post_id}", self.api_base);
        let params = [
            ("limit", MAX_COMMENTS.to_string()),
            ("depth", "1".to_string()),
            ("raw_json", "1".to_string()),
        ];
        // [post listing, comment listing]
        let listings: Vec<Listing<CommentData>> = self.get_json(&url, &params).await?;
        Ok(listings
            .into_iter()
            .nth(1)
            .map(|comments| {
                comments
                    .data
                    .children
                    .into_iter()
                    .take(MAX_COMMENTS)
                    .filter_map(|c| c.data.body)
                    .filter(|body| body.chars().count() > MIN_COMMENT_CHARS)
                    .map(|body| clean_text(&body))
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Run every query against every subreddit and convert posts that pass
    /// the quality gate. A post id is only processed once per run.
    ///
    /// A failed search is logged and skipped; on 429 the run pauses first.
    pub async fn collect_reviews<S: PolarityScorer + ?Sized>(
        &self,
        scorer: &S,
        subreddits: &[&str],
        queries: &[String],
    ) -> RedditRun {
        let mut run = RedditRun::default();
        let mut seen: HashSet<String> = HashSet::new();
        let pacing = self.fetch.pacing();

        for subreddit in subreddits {
            for query in queries {
                let posts = match self.search(subreddit, query).await {
                    Ok(posts) => posts,
                    Err(e) => {
                        pacing.after_error(subreddit, &e).await;
                        continue;
                    }
                };

                for post in posts {
                    if !seen.insert(post.id.clone()) {
                        continue;
                    }
                    if !is_quality_review(&post.title, &post.selftext) {
                        run.skipped += 1;
                        continue;
                    }
                    let comments = self.comments(subreddit, &post.id).await.unwrap_or_else(|e| {
                        tracing::debug!(post_id = %post.id, error = %e, "comments unavailable");
                        Vec::new()
                    });
                    let review = review_from_post(scorer, &post, subreddit, &comments, Utc::now());
                    tracing::debug!(
                        review_id = %review.review_id,
                        rating = review.rating,
                        locations = ?review.locations,
                        "accepted post"
                    );
                    run.reviews.push(review);
                }

                pacing.between_requests().await;
            }
            tracing::info!(
                subreddit,
                reviews = run.reviews.len(),
                skipped = run.skipped,
                "subreddit searched"
            );
        }

        run
    }
}
