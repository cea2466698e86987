//! Photo feed HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::{CommentsResponse, PhotosResponse};
use crate::domain::entities::{Comment, PhotoId, PhotoRecord};
use crate::domain::errors::FeedError;
use crate::domain::ports::PhotoFeedPort;
use crate::infrastructure::USER_AGENT;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.500px.com/v1";

const POPULAR_FEATURE: &str = "popular";

/// Connection settings for [`FiveHundredPxClient`].
#[derive(Debug, Clone)]
pub struct FiveHundredPxConfig {
    /// API base URL without trailing slash.
    pub base_url: String,
    /// Consumer key sent with every request.
    pub consumer_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for FiveHundredPxConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            consumer_key: String::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Feed and comments client.
#[derive(Debug, Clone)]
pub struct FiveHundredPxClient {
    client: Client,
    base_url: String,
    consumer_key: String,
}

impl FiveHundredPxClient {
    /// Creates a client from config.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(config: FiveHundredPxConfig) -> Result<Self, FeedError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| FeedError::Client {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            consumer_key: config.consumer_key,
        })
    }

    /// Returns the underlying HTTP client, for sharing with other adapters.
    #[must_use]
    pub fn http_client(&self) -> Client {
        self.client.clone()
    }

    #[must_use]
    pub fn photos_url(&self) -> String {
        format!("{}/photos", self.base_url)
    }

    #[must_use]
    pub fn comments_url(&self) -> String {
        format!("{}/comments", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, FeedError> {
        let mut request = self.client.get(url).query(query);
        if !self.consumer_key.is_empty() {
            request = request.query(&[("consumer_key", self.consumer_key.as_str())]);
        }

        let response = request.send().await.map_err(|e| {
            warn!(error = %e, url, "Request failed");
            FeedError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                warn!("Feed service rejected the consumer key");
            }
            return Err(FeedError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FeedError::network(format!("failed to read body: {e}")))?;

        serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, url, "Failed to parse response");
            FeedError::from(e)
        })
    }
}

#[async_trait]
impl PhotoFeedPort for FiveHundredPxClient {
    async fn fetch_page(&self, page: u32) -> Result<Vec<PhotoRecord>, FeedError> {
        debug!(page, "Fetching popular photos");

        let response: PhotosResponse = self
            .get_json(
                &self.photos_url(),
                &[
                    ("feature", POPULAR_FEATURE.to_string()),
                    ("page", page.to_string()),
                ],
            )
            .await?;

        debug!(
            page,
            count = response.photos.len(),
            total_pages = ?response.total_pages,
            "Received feed page"
        );
        Ok(response.photos)
    }

    async fn fetch_comments(
        &self,
        photo_id: PhotoId,
        page: u32,
    ) -> Result<Vec<Comment>, FeedError> {
        let response: CommentsResponse = self
            .get_json(
                &self.comments_url(),
                &[
                    ("photo_id", photo_id.to_string()),
                    ("page", page.to_string()),
                ],
            )
            .await?;

        Ok(response.into_comments())
    }
}
