//! reqwest-backed image downloads.

use async_trait::async_trait;
use reqwest::{Client, header};
use tracing::{debug, trace};

use crate::domain::errors::FeedError;
use crate::domain::ports::{FetchedImage, ImageFetchPort};

use crate::infrastructure::USER_AGENT;

/// Downloads image bytes over HTTP.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    /// Creates a fetcher with its own HTTP client.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(timeout: std::time::Duration) -> Result<Self, FeedError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FeedError::Client {
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Creates a fetcher sharing an existing HTTP client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageFetchPort for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedImage, FeedError> {
        trace!(url, "Downloading image");

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            debug!(url, %status, "Image request rejected");
            return Err(FeedError::Status {
                status: status.as_u16(),
            });
        }

        let resolved_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FeedError::network(format!("failed to read body: {e}")))?;

        Ok(FetchedImage {
            resolved_url,
            content_type,
            bytes,
        })
    }
}
