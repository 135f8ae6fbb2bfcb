//! HTTP client implementation for the Strava v3 API.
//!
//! This module provides a reqwest-based implementation of the [`StravaClient`](crate::StravaClient) trait.

use crate::{Resolution, Stream, StravaClient, StravaError, StreamType, observability};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

/// Client for the Strava API using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestStravaClient {
    base_url: String,
    access_token: SecretString,
    client: reqwest::Client,
}

impl ReqwestStravaClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The API origin (e.g., "https://www.strava.com")
    /// * `access_token` - OAuth access token sent as a bearer credential
    pub fn new(base_url: &str, access_token: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("strava-elevation/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("reqwest client build should not fail");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
            client,
        }
    }

    /// Build an authenticated GET request.
    fn get_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(self.access_token.expose_secret())
    }

    /// Execute a request and parse the body as JSON, reporting shape
    /// mismatches as [`StravaError::InvalidPayload`].
    async fn execute_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, StravaError> {
        let resp = request.send().await?;
        if !resp.status().is_success() {
            return Err(self.error_from_response(resp).await);
        }
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| StravaError::InvalidPayload(e.to_string()))
    }

    /// Extract error information from a failed response.
    ///
    /// Only the first 256 characters of the body are kept, so long error
    /// pages are reported truncated rather than in full.
    async fn error_from_response(&self, resp: reqwest::Response) -> StravaError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();
        StravaError::from_status(status, body_snippet)
    }
}

#[async_trait]
impl StravaClient for ReqwestStravaClient {
    async fn get_segment_streams(
        &self,
        segment_id: &str,
        keys: &[StreamType],
        resolution: Resolution,
    ) -> Result<Vec<Stream>, StravaError> {
        let url = format!(
            "{}/api/v3/segments/{}/streams",
            self.base_url, segment_id
        );
        let keys = keys
            .iter()
            .map(StreamType::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let qp = [("keys", keys.as_str()), ("resolution", resolution.as_str())];
        tracing::debug!("GET {} keys={} resolution={}", url, keys, resolution);

        let result = self
            .execute_json::<Vec<Stream>>(self.get_request(&url).query(&qp))
            .await;
        match &result {
            Ok(streams) => {
                observability::record_stream_request("success");
                tracing::debug!("segment {} returned {} streams", segment_id, streams.len());
            }
            Err(e) => {
                observability::record_stream_request(observability::outcome_label(e));
            }
        }
        result
    }
}
