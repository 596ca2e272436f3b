//! YouTube Data API v3 search client.

use super::{VideoHit, VideoSearch};
use crate::error::EnrichmentError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const YOUTUBE_DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
const SEARCH_HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const SEARCH_HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: SearchResultId,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResultId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
}

pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(api_key: String, base_url: Option<String>) -> Result<Self, EnrichmentError> {
        let client = Client::builder()
            .connect_timeout(SEARCH_HTTP_CONNECT_TIMEOUT)
            .timeout(SEARCH_HTTP_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| EnrichmentError::Network(format!("Failed to create HTTP client: {}", e)))?;
        let base_url = base_url.unwrap_or_else(|| YOUTUBE_DEFAULT_BASE_URL.to_string());
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl VideoSearch for YouTubeClient {
    async fn search_videos(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<VideoHit>, EnrichmentError> {
        let url = format!("{}/search", self.base_url);
        let max_results = limit.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("q", query),
                ("type", "video"),
                ("maxResults", max_results.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(EnrichmentError::Api { status, message });
        }

        let body: SearchListResponse = response
            .json()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))?;
        Ok(hits_from_response(body))
    }

    fn provider_name(&self) -> &str {
        "youtube"
    }
}

/// Keep video results only; channel and playlist items carry no `videoId`.
/// Titles arrive HTML-escaped.
fn hits_from_response(body: SearchListResponse) -> Vec<VideoHit> {
    body.items
        .into_iter()
        .filter_map(|item| {
            let video_id = item.id.video_id?;
            let title = item
                .snippet
                .map(|s| html_escape::decode_html_entities(&s.title).into_owned())
                .unwrap_or_default();
            Some(VideoHit { video_id, title })
        })
        .collect()
}
